//! Decoding of serde values from primitive keys.
//!
//! [`Decoder`] is a [`serde::Deserializer`] positioned at one tag. It reads
//! point values from the store and answers every structural question
//! (collection sizes, field and element presence) from a snapshot of the
//! store's key set taken once per decode call. Decoding never writes.

mod access;
mod set;

use std::collections::BTreeSet;
use std::fmt;

use flatprefs_storage::{PreferenceStore, StoredValue};
use serde::de::{self, IntoDeserializer, Visitor};
use tracing::{trace, warn};

use self::access::{MapDecoder, SeqDecoder, StructDecoder, VariantDecoder};
use self::set::{MemberSeq, SetDecoder};
use crate::config::{Configuration, DoubleRepresentation};
use crate::error::{Error, Result};
use crate::path::{self, NOT_NULL_MARKER, TYPE_KEY, VALUE_KEY};

/// A deserializer that reads the value stored at one tag.
#[derive(Clone, Copy)]
pub struct Decoder<'a> {
    tag: &'a str,
    store: &'a dyn PreferenceStore,
    keys: &'a BTreeSet<String>,
    config: &'a Configuration,
}

/// Owns the tag a [`Decoder`] borrows, so nested decoders can be built from
/// composed tags.
pub struct Position<'a> {
    tag: String,
    store: &'a dyn PreferenceStore,
    keys: &'a BTreeSet<String>,
    config: &'a Configuration,
}

impl<'a> Position<'a> {
    pub(crate) fn new(
        tag: impl Into<String>,
        store: &'a dyn PreferenceStore,
        keys: &'a BTreeSet<String>,
        config: &'a Configuration,
    ) -> Self {
        Self { tag: tag.into(), store, keys, config }
    }

    pub(crate) fn decoder(&self) -> Decoder<'_> {
        Decoder { tag: &self.tag, store: self.store, keys: self.keys, config: self.config }
    }
}

impl<'a> Decoder<'a> {
    fn child(&self, name: &str) -> Position<'a> {
        Position::new(path::compose(self.tag, name), self.store, self.keys, self.config)
    }

    fn element(&self, index: usize) -> Position<'a> {
        Position::new(path::compose_index(self.tag, index), self.store, self.keys, self.config)
    }

    fn value(&self) -> Result<Option<StoredValue>> {
        if !self.keys.contains(self.tag) {
            return Ok(None);
        }
        Ok(self.store.get(self.tag)?)
    }

    fn require(&self) -> Result<StoredValue> {
        self.value()?.ok_or_else(|| Error::missing(self.tag))
    }

    fn mismatch(&self, expected: &str, actual: &StoredValue) -> Error {
        Error::mismatch(self.tag, expected, actual.kind())
    }

    fn bool(&self) -> Result<bool> {
        match self.require()? {
            StoredValue::Bool(b) => Ok(b),
            other => Err(self.mismatch("bool", &other)),
        }
    }

    fn int(&self) -> Result<i32> {
        match self.require()? {
            StoredValue::Int(i) => Ok(i),
            other => Err(self.mismatch("int", &other)),
        }
    }

    fn long(&self) -> Result<i64> {
        match self.require()? {
            StoredValue::Long(l) => Ok(l),
            other => Err(self.mismatch("long", &other)),
        }
    }

    fn float(&self) -> Result<f32> {
        match self.require()? {
            StoredValue::Float(f) => Ok(f),
            other => Err(self.mismatch("float", &other)),
        }
    }

    fn string(&self) -> Result<String> {
        match self.require()? {
            StoredValue::String(s) => Ok(s),
            other => Err(self.mismatch("string", &other)),
        }
    }

    fn narrow<S, T>(&self, value: S, target: &'static str) -> Result<T>
    where
        S: Copy + fmt::Display,
        T: TryFrom<S>,
    {
        T::try_from(value).map_err(|_| Error::OutOfRange {
            tag: self.tag.to_owned(),
            value: value.to_string(),
            target,
        })
    }

    #[allow(clippy::cast_sign_loss)]
    fn double(&self) -> Result<f64> {
        match self.config.double_representation() {
            DoubleRepresentation::Float => self.float().map(f64::from),
            DoubleRepresentation::LongBits => self.long().map(|bits| f64::from_bits(bits as u64)),
            DoubleRepresentation::String => {
                let text = self.string()?;
                text.parse()
                    .map_err(|_| Error::InvalidNumber { tag: self.tag.to_owned(), text })
            }
        }
    }

    /// Decides whether an optional value is present.
    fn is_present(&self) -> Result<bool> {
        let marker = path::compose(self.tag, NOT_NULL_MARKER);
        if self.keys.contains(&marker) {
            return match self.store.get(&marker)? {
                Some(StoredValue::Bool(present)) => Ok(present),
                Some(other) => Err(Error::mismatch(marker, "bool", other.kind())),
                None => Ok(false),
            };
        }
        let present = path::is_stored(self.keys, self.tag);
        if present {
            warn!(tag = self.tag, "no presence marker, inferring presence from stored keys");
        } else {
            trace!(tag = self.tag, "no presence marker and nothing stored");
        }
        Ok(present)
    }
}

impl<'de> de::Deserializer<'de> for Decoder<'_> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value()? {
            Some(StoredValue::Bool(b)) => visitor.visit_bool(b),
            Some(StoredValue::Int(i)) => visitor.visit_i32(i),
            Some(StoredValue::Long(l)) => visitor.visit_i64(l),
            Some(StoredValue::Float(f)) => visitor.visit_f32(f),
            Some(StoredValue::String(s)) => visitor.visit_string(s),
            Some(StoredValue::StringSet(set)) => visitor.visit_seq(MemberSeq::new(self.tag, set)),
            None if path::has_children(self.keys, self.tag) => Err(Error::Unsupported(format!(
                "structured value at '{}' needs a concrete target type",
                self.tag
            ))),
            None => Err(Error::missing(self.tag)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.bool()?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.narrow(self.int()?, "i8")?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.narrow(self.int()?, "i16")?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.int()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.long()?)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported(format!("128-bit integer at '{}'", self.tag)))
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.narrow(self.int()?, "u8")?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.narrow(self.int()?, "u16")?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.narrow(self.long()?, "u32")?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.narrow(self.long()?, "u64")?)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported(format!("128-bit integer at '{}'", self.tag)))
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.float()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.double()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let text = self.string()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::mismatch(self.tag, "char", format!("string of length {}", text.len()))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.string()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.string()?)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let len = path::collection_size(self.keys, self.tag)?;
        let mut bytes = Vec::with_capacity(len);
        for index in 0..len {
            let element = self.element(index);
            let element = element.decoder();
            bytes.push(element.narrow::<i32, u8>(element.int()?, "u8")?);
        }
        visitor.visit_byte_buf(bytes)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.is_present()? {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if !self.config.recognizes_set(name) {
            return visitor.visit_newtype_struct(self);
        }
        match self.value()? {
            Some(StoredValue::StringSet(members)) => {
                trace!(tag = self.tag, members = members.len(), "read native string set");
                visitor.visit_newtype_struct(SetDecoder::new(self.tag, members))
            }
            Some(_) => visitor.visit_newtype_struct(self),
            None if path::has_children(self.keys, self.tag) => visitor.visit_newtype_struct(self),
            None => Err(Error::missing(self.tag)),
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value()? {
            Some(StoredValue::StringSet(members)) => {
                visitor.visit_seq(MemberSeq::new(self.tag, members))
            }
            Some(StoredValue::Bool(true)) | None => {
                let len = path::collection_size(self.keys, self.tag)?;
                visitor.visit_seq(SeqDecoder::new(self, len))
            }
            Some(other) => Err(self.mismatch("list", &other)),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDecoder::new(self, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if let Some(other) = self.value()?.filter(|v| *v != StoredValue::Bool(true)) {
            return Err(self.mismatch("map", &other));
        }
        let len = path::collection_size(self.keys, self.tag)?;
        visitor.visit_map(MapDecoder::new(self, len.div_ceil(2)))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor
            .visit_map(StructDecoder::new(self, fields))
            .map_err(|err| err.anchor_field(self.tag, fields))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.value()? {
            Some(StoredValue::String(name)) => {
                if !variants.contains(&name.as_str()) {
                    return Err(Error::UnknownEnumValue { tag: self.tag.to_owned(), value: name });
                }
                let access: de::value::StringDeserializer<Error> = name.into_deserializer();
                visitor.visit_enum(access)
            }
            Some(other) => Err(self.mismatch("enum name", &other)),
            None => {
                let type_tag = path::compose(self.tag, TYPE_KEY);
                let discriminator = match self.store.get(&type_tag)? {
                    Some(StoredValue::String(name)) => name,
                    Some(other) => return Err(Error::mismatch(type_tag, "string", other.kind())),
                    None => return Err(Error::missing(self.tag)),
                };
                if !variants.contains(&discriminator.as_str()) {
                    return Err(Error::UnknownDiscriminator { tag: type_tag, value: discriminator });
                }
                visitor.visit_enum(VariantDecoder::new(self.child(VALUE_KEY), discriminator))
            }
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use flatprefs_storage::MemoryStore;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;

    use super::*;

    fn store(entries: &[(&str, StoredValue)]) -> MemoryStore {
        MemoryStore::with_entries(entries.iter().map(|(k, v)| ((*k).to_owned(), v.clone())))
    }

    fn read<T: DeserializeOwned>(store: &MemoryStore, tag: &str) -> Result<T> {
        let config = Configuration::default();
        let keys = store.keys()?;
        let position = Position::new(tag, store, &keys, &config);
        T::deserialize(position.decoder())
    }

    #[derive(Debug, PartialEq, Deserialize)]
    enum Shape {
        Circle(f32),
        Square { side: f32 },
    }

    #[test]
    fn test_narrowing_is_checked() {
        let store = store(&[("n", StoredValue::Int(300))]);
        assert_eq!(read::<i16>(&store, "n").unwrap(), 300);
        let err = read::<u8>(&store, "n").unwrap_err();
        assert!(matches!(err, Error::OutOfRange { target: "u8", .. }));
    }

    #[test]
    fn test_kind_mismatch() {
        let store = store(&[("n", StoredValue::Long(3))]);
        let err = read::<i32>(&store, "n").unwrap_err();
        assert!(
            matches!(err, Error::TypeMismatch { ref expected, ref actual, .. } if expected == "int" && actual == "long")
        );
    }

    #[test]
    fn test_legacy_presence_without_marker() {
        let store = store(&[("old", StoredValue::Int(4)), ("obj.x", StoredValue::Int(1))]);
        assert_eq!(read::<Option<i32>>(&store, "old").unwrap(), Some(4));
        assert_eq!(read::<Option<i32>>(&store, "never").unwrap(), None);

        #[derive(Debug, PartialEq, Deserialize)]
        struct Obj {
            x: i32,
        }
        assert_eq!(read::<Option<Obj>>(&store, "obj").unwrap(), Some(Obj { x: 1 }));
    }

    #[test]
    fn test_marker_wins_over_stale_value() {
        let store = store(&[
            ("o", StoredValue::Int(4)),
            ("o.$isNotNull", StoredValue::Bool(false)),
        ]);
        assert_eq!(read::<Option<i32>>(&store, "o").unwrap(), None);
    }

    #[test]
    fn test_polymorphic() {
        let store = store(&[
            ("a.type", StoredValue::String("Circle".into())),
            ("a.value", StoredValue::Float(2.0)),
            ("b.type", StoredValue::String("Square".into())),
            ("b.value.side", StoredValue::Float(3.0)),
            ("c.type", StoredValue::String("Triangle".into())),
        ]);
        assert_eq!(read::<Shape>(&store, "a").unwrap(), Shape::Circle(2.0));
        assert_eq!(read::<Shape>(&store, "b").unwrap(), Shape::Square { side: 3.0 });

        let err = read::<Shape>(&store, "c").unwrap_err();
        assert!(
            matches!(err, Error::UnknownDiscriminator { ref tag, ref value } if tag == "c.type" && value == "Triangle")
        );
        assert!(matches!(read::<Shape>(&store, "d").unwrap_err(), Error::MissingProperty { .. }));
    }

    #[test]
    fn test_missing_field_is_anchored() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Person {
            name: String,
            age: i32,
        }
        let store = store(&[("p.name", StoredValue::String("Abby".into()))]);
        let err = read::<Person>(&store, "p").unwrap_err();
        assert!(matches!(err, Error::MissingProperty { ref tag } if tag == "p.age"));
    }

    #[test]
    fn test_missing_field_under_tag_of_same_name() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wrapper {
            name: i32,
            other: i32,
        }
        let store = store(&[("name.other", StoredValue::Int(1))]);
        let err = read::<Wrapper>(&store, "name").unwrap_err();
        assert!(matches!(err, Error::MissingProperty { ref tag } if tag == "name.name"));
    }

    #[test]
    fn test_map_from_alternating_keys() {
        let store = store(&[
            ("m.0", StoredValue::String("a".into())),
            ("m.1", StoredValue::Int(1)),
            ("m.2", StoredValue::String("b".into())),
            ("m.3", StoredValue::Int(2)),
        ]);
        let map: BTreeMap<String, i32> = read(&store, "m").unwrap();
        assert_eq!(map, BTreeMap::from([("a".to_owned(), 1), ("b".to_owned(), 2)]));
    }

    #[test]
    fn test_list_over_native_set() {
        let members = [Some("b".to_owned()), Some("a".to_owned())].into_iter().collect();
        let store = store(&[
            ("set", StoredValue::StringSet(members)),
            ("n", StoredValue::Int(3)),
            ("empty", StoredValue::Bool(true)),
        ]);
        assert_eq!(read::<Vec<String>>(&store, "set").unwrap(), vec!["a", "b"]);
        assert!(read::<Vec<String>>(&store, "empty").unwrap().is_empty());

        let err = read::<Vec<i32>>(&store, "n").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { ref expected, .. } if expected == "list"));
        let err = read::<BTreeMap<String, i32>>(&store, "set").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { ref expected, .. } if expected == "map"));
    }

    #[test]
    fn test_char_requires_one_character() {
        let store = store(&[("c", StoredValue::String("ab".into()))]);
        assert!(matches!(read::<char>(&store, "c").unwrap_err(), Error::TypeMismatch { .. }));
    }
}
