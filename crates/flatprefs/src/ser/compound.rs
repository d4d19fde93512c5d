//! Serializers for sequences, maps and structs.

use serde::ser::{self, Serialize};

use super::Encoder;
use crate::error::{Error, Result};

/// Writes sequence and tuple elements at `tag.0`, `tag.1`, ...
pub struct SeqEncoder<'a> {
    encoder: Encoder<'a>,
    shape: String,
    len: usize,
}

impl<'a> SeqEncoder<'a> {
    pub(super) fn new(encoder: Encoder<'a>, shape: impl Into<String>) -> Self {
        Self { encoder, shape: shape.into(), len: 0 }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(self.encoder.element(self.len))?;
        self.len += 1;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        if self.len == 0 {
            self.encoder.empty(self.shape)
        } else {
            Ok(())
        }
    }
}

impl ser::SerializeSeq for SeqEncoder<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqEncoder<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqEncoder<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SeqEncoder<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

/// Writes map entries as a flat list: keys at even, values at odd indices.
pub struct MapEncoder<'a> {
    encoder: Encoder<'a>,
    len: usize,
}

impl<'a> MapEncoder<'a> {
    pub(super) fn new(encoder: Encoder<'a>) -> Self {
        Self { encoder, len: 0 }
    }
}

impl ser::SerializeMap for MapEncoder<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        key.serialize(self.encoder.element(self.len))?;
        self.len += 1;
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(self.encoder.element(self.len))?;
        self.len += 1;
        Ok(())
    }

    fn end(self) -> Result<()> {
        if self.len == 0 {
            self.encoder.empty("map")
        } else {
            Ok(())
        }
    }
}

/// Writes struct fields at `tag.<field>`.
pub struct StructEncoder<'a> {
    encoder: Encoder<'a>,
    shape: String,
    fields: usize,
}

impl<'a> StructEncoder<'a> {
    pub(super) fn new(encoder: Encoder<'a>, shape: impl Into<String>) -> Self {
        Self { encoder, shape: shape.into(), fields: 0 }
    }

    fn field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        value.serialize(self.encoder.child(key))?;
        self.fields += 1;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        if self.fields == 0 {
            self.encoder.empty(self.shape)
        } else {
            Ok(())
        }
    }
}

impl ser::SerializeStruct for StructEncoder<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for StructEncoder<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use flatprefs_storage::{StoredValue, WriteBatch};
    use serde::Serialize;

    use super::*;
    use crate::config::Configuration;

    fn keys<T: Serialize>(tag: &str, value: &T) -> BTreeSet<String> {
        let config = Configuration::default();
        let mut batch = WriteBatch::new();
        value.serialize(Encoder::new(tag, &mut batch, &config)).unwrap();
        let mut map = BTreeMap::new();
        batch.apply_to(&mut map);
        map.into_keys().collect()
    }

    #[derive(Serialize)]
    struct Bar {
        bar: i32,
    }

    #[derive(Serialize)]
    enum Sealed {
        Circle { radius: f32 },
        Label(String),
    }

    fn set(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|k| (*k).to_owned()).collect()
    }

    #[test]
    fn test_list_of_objects() {
        let value = vec![Bar { bar: 1 }, Bar { bar: 2 }];
        assert_eq!(keys("list", &value), set(&["list.0.bar", "list.1.bar"]));
    }

    #[test]
    fn test_map_alternates_keys_and_values() {
        let mut value = BTreeMap::new();
        value.insert("first".to_owned(), Bar { bar: 1 });
        value.insert("second".to_owned(), Bar { bar: 2 });
        assert_eq!(keys("map", &value), set(&["map.0", "map.1.bar", "map.2", "map.3.bar"]));
    }

    #[test]
    fn test_polymorphic_variants() {
        let value = vec![Sealed::Circle { radius: 1.0 }, Sealed::Label("x".into())];
        assert_eq!(
            keys("sealed", &value),
            set(&["sealed.0.type", "sealed.0.value.radius", "sealed.1.type", "sealed.1.value"])
        );
    }

    #[test]
    fn test_tuple_indices() {
        assert_eq!(keys("t", &(1, "a", true)), set(&["t.0", "t.1", "t.2"]));
    }

    #[test]
    fn test_discriminator_value() {
        let config = Configuration::default();
        let mut batch = WriteBatch::new();
        Sealed::Label("hi".into()).serialize(Encoder::new("s", &mut batch, &config)).unwrap();
        let mut map = BTreeMap::new();
        batch.apply_to(&mut map);
        assert_eq!(map["s.type"], StoredValue::String("Label".into()));
        assert_eq!(map["s.value"], StoredValue::String("hi".into()));
    }
}
