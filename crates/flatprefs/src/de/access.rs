//! Access types handed to serde visitors for compound values.

use serde::de::{self, value::BorrowedStrDeserializer, DeserializeSeed, IntoDeserializer, Visitor};

use super::{Decoder, Position};
use crate::error::{Error, Result};
use crate::path;

/// Yields the elements stored at `tag.0 .. tag.<len - 1>`.
pub struct SeqDecoder<'a> {
    parent: Decoder<'a>,
    index: usize,
    len: usize,
}

impl<'a> SeqDecoder<'a> {
    pub(super) const fn new(parent: Decoder<'a>, len: usize) -> Self {
        Self { parent, index: 0, len }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDecoder<'_> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.index >= self.len {
            return Ok(None);
        }
        let element = self.parent.element(self.index);
        self.index += 1;
        seed.deserialize(element.decoder()).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len - self.index)
    }
}

/// Yields map entries stored as a flat list of alternating keys and values.
pub struct MapDecoder<'a> {
    parent: Decoder<'a>,
    index: usize,
    entries: usize,
}

impl<'a> MapDecoder<'a> {
    pub(super) const fn new(parent: Decoder<'a>, entries: usize) -> Self {
        Self { parent, index: 0, entries }
    }
}

impl<'de> de::MapAccess<'de> for MapDecoder<'_> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.index >= self.entries {
            return Ok(None);
        }
        let key = self.parent.element(2 * self.index);
        seed.deserialize(key.decoder()).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let value = self.parent.element(2 * self.index + 1);
        self.index += 1;
        seed.deserialize(value.decoder())
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries - self.index)
    }
}

/// Yields the declared fields of a struct that have something stored.
///
/// Fields with nothing at or beneath their tag are skipped, leaving the
/// visitor to apply `#[serde(default)]`, treat an `Option` as `None`, or
/// report the field as missing.
pub struct StructDecoder<'a> {
    parent: Decoder<'a>,
    fields: &'static [&'static str],
    index: usize,
    current: Option<Position<'a>>,
}

impl<'a> StructDecoder<'a> {
    pub(super) const fn new(parent: Decoder<'a>, fields: &'static [&'static str]) -> Self {
        Self { parent, fields, index: 0, current: None }
    }
}

impl<'de> de::MapAccess<'de> for StructDecoder<'_> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        while let Some(field) = self.fields.get(self.index).copied() {
            self.index += 1;
            let child = self.parent.child(field);
            if path::is_stored(self.parent.keys, &child.tag) {
                self.current = Some(child);
                return seed.deserialize(BorrowedStrDeserializer::<Error>::new(field)).map(Some);
            }
        }
        Ok(None)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        match self.current.take() {
            Some(child) => seed.deserialize(child.decoder()),
            None => Err(Error::Message("struct value requested before its key".to_owned())),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len() - self.index)
    }
}

/// Gives access to the payload of a polymorphic value at `tag.value`.
pub struct VariantDecoder<'a> {
    payload: Position<'a>,
    variant: String,
}

impl<'a> VariantDecoder<'a> {
    pub(super) fn new(payload: Position<'a>, variant: String) -> Self {
        Self { payload, variant }
    }
}

impl<'de, 'a> de::EnumAccess<'de> for VariantDecoder<'a> {
    type Error = Error;
    type Variant = Position<'a>;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Position<'a>)> {
        let name: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        Ok((seed.deserialize(name)?, self.payload))
    }
}

impl<'de> de::VariantAccess<'de> for Position<'_> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self.decoder())
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_tuple(self.decoder(), len, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(self.decoder(), "", fields, visitor)
    }
}
