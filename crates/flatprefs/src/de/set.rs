//! Decoding of native string sets.

use std::collections::btree_set;
use std::collections::BTreeSet;

use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::error::{Error, Result};

/// Deserializes a native string set as a sequence of its members.
pub struct SetDecoder<'a> {
    tag: &'a str,
    members: BTreeSet<Option<String>>,
}

impl<'a> SetDecoder<'a> {
    pub(super) const fn new(tag: &'a str, members: BTreeSet<Option<String>>) -> Self {
        Self { tag, members }
    }
}

impl<'de> de::Deserializer<'de> for SetDecoder<'_> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(MemberSeq::new(self.tag, self.members))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

/// Yields the members of a native string set in order.
pub struct MemberSeq<'a> {
    tag: &'a str,
    members: btree_set::IntoIter<Option<String>>,
}

impl<'a> MemberSeq<'a> {
    pub(super) fn new(tag: &'a str, members: BTreeSet<Option<String>>) -> Self {
        Self { tag, members: members.into_iter() }
    }
}

impl<'de> de::SeqAccess<'de> for MemberSeq<'_> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.members.next() {
            Some(member) => seed.deserialize(MemberDecoder { tag: self.tag, member }).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.members.len())
    }
}

/// Maps one member back to a string, char, enum name or option thereof.
struct MemberDecoder<'a> {
    tag: &'a str,
    member: Option<String>,
}

impl MemberDecoder<'_> {
    fn text(self) -> Result<String> {
        self.member.ok_or_else(|| Error::mismatch(self.tag, "set member", "null"))
    }
}

impl<'de> de::Deserializer<'de> for MemberDecoder<'_> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.member {
            Some(text) => visitor.visit_string(text),
            None => visitor.visit_none(),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.member.is_some() {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let tag = self.tag;
        let text = self.text()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::mismatch(tag, "char", format!("set member {text:?}"))),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let tag = self.tag;
        let text = self.text()?;
        if !variants.contains(&text.as_str()) {
            return Err(Error::UnknownEnumValue { tag: tag.to_owned(), value: text });
        }
        let access: de::value::StringDeserializer<Error> = text.into_deserializer();
        visitor.visit_enum(access)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
