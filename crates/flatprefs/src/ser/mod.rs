//! Encoding of serde values into primitive key writes.
//!
//! [`Encoder`] is a [`serde::Serializer`] positioned at one tag. It never
//! touches the store: every write goes into the [`WriteBatch`] it borrows,
//! which the caller commits once the whole value has been walked.

mod compound;
mod set;

use flatprefs_storage::{StoredValue, WriteBatch};
use serde::ser::{self, Serialize};
use tracing::{trace, warn};

use crate::config::{Configuration, DoubleRepresentation};
use crate::error::{Error, Result};
use crate::path::{self, NOT_NULL_MARKER, TYPE_KEY, VALUE_KEY};

pub use self::compound::{MapEncoder, SeqEncoder, StructEncoder};

/// A serializer that writes one value at one tag.
pub struct Encoder<'a> {
    tag: String,
    batch: &'a mut WriteBatch,
    config: &'a Configuration,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder writing the value for `tag` into `batch`.
    pub fn new(tag: impl Into<String>, batch: &'a mut WriteBatch, config: &'a Configuration) -> Self {
        Self { tag: tag.into(), batch, config }
    }

    /// The tag this encoder writes at.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn child(&mut self, name: &str) -> Encoder<'_> {
        Encoder { tag: path::compose(&self.tag, name), batch: &mut *self.batch, config: self.config }
    }

    fn element(&mut self, index: usize) -> Encoder<'_> {
        Encoder {
            tag: path::compose_index(&self.tag, index),
            batch: &mut *self.batch,
            config: self.config,
        }
    }

    /// Moves this encoder to `tag.value` after writing `variant` at
    /// `tag.type`.
    fn polymorphic(self, variant: &str) -> Encoder<'a> {
        let Encoder { tag, batch, config } = self;
        let type_tag = path::compose(&tag, TYPE_KEY);
        trace!(tag = %type_tag, variant, "write discriminator");
        batch.put(type_tag, variant);
        Encoder { tag: path::compose(&tag, VALUE_KEY), batch, config }
    }

    fn put(self, value: impl Into<StoredValue>) -> Result<()> {
        let value = value.into();
        trace!(tag = %self.tag, %value, "write");
        self.batch.put(self.tag, value);
        Ok(())
    }

    fn put_marker(&mut self, present: bool) {
        let marker = path::compose(&self.tag, NOT_NULL_MARKER);
        trace!(tag = %marker, present, "write presence marker");
        self.batch.put(marker, present);
    }

    /// Stores an empty object, list or map.
    fn empty(self, shape: impl Into<String>) -> Result<()> {
        if self.config.encode_empty_structure_marker() {
            self.put(true)
        } else {
            Err(Error::EmptyStructureNotAllowed { tag: self.tag, shape: shape.into() })
        }
    }
}

impl<'a> ser::Serializer for Encoder<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqEncoder<'a>;
    type SerializeTuple = SeqEncoder<'a>;
    type SerializeTupleStruct = SeqEncoder<'a>;
    type SerializeTupleVariant = SeqEncoder<'a>;
    type SerializeMap = MapEncoder<'a>;
    type SerializeStruct = StructEncoder<'a>;
    type SerializeStructVariant = StructEncoder<'a>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.put(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.put(i32::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.put(i32::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.put(v)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.put(v)
    }

    fn serialize_i128(self, _v: i128) -> Result<()> {
        Err(Error::Unsupported(format!("128-bit integer at '{}'", self.tag)))
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.put(i32::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.put(i32::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.put(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        match i64::try_from(v) {
            Ok(v) => self.put(v),
            Err(_) => Err(Error::OutOfRange { tag: self.tag, value: v.to_string(), target: "i64" }),
        }
    }

    fn serialize_u128(self, _v: u128) -> Result<()> {
        Err(Error::Unsupported(format!("128-bit integer at '{}'", self.tag)))
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.put(v)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn serialize_f64(self, v: f64) -> Result<()> {
        match self.config.double_representation() {
            DoubleRepresentation::Float => self.put(v as f32),
            DoubleRepresentation::LongBits => self.put(v.to_bits() as i64),
            DoubleRepresentation::String => self.put(v.to_string()),
        }
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.put(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.put(v)
    }

    fn serialize_bytes(mut self, v: &[u8]) -> Result<()> {
        if v.is_empty() {
            return self.empty("bytes");
        }
        for (index, byte) in v.iter().enumerate() {
            self.element(index).put(i32::from(*byte))?;
        }
        Ok(())
    }

    fn serialize_none(mut self) -> Result<()> {
        self.put_marker(false);
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(mut self, value: &T) -> Result<()> {
        self.put_marker(true);
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.empty("unit")
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<()> {
        self.empty(format!("struct {name}"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.put(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<()> {
        if self.config.encode_set_natively() && self.config.recognizes_set(name) {
            match value.serialize(set::SetCollector) {
                Ok(members) => return self.put(members),
                Err(reason) => {
                    warn!(tag = %self.tag, name, %reason, "set is not string-like, storing as a list");
                }
            }
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self.polymorphic(variant))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqEncoder::new(self, "list"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(SeqEncoder::new(self, "tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(SeqEncoder::new(self, format!("struct {name}")))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SeqEncoder::new(self.polymorphic(variant), format!("variant {variant}")))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapEncoder::new(self))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructEncoder::new(self, format!("struct {name}")))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(StructEncoder::new(self.polymorphic(variant), format!("variant {variant}")))
    }
}
