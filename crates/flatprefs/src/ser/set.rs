//! Collection of string-like set elements for native string-set storage.
//!
//! [`SetCollector`] accepts a sequence whose elements are strings, chars,
//! unit enum variants or options of those, and produces the members of a
//! native string set. Anything else is refused with [`NotStringLike`] so the
//! caller can fall back to regular list encoding.

use std::collections::BTreeSet;
use std::fmt;

use serde::ser::{self, Impossible, Serialize};

/// Why a value could not be collected into a string set.
#[derive(Debug)]
pub struct NotStringLike(String);

impl fmt::Display for NotStringLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NotStringLike {}

impl ser::Error for NotStringLike {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

type Members = BTreeSet<Option<String>>;
type Member = Option<String>;

fn refuse<T>(what: &str) -> Result<T, NotStringLike> {
    Err(NotStringLike(format!("{what} is not string-like")))
}

macro_rules! refuse_primitives {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<Self::Ok, Self::Error> {
                refuse(stringify!($ty))
            }
        )*
    };
}

/// Refuses every compound shape. Used by both serializers below.
macro_rules! refuse_compounds {
    () => {
        fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
            refuse("bytes")
        }

        fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
            refuse("unit")
        }

        fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok, Self::Error> {
            refuse(name)
        }

        fn serialize_newtype_variant<T: ?Sized + Serialize>(
            self,
            _name: &'static str,
            _variant_index: u32,
            variant: &'static str,
            _value: &T,
        ) -> Result<Self::Ok, Self::Error> {
            refuse(variant)
        }

        fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
            refuse("tuple")
        }

        fn serialize_tuple_struct(
            self,
            name: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleStruct, Self::Error> {
            refuse(name)
        }

        fn serialize_tuple_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleVariant, Self::Error> {
            refuse(variant)
        }

        fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
            refuse("map")
        }

        fn serialize_struct(
            self,
            name: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeStruct, Self::Error> {
            refuse(name)
        }

        fn serialize_struct_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeStructVariant, Self::Error> {
            refuse(variant)
        }
    };
}

/// Serializes a set into native string-set members.
pub struct SetCollector;

/// Accumulates members while a sequence is serialized.
pub struct SetMembers(Members);

impl ser::Serializer for SetCollector {
    type Ok = Members;
    type Error = NotStringLike;

    type SerializeSeq = SetMembers;
    type SerializeTuple = Impossible<Members, NotStringLike>;
    type SerializeTupleStruct = Impossible<Members, NotStringLike>;
    type SerializeTupleVariant = Impossible<Members, NotStringLike>;
    type SerializeMap = Impossible<Members, NotStringLike>;
    type SerializeStruct = Impossible<Members, NotStringLike>;
    type SerializeStructVariant = Impossible<Members, NotStringLike>;

    refuse_primitives! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_f32: f32,
        serialize_f64: f64,
        serialize_char: char,
        serialize_str: &str,
    }

    refuse_compounds!();

    fn serialize_none(self) -> Result<Members, NotStringLike> {
        refuse("null set")
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<Members, NotStringLike> {
        refuse("optional set")
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Members, NotStringLike> {
        refuse(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Members, NotStringLike> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SetMembers, NotStringLike> {
        Ok(SetMembers(BTreeSet::new()))
    }
}

impl ser::SerializeSeq for SetMembers {
    type Ok = Members;
    type Error = NotStringLike;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NotStringLike> {
        self.0.insert(value.serialize(MemberSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Members, NotStringLike> {
        Ok(self.0)
    }
}

/// Serializes one set element into its string form.
struct MemberSerializer;

impl ser::Serializer for MemberSerializer {
    type Ok = Member;
    type Error = NotStringLike;

    type SerializeSeq = Impossible<Member, NotStringLike>;
    type SerializeTuple = Impossible<Member, NotStringLike>;
    type SerializeTupleStruct = Impossible<Member, NotStringLike>;
    type SerializeTupleVariant = Impossible<Member, NotStringLike>;
    type SerializeMap = Impossible<Member, NotStringLike>;
    type SerializeStruct = Impossible<Member, NotStringLike>;
    type SerializeStructVariant = Impossible<Member, NotStringLike>;

    refuse_primitives! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_f32: f32,
        serialize_f64: f64,
    }

    refuse_compounds!();

    fn serialize_char(self, v: char) -> Result<Member, NotStringLike> {
        Ok(Some(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Member, NotStringLike> {
        Ok(Some(v.to_owned()))
    }

    fn serialize_none(self) -> Result<Member, NotStringLike> {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Member, NotStringLike> {
        value.serialize(self)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Member, NotStringLike> {
        Ok(Some(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Member, NotStringLike> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, NotStringLike> {
        refuse("nested sequence")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde::Serialize;

    use super::*;

    #[derive(Serialize, PartialEq, Eq, Hash)]
    enum Day {
        Monday,
        Friday,
    }

    #[test]
    fn test_collect_strings_and_nulls() {
        let value = vec![Some("foo"), None, Some("bar")];
        let members = value.serialize(SetCollector).unwrap();
        let expected: Members = [Some("bar".to_owned()), Some("foo".to_owned()), None].into();
        assert_eq!(members, expected);
    }

    #[test]
    fn test_collect_enum_names_and_chars() {
        let days: HashSet<Day> = [Day::Monday, Day::Friday].into_iter().collect();
        let members = days.serialize(SetCollector).unwrap();
        assert!(members.contains(&Some("Monday".to_owned())));
        assert!(members.contains(&Some("Friday".to_owned())));

        let chars = ['a', 'b'].serialize(SetCollector);
        // Arrays serialize as tuples, which are not collected.
        assert!(chars.is_err());
        let chars = vec!['a', 'b'].serialize(SetCollector).unwrap();
        assert_eq!(chars.len(), 2);
    }

    #[test]
    fn test_refuse_numbers() {
        let err = vec![1, 2].serialize(SetCollector).unwrap_err();
        assert_eq!(err.to_string(), "i32 is not string-like");
    }
}
