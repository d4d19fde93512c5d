//! Binary encoding of [`StoredValue`]s for persistent backends.
//!
//! # Format
//!
//! Each value is encoded with a 1-byte type tag followed by the payload:
//!
//! - `Bool`: `0x01` + `0x00` (false) or `0x01` (true)
//! - `Int`: `0x02` + 4 bytes (big-endian i32)
//! - `Long`: `0x03` + 8 bytes (big-endian i64)
//! - `Float`: `0x04` + 4 bytes (big-endian IEEE 754 f32)
//! - `String`: `0x05` + 4 bytes length + UTF-8 bytes
//! - `StringSet`: `0x06` + 4 bytes count + members, each `0x00` (null) or
//!   `0x01` + 4 bytes length + UTF-8 bytes

use std::collections::BTreeSet;

use crate::error::{StorageError, StorageResult};
use crate::value::StoredValue;

/// Type tags for value variants.
mod tags {
    pub const BOOL: u8 = 0x01;
    pub const INT: u8 = 0x02;
    pub const LONG: u8 = 0x03;
    pub const FLOAT: u8 = 0x04;
    pub const STRING: u8 = 0x05;
    pub const STRING_SET: u8 = 0x06;
}

/// Encode a value to bytes. `key` is only used for error messages.
///
/// # Errors
///
/// Returns [`StorageError::Corrupted`] if a string or set is too large for a
/// 32-bit length prefix.
pub fn encode_value(key: &str, value: &StoredValue) -> StorageResult<Vec<u8>> {
    let mut buf = Vec::new();
    match value {
        StoredValue::Bool(b) => {
            buf.push(tags::BOOL);
            buf.push(u8::from(*b));
        }
        StoredValue::Int(i) => {
            buf.push(tags::INT);
            buf.extend_from_slice(&i.to_be_bytes());
        }
        StoredValue::Long(l) => {
            buf.push(tags::LONG);
            buf.extend_from_slice(&l.to_be_bytes());
        }
        StoredValue::Float(f) => {
            buf.push(tags::FLOAT);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        StoredValue::String(s) => {
            buf.push(tags::STRING);
            put_str(key, &mut buf, s)?;
        }
        StoredValue::StringSet(set) => {
            buf.push(tags::STRING_SET);
            put_len(key, &mut buf, set.len())?;
            for member in set {
                match member {
                    None => buf.push(0),
                    Some(s) => {
                        buf.push(1);
                        put_str(key, &mut buf, s)?;
                    }
                }
            }
        }
    }
    Ok(buf)
}

fn put_len(key: &str, buf: &mut Vec<u8>, len: usize) -> StorageResult<()> {
    let len = u32::try_from(len).map_err(|_| StorageError::corrupted(key, "length too large"))?;
    buf.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn put_str(key: &str, buf: &mut Vec<u8>, s: &str) -> StorageResult<()> {
    put_len(key, buf, s.len())?;
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Decode a value from bytes produced by [`encode_value`].
///
/// # Errors
///
/// Returns [`StorageError::Corrupted`] on truncated input, unknown tags,
/// invalid UTF-8 or trailing bytes.
pub fn decode_value(key: &str, bytes: &[u8]) -> StorageResult<StoredValue> {
    let mut reader = Reader { key, bytes, pos: 0 };
    let tag = reader.byte()?;
    let value = match tag {
        tags::BOOL => StoredValue::Bool(reader.byte()? != 0),
        tags::INT => StoredValue::Int(i32::from_be_bytes(reader.array()?)),
        tags::LONG => StoredValue::Long(i64::from_be_bytes(reader.array()?)),
        tags::FLOAT => StoredValue::Float(f32::from_be_bytes(reader.array()?)),
        tags::STRING => StoredValue::String(reader.string()?),
        tags::STRING_SET => {
            let count = u32::from_be_bytes(reader.array()?);
            let mut set = BTreeSet::new();
            for _ in 0..count {
                let member = match reader.byte()? {
                    0 => None,
                    1 => Some(reader.string()?),
                    other => {
                        return Err(StorageError::corrupted(
                            key,
                            format!("invalid set member marker {other:#04x}"),
                        ))
                    }
                };
                set.insert(member);
            }
            StoredValue::StringSet(set)
        }
        other => {
            return Err(StorageError::corrupted(key, format!("unknown type tag {other:#04x}")));
        }
    };
    if reader.pos != bytes.len() {
        return Err(StorageError::corrupted(key, "trailing bytes"));
    }
    Ok(value)
}

struct Reader<'a> {
    key: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> StorageResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| StorageError::corrupted(self.key, "unexpected end of input"))?;
        let bytes = self.bytes;
        let slice = &bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> StorageResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> StorageResult<[u8; N]> {
        let key = self.key;
        self.take(N)?.try_into().map_err(|_| StorageError::corrupted(key, "short read"))
    }

    fn string(&mut self) -> StorageResult<String> {
        let len = u32::from_be_bytes(self.array()?) as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|e| StorageError::corrupted(self.key, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: StoredValue) {
        let bytes = encode_value("k", &value).expect("encoding should succeed");
        let decoded = decode_value("k", &bytes).expect("decoding should succeed");
        assert_eq!(value, decoded);
    }

    #[test]
    fn test_roundtrip_each_kind() {
        roundtrip(StoredValue::Bool(true));
        roundtrip(StoredValue::Int(-12));
        roundtrip(StoredValue::Long(i64::MIN));
        roundtrip(StoredValue::Float(12.6));
        roundtrip(StoredValue::String("foobar".into()));
        roundtrip(StoredValue::StringSet(
            [None, Some(String::new()), Some("x".into())].into_iter().collect(),
        ));
    }

    #[test]
    fn test_layout() {
        let bytes = encode_value("k", &StoredValue::Int(1)).expect("encoding should succeed");
        assert_eq!(bytes, vec![tags::INT, 0, 0, 0, 1]);
    }

    #[test]
    fn test_truncated() {
        let err = decode_value("k", &[tags::LONG, 0, 0]).expect_err("should fail");
        assert!(matches!(err, StorageError::Corrupted { .. }));
        assert!(decode_value("k", &[]).is_err());
    }

    #[test]
    fn test_unknown_tag_and_trailing() {
        assert!(decode_value("k", &[0x7f]).is_err());
        assert!(decode_value("k", &[tags::BOOL, 1, 0]).is_err());
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn arb_stored() -> impl Strategy<Value = StoredValue> {
        prop_oneof![
            any::<bool>().prop_map(StoredValue::Bool),
            any::<i32>().prop_map(StoredValue::Int),
            any::<i64>().prop_map(StoredValue::Long),
            any::<f32>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(StoredValue::Float),
            ".*".prop_map(StoredValue::String),
            prop::collection::btree_set(prop::option::of(".{0,8}"), 0..8)
                .prop_map(StoredValue::StringSet),
        ]
    }

    proptest! {
        #[test]
        fn stored_value_roundtrip(value in arb_stored()) {
            let bytes = encode_value("k", &value).expect("encoding should succeed");
            let decoded = decode_value("k", &bytes).expect("decoding should succeed");
            prop_assert_eq!(value, decoded);
        }

        #[test]
        fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode_value("k", &bytes);
        }
    }
}
