//! The primitive values a preference store can hold.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single primitive value held by a [`PreferenceStore`](crate::PreferenceStore).
///
/// This is the complete vocabulary of the store: every structured value is
/// projected onto these six kinds by the codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredValue {
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit floating point number.
    Float(f32),
    /// UTF-8 string.
    String(String),
    /// A set of strings. `None` members are native-null entries.
    StringSet(BTreeSet<Option<String>>),
}

impl StoredValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> StoredKind {
        match self {
            Self::Bool(_) => StoredKind::Bool,
            Self::Int(_) => StoredKind::Int,
            Self::Long(_) => StoredKind::Long,
            Self::Float(_) => StoredKind::Float,
            Self::String(_) => StoredKind::String,
            Self::StringSet(_) => StoredKind::StringSet,
        }
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as a 32-bit integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a 64-bit integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Returns the value as a float if it is one.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is one.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a string set if it is one.
    #[inline]
    #[must_use]
    pub const fn as_string_set(&self) -> Option<&BTreeSet<Option<String>>> {
        match self {
            Self::StringSet(set) => Some(set),
            _ => None,
        }
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Long(l) => write!(f, "{l}L"),
            Self::Float(v) => write!(f, "{v}f"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::StringSet(set) => {
                f.write_str("{")?;
                for (i, member) in set.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match member {
                        Some(s) => write!(f, "{s:?}")?,
                        None => f.write_str("null")?,
                    }
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for StoredValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for StoredValue {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl From<i64> for StoredValue {
    fn from(l: i64) -> Self {
        Self::Long(l)
    }
}

impl From<f32> for StoredValue {
    fn from(f: f32) -> Self {
        Self::Float(f)
    }
}

impl From<String> for StoredValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<BTreeSet<Option<String>>> for StoredValue {
    fn from(set: BTreeSet<Option<String>>) -> Self {
        Self::StringSet(set)
    }
}

/// The kind of a [`StoredValue`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoredKind {
    /// See [`StoredValue::Bool`].
    Bool,
    /// See [`StoredValue::Int`].
    Int,
    /// See [`StoredValue::Long`].
    Long,
    /// See [`StoredValue::Float`].
    Float,
    /// See [`StoredValue::String`].
    String,
    /// See [`StoredValue::StringSet`].
    StringSet,
}

impl StoredKind {
    /// Returns a lowercase name for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::String => "string",
            Self::StringSet => "string set",
        }
    }
}

impl fmt::Display for StoredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
