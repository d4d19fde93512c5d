//! Set types recognised by the native string-set fast path.
//!
//! Standard sets serialize as plain sequences, which the codec cannot tell
//! apart from lists. Fields using [`hash_set`] or [`btree_set`] through
//! `#[serde(with = ...)]`, and values of type [`StringSet`], wrap the
//! sequence in a newtype struct whose name is listed in
//! [`Configuration::set_shape_recognition_names`](crate::Configuration::set_shape_recognition_names).
//! Other serde formats see a transparent newtype and are unaffected.
//!
//! ```
//! use std::collections::HashSet;
//!
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Profile {
//!     #[serde(with = "flatprefs::set::hash_set")]
//!     tags: HashSet<String>,
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use serde::de::{self, value::SeqAccessDeserializer, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

use crate::config::{BTREE_SET_NAME, HASH_SET_NAME};

/// `with`-module for `HashSet` fields.
pub mod hash_set {
    use std::collections::HashSet;
    use std::hash::{BuildHasher, Hash};

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{SetVisitor, HASH_SET_NAME};

    /// Serializes the set as a recognised newtype.
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying serializer.
    pub fn serialize<T, H, S>(set: &HashSet<T, H>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        serializer.serialize_newtype_struct(HASH_SET_NAME, set)
    }

    /// Deserializes a set written by [`serialize`].
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying deserializer.
    pub fn deserialize<'de, T, H, D>(deserializer: D) -> Result<HashSet<T, H>, D::Error>
    where
        T: Deserialize<'de> + Eq + Hash,
        H: BuildHasher + Default,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(HASH_SET_NAME, SetVisitor::new())
    }
}

/// `with`-module for `BTreeSet` fields.
pub mod btree_set {
    use std::collections::BTreeSet;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{SetVisitor, BTREE_SET_NAME};

    /// Serializes the set as a recognised newtype.
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying serializer.
    pub fn serialize<T, S>(set: &BTreeSet<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        serializer.serialize_newtype_struct(BTREE_SET_NAME, set)
    }

    /// Deserializes a set written by [`serialize`].
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying deserializer.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<BTreeSet<T>, D::Error>
    where
        T: Deserialize<'de> + Ord,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(BTREE_SET_NAME, SetVisitor::new())
    }
}

/// Reads a set collection from either a newtype or a bare sequence.
struct SetVisitor<C>(PhantomData<C>);

impl<C> SetVisitor<C> {
    const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<'de, C: Deserialize<'de>> Visitor<'de> for SetVisitor<C> {
    type Value = C;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a set")
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<C, D::Error> {
        C::deserialize(deserializer)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, seq: A) -> Result<C, A::Error> {
        C::deserialize(SeqAccessDeserializer::new(seq))
    }
}

/// An ordered set that the codec stores as one native string set when its
/// elements are string-like.
///
/// # Example
///
/// ```
/// use flatprefs::{MemoryStore, PreferenceStore, Preferences, StringSet};
///
/// let prefs = Preferences::new(MemoryStore::new());
/// let fruits: StringSet<String> = ["apple", "pear"].into_iter().map(String::from).collect();
/// prefs.encode("fruits", &fruits)?;
///
/// assert_eq!(prefs.store().keys()?.len(), 1);
/// assert_eq!(prefs.decode::<StringSet<String>>("fruits")?, fruits);
/// # Ok::<(), flatprefs::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringSet<T>(pub BTreeSet<T>);

impl<T: Ord> StringSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Unwraps the inner set.
    #[must_use]
    pub fn into_inner(self) -> BTreeSet<T> {
        self.0
    }
}

impl<T: Ord> Default for StringSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for StringSet<T> {
    type Target = BTreeSet<T>;

    fn deref(&self) -> &BTreeSet<T> {
        &self.0
    }
}

impl<T> DerefMut for StringSet<T> {
    fn deref_mut(&mut self) -> &mut BTreeSet<T> {
        &mut self.0
    }
}

impl<T> From<BTreeSet<T>> for StringSet<T> {
    fn from(set: BTreeSet<T>) -> Self {
        Self(set)
    }
}

impl<T: Ord> FromIterator<T> for StringSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for StringSet<T> {
    type Item = T;
    type IntoIter = std::collections::btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Serialize> Serialize for StringSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(crate::config::STRING_SET_NAME, &self.0)
    }
}

impl<'de, T: Deserialize<'de> + Ord> Deserialize<'de> for StringSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_newtype_struct(crate::config::STRING_SET_NAME, SetVisitor::new())
            .map(Self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Tagged {
        #[serde(with = "super::hash_set")]
        tags: HashSet<String>,
        #[serde(with = "super::btree_set")]
        ids: BTreeSet<char>,
    }

    #[test]
    fn test_transparent_for_other_formats() {
        let value = Tagged {
            tags: ["a".to_owned()].into_iter().collect(),
            ids: ['x', 'y'].into_iter().collect(),
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"tags":["a"],"ids":["x","y"]}"#);
        assert_eq!(serde_json::from_str::<Tagged>(&json).unwrap(), value);
    }

    #[test]
    fn test_string_set_collects() {
        let set: StringSet<&str> = ["b", "a", "b"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
