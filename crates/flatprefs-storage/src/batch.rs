//! Buffered writes that are applied to a store in one step.
//!
//! A [`WriteBatch`] records puts and removals without touching the store.
//! It only becomes visible when handed to
//! [`PreferenceStore::apply`](crate::PreferenceStore::apply), usually through
//! [`Editor::commit`]. Dropping a batch or an editor discards every change.
//!
//! # Apply Order
//!
//! 1. If [`WriteBatch::clear`] was requested, every existing key is removed.
//! 2. Operations are applied in the order they were recorded; the last
//!    operation on a key wins.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::StorageResult;
use crate::store::PreferenceStore;
use crate::value::StoredValue;

/// A single recorded operation.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    /// Store `value` at `key`, replacing any previous value.
    Put(String, StoredValue),
    /// Remove `key` if it exists.
    Remove(String),
}

impl BatchOp {
    /// Returns the key this operation targets.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Put(key, _) | Self::Remove(key) => key,
        }
    }
}

/// An ordered, uncommitted set of writes and removals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    clear: bool,
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a put.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<StoredValue>) {
        self.ops.push(BatchOp::Put(key.into(), value.into()));
    }

    /// Records a removal.
    pub fn remove(&mut self, key: impl Into<String>) {
        self.ops.push(BatchOp::Remove(key.into()));
    }

    /// Requests that the store be emptied before the recorded operations run.
    pub fn clear(&mut self) {
        self.clear = true;
    }

    /// Returns `true` if the batch empties the store first.
    #[must_use]
    pub const fn clears(&self) -> bool {
        self.clear
    }

    /// Returns the recorded operations in order.
    #[must_use]
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// Returns the number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if the batch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.clear && self.ops.is_empty()
    }

    /// Applies this batch to an in-memory map following the documented order.
    ///
    /// Backends holding their data in a `BTreeMap` use this directly; others
    /// replay [`ops`](Self::ops) inside their own transaction.
    pub fn apply_to(self, map: &mut BTreeMap<String, StoredValue>) {
        if self.clear {
            map.clear();
        }
        for op in self.ops {
            match op {
                BatchOp::Put(key, value) => {
                    map.insert(key, value);
                }
                BatchOp::Remove(key) => {
                    map.remove(&key);
                }
            }
        }
    }
}

/// A write handle bound to a store, returned by [`PreferenceStore::edit`].
///
/// Mirrors an editor of a preference file: typed `put_*` calls are buffered
/// and [`commit`](Self::commit) applies them atomically.
///
/// # Example
///
/// ```
/// use flatprefs_storage::{MemoryStore, PreferenceStore};
///
/// let store = MemoryStore::new();
/// let mut editor = store.edit();
/// editor.put_int("volume", 7).put_string("theme", "dark");
/// editor.commit()?;
///
/// assert_eq!(store.get_int("volume")?, Some(7));
/// # Ok::<(), flatprefs_storage::StorageError>(())
/// ```
#[must_use = "an editor does nothing until committed"]
pub struct Editor<'a, S: PreferenceStore + ?Sized> {
    store: &'a S,
    batch: WriteBatch,
}

impl<'a, S: PreferenceStore + ?Sized> Editor<'a, S> {
    /// Creates an editor over `store` with an empty batch.
    pub fn new(store: &'a S) -> Self {
        Self { store, batch: WriteBatch::new() }
    }

    /// Buffers a boolean.
    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) -> &mut Self {
        self.batch.put(key, value);
        self
    }

    /// Buffers a 32-bit integer.
    pub fn put_int(&mut self, key: impl Into<String>, value: i32) -> &mut Self {
        self.batch.put(key, value);
        self
    }

    /// Buffers a 64-bit integer.
    pub fn put_long(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.batch.put(key, value);
        self
    }

    /// Buffers a float.
    pub fn put_float(&mut self, key: impl Into<String>, value: f32) -> &mut Self {
        self.batch.put(key, value);
        self
    }

    /// Buffers a string.
    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.batch.put(key, StoredValue::String(value.into()));
        self
    }

    /// Buffers a string set.
    pub fn put_string_set(
        &mut self,
        key: impl Into<String>,
        value: BTreeSet<Option<String>>,
    ) -> &mut Self {
        self.batch.put(key, value);
        self
    }

    /// Buffers an already-built value.
    pub fn put(&mut self, key: impl Into<String>, value: StoredValue) -> &mut Self {
        self.batch.put(key, value);
        self
    }

    /// Buffers a removal.
    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        self.batch.remove(key);
        self
    }

    /// Empties the store before the buffered operations are applied.
    pub fn clear(&mut self) -> &mut Self {
        self.batch.clear();
        self
    }

    /// Returns the pending batch.
    #[must_use]
    pub const fn batch(&self) -> &WriteBatch {
        &self.batch
    }

    /// Applies every buffered operation to the store.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend's [`PreferenceStore::apply`] reports.
    pub fn commit(self) -> StorageResult<()> {
        self.store.apply(self.batch)
    }

    /// Detaches the batch from the store without applying it.
    #[must_use]
    pub fn into_batch(self) -> WriteBatch {
        self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_op_wins() {
        let mut map = BTreeMap::new();
        map.insert("a".to_owned(), StoredValue::Int(1));

        let mut batch = WriteBatch::new();
        batch.remove("a");
        batch.put("a", 2i32);
        batch.put("b", true);
        batch.remove("b");
        batch.apply_to(&mut map);

        assert_eq!(map.get("a"), Some(&StoredValue::Int(2)));
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn test_clear_runs_first() {
        let mut map = BTreeMap::new();
        map.insert("old".to_owned(), StoredValue::Int(1));

        let mut batch = WriteBatch::new();
        batch.put("new", 1i64);
        batch.clear();
        batch.apply_to(&mut map);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("new"), Some(&StoredValue::Long(1)));
    }

    #[test]
    fn test_empty_batch() {
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());
        batch.clear();
        assert!(!batch.is_empty());
        assert_eq!(batch.len(), 0);
    }
}
