//! In-memory store backend.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, RwLock};

use tracing::trace;

use crate::batch::WriteBatch;
use crate::error::{StorageError, StorageResult};
use crate::store::PreferenceStore;
use crate::value::StoredValue;

/// A store that keeps every value in a `BTreeMap`.
///
/// Batches are applied under a write lock, so readers never observe half of
/// a batch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, StoredValue>>,
    access: Mutex<()>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (String, StoredValue)>) -> Self {
        Self { data: RwLock::new(entries.into_iter().collect()), access: Mutex::new(()) }
    }

    /// Returns a copy of the whole map.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::LockPoisoned`] if a writer panicked.
    pub fn snapshot(&self) -> StorageResult<BTreeMap<String, StoredValue>> {
        let data = self.data.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(data.clone())
    }

    /// Returns the number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::LockPoisoned`] if a writer panicked.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.data.read().map_err(|_| StorageError::LockPoisoned)?.len())
    }

    /// Returns `true` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::LockPoisoned`] if a writer panicked.
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<StoredValue>> {
        let data = self.data.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(data.get(key).cloned())
    }

    fn keys(&self) -> StorageResult<BTreeSet<String>> {
        let data = self.data.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(data.keys().cloned().collect())
    }

    fn apply(&self, batch: WriteBatch) -> StorageResult<()> {
        trace!(ops = batch.len(), clear = batch.clears(), "applying batch to memory store");
        let mut data = self.data.write().map_err(|_| StorageError::LockPoisoned)?;
        batch.apply_to(&mut data);
        Ok(())
    }

    fn access_lock(&self) -> &Mutex<()> {
        &self.access
    }

    fn contains(&self, key: &str) -> StorageResult<bool> {
        let data = self.data.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(data.contains_key(key))
    }
}
