//! Redb preference store implementation.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use redb::{Database, ReadableTable, TableError};
use tracing::{debug, trace};

use crate::batch::{BatchOp, WriteBatch};
use crate::encoding::{decode_value, encode_value};
use crate::error::{StorageError, StorageResult};
use crate::store::PreferenceStore;
use crate::value::StoredValue;

use super::tables::PREFS_TABLE;

/// Configuration options for the Redb store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbConfig {
    /// Cache size in bytes.
    /// If not set, uses Redb's default.
    pub cache_size: Option<usize>,
}

impl RedbConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }
}

/// A preference store backed by Redb.
///
/// Each [`apply`](PreferenceStore::apply) runs inside one Redb write
/// transaction, which gives batch atomicity and durability on commit.
///
/// # Example
///
/// ```no_run
/// use flatprefs_storage::backends::RedbStore;
/// use flatprefs_storage::PreferenceStore;
///
/// let store = RedbStore::open("settings.redb")?;
/// let mut editor = store.edit();
/// editor.put_string("theme", "dark");
/// editor.commit()?;
/// # Ok::<(), flatprefs_storage::StorageError>(())
/// ```
pub struct RedbStore {
    db: Database,
    access: Mutex<()>,
}

impl RedbStore {
    /// Open or create a store at the given path with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open or create a store at the given path with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open_with_config(path: impl AsRef<Path>, config: RedbConfig) -> StorageResult<Self> {
        let mut builder = Database::builder();
        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }
        let db = builder.create(path.as_ref()).map_err(|e| StorageError::Open(e.to_string()))?;
        debug!(path = %path.as_ref().display(), "opened redb preference store");
        Ok(Self { db, access: Mutex::new(()) })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory() -> StorageResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StorageError::Open(e.to_string()))?;
        Ok(Self { db, access: Mutex::new(()) })
    }

    /// Get the underlying Redb database.
    #[must_use]
    pub const fn inner(&self) -> &Database {
        &self.db
    }
}

impl fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl PreferenceStore for RedbStore {
    fn get(&self, key: &str) -> StorageResult<Option<StoredValue>> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        let table = match tx.open_table(PREFS_TABLE) {
            Ok(t) => t,
            // No table means nothing was ever written.
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(StorageError::Internal(e.to_string())),
        };
        match table.get(key).map_err(|e| StorageError::Internal(e.to_string()))? {
            Some(guard) => decode_value(key, guard.value()).map(Some),
            None => Ok(None),
        }
    }

    fn keys(&self) -> StorageResult<BTreeSet<String>> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        let table = match tx.open_table(PREFS_TABLE) {
            Ok(t) => t,
            Err(TableError::TableDoesNotExist(_)) => return Ok(BTreeSet::new()),
            Err(e) => return Err(StorageError::Internal(e.to_string())),
        };
        let mut keys = BTreeSet::new();
        for entry in table.iter().map_err(|e| StorageError::Internal(e.to_string()))? {
            let (key, _) = entry.map_err(|e| StorageError::Internal(e.to_string()))?;
            keys.insert(key.value().to_owned());
        }
        Ok(keys)
    }

    fn apply(&self, batch: WriteBatch) -> StorageResult<()> {
        trace!(ops = batch.len(), clear = batch.clears(), "applying batch to redb store");
        let tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
        {
            let mut table =
                tx.open_table(PREFS_TABLE).map_err(|e| StorageError::Internal(e.to_string()))?;

            if batch.clears() {
                let mut existing = Vec::new();
                for entry in table.iter().map_err(|e| StorageError::Internal(e.to_string()))? {
                    let (key, _) = entry.map_err(|e| StorageError::Internal(e.to_string()))?;
                    existing.push(key.value().to_owned());
                }
                for key in existing {
                    table
                        .remove(key.as_str())
                        .map_err(|e| StorageError::Internal(e.to_string()))?;
                }
            }

            for op in batch.ops() {
                match op {
                    BatchOp::Put(key, value) => {
                        let bytes = encode_value(key, value)?;
                        table
                            .insert(key.as_str(), bytes.as_slice())
                            .map_err(|e| StorageError::Internal(e.to_string()))?;
                    }
                    BatchOp::Remove(key) => {
                        table
                            .remove(key.as_str())
                            .map_err(|e| StorageError::Internal(e.to_string()))?;
                    }
                }
            }
        }
        // Dropping `tx` on an early return above aborts it, so nothing partial is visible.
        tx.commit().map_err(|e| StorageError::Transaction(e.to_string()))
    }

    fn access_lock(&self) -> &Mutex<()> {
        &self.access
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_creation() {
        let store = RedbStore::in_memory().expect("failed to create in-memory store");
        assert!(store.keys().expect("keys").is_empty());
        assert_eq!(store.get("missing").expect("get"), None);
    }

    #[test]
    fn test_config_builder() {
        let config = RedbConfig::new().cache_size(1024 * 1024 * 10);
        assert_eq!(config.cache_size, Some(10 * 1024 * 1024));
    }

    #[test]
    fn test_write_and_read() {
        let store = RedbStore::in_memory().expect("failed to create in-memory store");

        let mut editor = store.edit();
        editor.put_string("key", "value");
        editor.commit().expect("failed to commit");

        assert_eq!(store.get_string("key").expect("get").as_deref(), Some("value"));
    }

    #[test]
    fn test_debug_does_not_expose_internals() {
        let store = RedbStore::in_memory().expect("failed to create in-memory store");
        assert_eq!(format!("{store:?}"), "RedbStore { .. }");
    }
}
