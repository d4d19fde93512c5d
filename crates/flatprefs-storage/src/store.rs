//! The preference store trait.
//!
//! [`PreferenceStore`] is the whole contract the codec relies on: point reads,
//! a full key enumeration and atomic batch application. Backends decide how
//! values are persisted.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::batch::{Editor, WriteBatch};
use crate::error::{StorageError, StorageResult};
use crate::value::{StoredKind, StoredValue};

/// A flat mapping of string keys to [`StoredValue`]s.
///
/// Implementations must be thread-safe (`Send + Sync`). Each call to
/// [`apply`](Self::apply) must be atomic: readers observe either none or all
/// of a batch. Nothing is promised across separate calls; callers needing
/// that serialize through [`access_lock`](Self::access_lock).
///
/// # Example
///
/// ```
/// use flatprefs_storage::{MemoryStore, PreferenceStore, StoredValue, WriteBatch};
///
/// fn example<S: PreferenceStore>(store: &S) -> flatprefs_storage::StorageResult<()> {
///     let mut batch = WriteBatch::new();
///     batch.put("user.name", "Abby");
///     batch.put("user.age", 20i32);
///     store.apply(batch)?;
///
///     assert_eq!(store.get_string("user.name")?.as_deref(), Some("Abby"));
///     assert_eq!(store.keys()?.len(), 2);
///     Ok(())
/// }
/// example(&MemoryStore::new())?;
/// # Ok::<(), flatprefs_storage::StorageError>(())
/// ```
pub trait PreferenceStore: Send + Sync {
    /// Reads the value stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the stored bytes are
    /// corrupted.
    fn get(&self, key: &str) -> StorageResult<Option<StoredValue>>;

    /// Enumerates every key in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys(&self) -> StorageResult<BTreeSet<String>>;

    /// Applies a batch atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch could not be committed; in that case no
    /// operation of the batch is visible.
    fn apply(&self, batch: WriteBatch) -> StorageResult<()>;

    /// The lock serializing codec calls on this store instance.
    ///
    /// The store itself never takes this lock.
    fn access_lock(&self) -> &Mutex<()>;

    /// Returns `true` if a value is stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Starts buffering writes against this store.
    fn edit(&self) -> Editor<'_, Self>
    where
        Self: Sized,
    {
        Editor::new(self)
    }

    /// Reads a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TypeMismatch`] if another kind is stored.
    fn get_bool(&self, key: &str) -> StorageResult<Option<bool>> {
        typed(key, self.get(key)?, StoredKind::Bool, |v| v.as_bool())
    }

    /// Reads a 32-bit integer.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TypeMismatch`] if another kind is stored.
    fn get_int(&self, key: &str) -> StorageResult<Option<i32>> {
        typed(key, self.get(key)?, StoredKind::Int, |v| v.as_int())
    }

    /// Reads a 64-bit integer.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TypeMismatch`] if another kind is stored.
    fn get_long(&self, key: &str) -> StorageResult<Option<i64>> {
        typed(key, self.get(key)?, StoredKind::Long, |v| v.as_long())
    }

    /// Reads a float.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TypeMismatch`] if another kind is stored.
    fn get_float(&self, key: &str) -> StorageResult<Option<f32>> {
        typed(key, self.get(key)?, StoredKind::Float, |v| v.as_float())
    }

    /// Reads a string.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TypeMismatch`] if another kind is stored.
    fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoredValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch(key, StoredKind::String, &other)),
        }
    }

    /// Reads a string set.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TypeMismatch`] if another kind is stored.
    fn get_string_set(&self, key: &str) -> StorageResult<Option<BTreeSet<Option<String>>>> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoredValue::StringSet(set)) => Ok(Some(set)),
            Some(other) => Err(mismatch(key, StoredKind::StringSet, &other)),
        }
    }
}

fn typed<T>(
    key: &str,
    value: Option<StoredValue>,
    expected: StoredKind,
    extract: impl FnOnce(&StoredValue) -> Option<T>,
) -> StorageResult<Option<T>> {
    match value {
        None => Ok(None),
        Some(v) => extract(&v).map(Some).ok_or_else(|| mismatch(key, expected, &v)),
    }
}

fn mismatch(key: &str, expected: StoredKind, actual: &StoredValue) -> StorageError {
    StorageError::TypeMismatch { key: key.to_owned(), expected, actual: actual.kind() }
}

// ============================================================================
// Blanket Implementations
// ============================================================================

/// Implement `PreferenceStore` for `Arc<S>` so one store can back several
/// codec instances.
impl<S: PreferenceStore + ?Sized> PreferenceStore for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<StoredValue>> {
        (**self).get(key)
    }

    fn keys(&self) -> StorageResult<BTreeSet<String>> {
        (**self).keys()
    }

    fn apply(&self, batch: WriteBatch) -> StorageResult<()> {
        (**self).apply(batch)
    }

    fn access_lock(&self) -> &Mutex<()> {
        (**self).access_lock()
    }

    fn contains(&self, key: &str) -> StorageResult<bool> {
        (**self).contains(key)
    }
}
