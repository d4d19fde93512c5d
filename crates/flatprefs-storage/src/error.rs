//! Storage error types.

use thiserror::Error;

use crate::value::StoredKind;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be opened.
    #[error("failed to open store: {0}")]
    Open(String),

    /// A backend transaction could not be started or committed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted bytes could not be decoded into a value.
    #[error("corrupted value for key '{key}': {reason}")]
    Corrupted {
        /// The key whose value failed to decode.
        key: String,
        /// What was wrong with the bytes.
        reason: String,
    },

    /// A typed getter found a value of another kind.
    #[error("type mismatch for key '{key}': expected {expected}, found {actual}")]
    TypeMismatch {
        /// The key that was read.
        key: String,
        /// The kind the caller asked for.
        expected: StoredKind,
        /// The kind actually stored.
        actual: StoredKind,
    },

    /// An internal lock was poisoned (a thread panicked while holding it).
    #[error("store lock poisoned")]
    LockPoisoned,

    /// An unexpected backend failure.
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Creates a corrupted-value error.
    #[must_use]
    pub fn corrupted(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupted { key: key.into(), reason: reason.into() }
    }
}
