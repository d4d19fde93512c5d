//! Error types for the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// No store specified.
    #[error("no store specified. Use --store or set FLATPREFS_STORE environment variable")]
    NoStoreSpecified,

    /// Store file not found.
    #[error("store not found: {0}")]
    StoreNotFound(PathBuf),

    /// Nothing stored at the requested key.
    #[error("no value stored at '{0}'")]
    KeyNotFound(String),

    /// Codec error.
    #[error("codec error: {0}")]
    Codec(#[from] flatprefs::Error),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] flatprefs_storage::StorageError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
