//! flatprefs Storage
//!
//! This crate provides the primitive key-value store abstraction that the
//! flatprefs codec writes to, plus backend implementations.
//!
//! # Overview
//!
//! A preference store only understands six value kinds (see [`StoredValue`]):
//! booleans, 32-bit and 64-bit integers, 32-bit floats, strings and string
//! sets. Keys are plain strings. Writes are buffered in a [`WriteBatch`] and
//! applied atomically.
//!
//! # Core Types
//!
//! - [`PreferenceStore`] - point reads, key enumeration and batch application
//! - [`WriteBatch`] / [`Editor`] - buffered puts and removals
//! - [`StoredValue`] - the primitive value vocabulary
//!
//! # Error Handling
//!
//! All storage operations return [`StorageResult<T>`], which is an alias for
//! `Result<T, StorageError>`.
//!
//! # Example
//!
//! ```
//! use flatprefs_storage::{MemoryStore, PreferenceStore};
//!
//! let store = MemoryStore::new();
//!
//! let mut editor = store.edit();
//! editor.put_string("person.name", "Abby").put_int("person.age", 20);
//! editor.commit()?;
//!
//! assert_eq!(store.get_int("person.age")?, Some(20));
//! assert!(store.keys()?.contains("person.name"));
//! # Ok::<(), flatprefs_storage::StorageError>(())
//! ```
//!
//! # Modules
//!
//! - [`backends`] - Concrete store implementations
//! - [`encoding`] - Binary value encoding used by persistent backends

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod backends;
mod batch;
pub mod encoding;
mod error;
mod store;
mod value;

pub use backends::{MemoryStore, RedbConfig, RedbStore};
pub use batch::{BatchOp, Editor, WriteBatch};
pub use error::{StorageError, StorageResult};
pub use store::PreferenceStore;
pub use value::{StoredKind, StoredValue};
