//! Redb storage backend.
//!
//! This module provides a persistent [`PreferenceStore`](crate::PreferenceStore)
//! implementation on the [Redb](https://github.com/cberner/redb) embedded
//! database. Every key lives in one physical table; values are stored in the
//! tagged binary format of [`crate::encoding`].

mod store;
mod tables;

pub use store::{RedbConfig, RedbStore};
pub use tables::PREFS_TABLE;
