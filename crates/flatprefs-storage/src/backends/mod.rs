//! Concrete store backends.
//!
//! - [`MemoryStore`] - a map guarded by a lock, for tests and ephemeral state
//! - [`RedbStore`] - a persistent store on the Redb embedded database

mod memory;
pub mod redb;

pub use memory::MemoryStore;
pub use self::redb::{RedbConfig, RedbStore};
