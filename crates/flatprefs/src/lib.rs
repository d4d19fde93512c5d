//! flatprefs
//!
//! Stores structured values in a flat key-value preference store that only
//! understands booleans, 32/64-bit integers, floats, strings and string
//! sets.
//!
//! # Overview
//!
//! Any type implementing serde's `Serialize` / `Deserialize` can be stored
//! under a root tag. Nested values get dotted child tags:
//!
//! | Value | Keys written |
//! |---|---|
//! | primitive | `tag` |
//! | struct field | `tag.field` |
//! | list element | `tag.0`, `tag.1`, ... |
//! | map | keys at `tag.0`, `tag.2`, ...; values at `tag.1`, `tag.3`, ... |
//! | `Option` | `tag.$isNotNull`, plus `tag` when present |
//! | unit enum variant | the variant name at `tag` |
//! | data-carrying variant | `tag.type` (variant name) and `tag.value` |
//! | recognised string set | one native string set at `tag` |
//!
//! Collection lengths are never stored; they are inferred from the keys
//! present. Writing a value first clears the whole subtree at its tag, so a
//! shrinking list leaves nothing behind.
//!
//! # Example
//!
//! ```
//! use flatprefs::{MemoryStore, PreferenceStore, Preferences};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! enum Day {
//!     Monday,
//!     Wednesday,
//! }
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Schedule {
//!     days: Vec<Day>,
//!     note: Option<String>,
//! }
//!
//! let prefs = Preferences::new(MemoryStore::new());
//! let schedule = Schedule { days: vec![Day::Wednesday], note: None };
//! prefs.encode("schedule", &schedule)?;
//!
//! let keys: Vec<String> = prefs.store().keys()?.into_iter().collect();
//! assert_eq!(keys, ["schedule.days.0", "schedule.note.$isNotNull"]);
//! assert_eq!(prefs.store().get_string("schedule.days.0")?.as_deref(), Some("Wednesday"));
//! assert_eq!(prefs.decode::<Schedule>("schedule")?, schedule);
//! # Ok::<(), flatprefs::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`set`] - set types eligible for native string-set storage
//! - [`path`] - tag composition and key-space queries
//! - [`ser`] - the encoder

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

mod cleanup;
mod config;
mod de;
mod error;
pub mod path;
mod preferences;
mod property;
pub mod ser;
pub mod set;
mod wrapper;

pub use config::{
    Configuration, ConfigurationBuilder, DoubleRepresentation, BTREE_SET_NAME,
    DEFAULT_SET_SHAPE_RECOGNITION_NAMES, HASH_SET_NAME, STRING_SET_NAME,
};
pub use error::{Error, Result};
pub use preferences::{Preferences, PreferencesBuilder};
pub use property::Property;
pub use set::StringSet;
pub use wrapper::{contains, decode, decode_or_default, decode_or_else, encode, remove};

pub use flatprefs_storage as storage;
pub use flatprefs_storage::{MemoryStore, PreferenceStore, RedbStore};
