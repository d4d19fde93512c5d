//! Command implementations.

pub mod dump;
pub mod get;
pub mod keys;
pub mod remove;

use std::collections::BTreeMap;
use std::path::Path;

use flatprefs::path;
use flatprefs::{PreferenceStore, RedbStore};
use flatprefs_storage::StoredValue;

use crate::error::{CliError, Result};

/// Open the store at the given path, or return an error if no path is provided.
pub fn open_store(path: Option<&Path>) -> Result<RedbStore> {
    let path = path.ok_or(CliError::NoStoreSpecified)?;

    if !path.exists() {
        return Err(CliError::StoreNotFound(path.to_path_buf()));
    }

    Ok(RedbStore::open(path)?)
}

/// Read every entry at or beneath `tag`, or the whole store without one.
pub fn entries_under<S: PreferenceStore>(
    store: &S,
    tag: Option<&str>,
) -> Result<BTreeMap<String, StoredValue>> {
    let mut entries = BTreeMap::new();
    for key in store.keys()? {
        if tag.is_some_and(|tag| !path::is_under(&key, tag)) {
            continue;
        }
        if let Some(value) = store.get(&key)? {
            entries.insert(key, value);
        }
    }
    Ok(entries)
}
