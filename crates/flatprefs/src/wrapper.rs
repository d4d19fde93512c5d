//! Root-level encode and decode.
//!
//! Every public entry point funnels through here. A root tag differs from a
//! nested one in three ways: its subtree is cleared before writing, the
//! whole batch is committed at once, and a root with nothing stored is
//! either an error or replaced by a caller default.

use std::collections::BTreeSet;
use std::sync::MutexGuard;

use flatprefs_storage::{PreferenceStore, WriteBatch};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cleanup;
use crate::config::Configuration;
use crate::de::Position;
use crate::error::{Error, Result};
use crate::path;
use crate::ser::Encoder;

/// Holds the store's access lock when the configuration asks for it.
fn lock<'s, S: PreferenceStore>(
    store: &'s S,
    config: &Configuration,
) -> Result<Option<MutexGuard<'s, ()>>> {
    if !config.synchronize_access() {
        return Ok(None);
    }
    store.access_lock().lock().map(Some).map_err(|_| Error::LockPoisoned)
}

fn traverse<T: DeserializeOwned>(
    store: &dyn PreferenceStore,
    keys: &BTreeSet<String>,
    config: &Configuration,
    tag: &str,
) -> Result<T> {
    let position = Position::new(tag, store, keys, config);
    T::deserialize(position.decoder())
}

/// Stores `value` at `tag`, replacing whatever was stored there before.
///
/// The previous subtree at `tag` is cleared and the new value written in a
/// single batch. If encoding fails, the store is left untouched.
///
/// # Errors
///
/// Returns [`Error::EmptyStructureNotAllowed`] for empty structures when
/// markers are disabled, or any error of the store.
pub fn encode<S, T>(store: &S, config: &Configuration, tag: &str, value: &T) -> Result<()>
where
    S: PreferenceStore,
    T: Serialize + ?Sized,
{
    let _guard = lock(store, config)?;
    let keys = store.keys()?;

    let mut batch = WriteBatch::new();
    let removed = cleanup::clear(&keys, tag, &mut batch);
    value.serialize(Encoder::new(tag, &mut batch, config))?;

    debug!(tag, removed, ops = batch.len(), "encode");
    store.apply(batch)?;
    Ok(())
}

/// Reads the value stored at `tag`.
///
/// # Errors
///
/// Returns [`Error::ValueNotProvided`] if nothing is stored at or beneath
/// `tag` and the target could be built from nothing (an `Option` or a
/// struct whose fields all have defaults); otherwise the first decoding
/// error, such as [`Error::MissingProperty`].
pub fn decode<S, T>(store: &S, config: &Configuration, tag: &str) -> Result<T>
where
    S: PreferenceStore,
    T: DeserializeOwned,
{
    let _guard = lock(store, config)?;
    let keys = store.keys()?;
    let stored = path::is_stored(&keys, tag);
    debug!(tag, stored, "decode");

    let value = traverse(store, &keys, config, tag)?;
    if stored {
        Ok(value)
    } else {
        Err(Error::ValueNotProvided { tag: tag.to_owned() })
    }
}

/// Reads the value stored at `tag`, or returns `default` if nothing is
/// stored at or beneath it. The store is never written.
///
/// # Errors
///
/// Returns a decoding error if something is stored but does not fit `T`.
pub fn decode_or_default<S, T>(store: &S, config: &Configuration, tag: &str, default: T) -> Result<T>
where
    S: PreferenceStore,
    T: DeserializeOwned,
{
    decode_or_else(store, config, tag, || default)
}

/// Like [`decode_or_default`], computing the default only when needed.
///
/// # Errors
///
/// Returns a decoding error if something is stored but does not fit `T`.
pub fn decode_or_else<S, T, F>(store: &S, config: &Configuration, tag: &str, default: F) -> Result<T>
where
    S: PreferenceStore,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let _guard = lock(store, config)?;
    let keys = store.keys()?;
    if !path::is_stored(&keys, tag) {
        debug!(tag, "nothing stored, using default");
        return Ok(default());
    }
    debug!(tag, "decode");
    traverse(store, &keys, config, tag)
}

/// Removes `tag` and everything beneath it. Returns the number of keys
/// removed.
///
/// # Errors
///
/// Returns any error of the store.
pub fn remove<S: PreferenceStore>(store: &S, config: &Configuration, tag: &str) -> Result<usize> {
    let _guard = lock(store, config)?;
    let keys = store.keys()?;
    let mut batch = WriteBatch::new();
    let removed = cleanup::clear(&keys, tag, &mut batch);
    if removed > 0 {
        debug!(tag, removed, "remove");
        store.apply(batch)?;
    }
    Ok(removed)
}

/// Returns `true` if anything is stored at or beneath `tag`.
///
/// # Errors
///
/// Returns any error of the store.
pub fn contains<S: PreferenceStore>(store: &S, config: &Configuration, tag: &str) -> Result<bool> {
    let _guard = lock(store, config)?;
    Ok(path::is_stored(&store.keys()?, tag))
}

