//! Tag composition and key-space queries.
//!
//! A tag is a dotted path. Children of `tag` are `tag.<field>` for object
//! fields, `tag.<index>` for list elements, `tag.type` / `tag.value` for
//! polymorphic values and `tag.$isNotNull` for presence markers. These
//! strings are the on-disk format.

use std::collections::BTreeSet;

use tracing::trace;

use crate::error::{Error, Result};

/// Key suffix of the presence marker written for optional values.
pub const NOT_NULL_MARKER: &str = "$isNotNull";
/// Key suffix holding a polymorphic value's variant name.
pub const TYPE_KEY: &str = "type";
/// Key suffix holding a polymorphic value's payload.
pub const VALUE_KEY: &str = "value";

/// Composes a child tag.
#[must_use]
pub fn compose(parent: &str, name: &str) -> String {
    let mut tag = String::with_capacity(parent.len() + 1 + name.len());
    tag.push_str(parent);
    tag.push('.');
    tag.push_str(name);
    tag
}

/// Composes the tag of the element at `index`.
#[must_use]
pub fn compose_index(parent: &str, index: usize) -> String {
    format!("{parent}.{index}")
}

/// Returns `true` if `key` is `tag` itself or lies beneath it.
#[must_use]
pub fn is_under(key: &str, tag: &str) -> bool {
    match key.strip_prefix(tag) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Iterates the keys strictly beneath `tag`, in order.
pub fn children<'a>(keys: &'a BTreeSet<String>, tag: &str) -> impl Iterator<Item = &'a str> + 'a {
    let prefix = format!("{tag}.");
    keys.range(prefix.clone()..)
        .take_while(move |key| key.starts_with(&prefix))
        .map(String::as_str)
}

/// Returns `true` if any key lies strictly beneath `tag`.
#[must_use]
pub fn has_children(keys: &BTreeSet<String>, tag: &str) -> bool {
    children(keys, tag).next().is_some()
}

/// Returns `true` if `tag` or anything beneath it is stored.
#[must_use]
pub fn is_stored(keys: &BTreeSet<String>, tag: &str) -> bool {
    keys.contains(tag) || has_children(keys, tag)
}

/// Infers the length of the collection stored at `tag`.
///
/// The length is one past the largest leading decimal segment among the
/// keys beneath `tag`; segments that are not indices are ignored.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if the largest index is `usize::MAX`, whose
/// length cannot be represented.
pub fn collection_size(keys: &BTreeSet<String>, tag: &str) -> Result<usize> {
    let start = tag.len() + 1;
    let Some(max) = children(keys, tag)
        .filter_map(|key| {
            let rest = &key[start..];
            let segment = rest.split('.').next().unwrap_or(rest);
            segment.parse::<usize>().ok()
        })
        .max()
    else {
        trace!(tag, size = 0, "inferred collection size");
        return Ok(0);
    };
    let size = max.checked_add(1).ok_or_else(|| Error::OutOfRange {
        tag: compose_index(tag, max),
        value: max.to_string(),
        target: "collection index",
    })?;
    trace!(tag, size, "inferred collection size");
    Ok(size)
}
