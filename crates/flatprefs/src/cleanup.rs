//! Removal of stale subtrees.

use std::collections::BTreeSet;

use flatprefs_storage::WriteBatch;

use crate::path;

/// Schedules removal of `tag` and every key beneath it.
///
/// Runs once per encode call, at the root tag, before anything is written.
/// Later puts in the same batch win over these removals, so only keys the
/// new value does not rewrite disappear.
pub fn clear(keys: &BTreeSet<String>, tag: &str, batch: &mut WriteBatch) -> usize {
    let mut removed = 0;
    if keys.contains(tag) {
        batch.remove(tag);
        removed += 1;
    }
    for key in path::children(keys, tag) {
        batch.remove(key);
        removed += 1;
    }
    removed
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use flatprefs_storage::StoredValue;

    use super::*;

    #[test]
    fn test_clear_subtree_only() {
        let mut map: BTreeMap<String, StoredValue> = ["list", "list.0", "list.1.x", "list2", "other"]
            .into_iter()
            .map(|k| (k.to_owned(), StoredValue::Bool(true)))
            .collect();
        let keys: BTreeSet<String> = map.keys().cloned().collect();

        let mut batch = WriteBatch::new();
        assert_eq!(clear(&keys, "list", &mut batch), 3);
        batch.apply_to(&mut map);

        let left: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(left, vec!["list2", "other"]);
    }
}
