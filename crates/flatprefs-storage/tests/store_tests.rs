//! Tests for the preference store contract.
//!
//! These tests validate the trait contract and can be run against any
//! store implementation.

#![allow(dead_code)]

use std::collections::BTreeSet;

use flatprefs_storage::{
    PreferenceStore, StorageError, StorageResult, StoredKind, StoredValue, WriteBatch,
};

/// A test harness trait for testing store implementations.
pub trait TestHarness {
    /// The store type being tested.
    type Store: PreferenceStore;

    /// Create a new, empty store for testing.
    fn create_store() -> StorageResult<Self::Store>;
}

/// Run the standard test suite against a store.
pub fn run_test_suite<H: TestHarness>() {
    test_basic_operations::<H>();
    test_all_kinds::<H>();
    test_type_mismatch::<H>();
    test_key_enumeration::<H>();
    test_clear::<H>();
    test_removal_then_put::<H>();
    test_discarded_editor::<H>();
}

/// Test basic put/get/remove.
fn test_basic_operations<H: TestHarness>() {
    let store = H::create_store().expect("failed to create store");

    let mut editor = store.edit();
    editor.put_int("key1", 1);
    editor.commit().expect("failed to commit");
    assert_eq!(store.get_int("key1").expect("failed to get"), Some(1));

    let mut editor = store.edit();
    editor.put_int("key1", 2);
    editor.commit().expect("failed to commit");
    assert_eq!(store.get_int("key1").expect("failed to get"), Some(2));

    let mut editor = store.edit();
    editor.remove("key1");
    editor.commit().expect("failed to commit");
    assert_eq!(store.get("key1").expect("failed to get"), None);
    assert!(!store.contains("key1").expect("failed to check"));
}

/// Every primitive kind survives a write and a read.
fn test_all_kinds<H: TestHarness>() {
    let store = H::create_store().expect("failed to create store");
    let set: BTreeSet<Option<String>> =
        [Some("foo".to_owned()), Some("bar".to_owned()), None].into_iter().collect();

    let mut editor = store.edit();
    editor
        .put_bool("b", true)
        .put_int("i", -12)
        .put_long("l", -1234)
        .put_float("f", 12.6)
        .put_string("s", "foobar")
        .put_string_set("set", set.clone());
    editor.commit().expect("failed to commit");

    assert_eq!(store.get_bool("b").expect("get"), Some(true));
    assert_eq!(store.get_int("i").expect("get"), Some(-12));
    assert_eq!(store.get_long("l").expect("get"), Some(-1234));
    assert_eq!(store.get_float("f").expect("get"), Some(12.6));
    assert_eq!(store.get_string("s").expect("get").as_deref(), Some("foobar"));
    assert_eq!(store.get_string_set("set").expect("get"), Some(set));
}

/// Typed getters refuse values of another kind.
fn test_type_mismatch<H: TestHarness>() {
    let store = H::create_store().expect("failed to create store");
    let mut editor = store.edit();
    editor.put_int("n", 4);
    editor.commit().expect("failed to commit");

    let err = store.get_string("n").expect_err("should be a mismatch");
    match err {
        StorageError::TypeMismatch { key, expected, actual } => {
            assert_eq!(key, "n");
            assert_eq!(expected, StoredKind::String);
            assert_eq!(actual, StoredKind::Int);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.get_long("n").is_err());
}

/// Key enumeration returns exactly the stored keys.
fn test_key_enumeration<H: TestHarness>() {
    let store = H::create_store().expect("failed to create store");
    assert!(store.keys().expect("keys").is_empty());

    let mut batch = WriteBatch::new();
    batch.put("list.0", 1i32);
    batch.put("list.1", 2i32);
    batch.put("other", "x");
    store.apply(batch).expect("failed to apply");

    let keys: Vec<String> = store.keys().expect("keys").into_iter().collect();
    assert_eq!(keys, vec!["list.0", "list.1", "other"]);
}

/// A clearing batch empties the store before its own writes.
fn test_clear<H: TestHarness>() {
    let store = H::create_store().expect("failed to create store");
    let mut batch = WriteBatch::new();
    batch.put("a", 1i32);
    batch.put("b", 2i32);
    store.apply(batch).expect("failed to apply");

    let mut editor = store.edit();
    editor.put_bool("c", true).clear();
    editor.commit().expect("failed to commit");

    let keys: Vec<String> = store.keys().expect("keys").into_iter().collect();
    assert_eq!(keys, vec!["c"]);
}

/// A removal followed by a put of the same key keeps the put.
fn test_removal_then_put<H: TestHarness>() {
    let store = H::create_store().expect("failed to create store");
    let mut batch = WriteBatch::new();
    batch.put("tag", StoredValue::Bool(true));
    store.apply(batch).expect("failed to apply");

    let mut batch = WriteBatch::new();
    batch.remove("tag");
    batch.put("tag", StoredValue::String("again".into()));
    store.apply(batch).expect("failed to apply");

    assert_eq!(store.get_string("tag").expect("get").as_deref(), Some("again"));
}

/// Dropping an editor leaves the store untouched.
fn test_discarded_editor<H: TestHarness>() {
    let store = H::create_store().expect("failed to create store");
    {
        let mut editor = store.edit();
        editor.put_int("never", 1);
        assert_eq!(editor.batch().len(), 1);
    }
    assert!(store.keys().expect("keys").is_empty());
}
