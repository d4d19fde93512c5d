//! Tests for the Redb store backend.
//!
//! This module runs the standard store compliance tests against the Redb
//! backend, plus Redb-specific tests.

mod store_tests;

use flatprefs_storage::backends::RedbStore;
use flatprefs_storage::{PreferenceStore, StorageResult, StoredValue};

use store_tests::{run_test_suite, TestHarness};

/// Test harness for the Redb in-memory backend.
struct RedbHarness;

impl TestHarness for RedbHarness {
    type Store = RedbStore;

    fn create_store() -> StorageResult<Self::Store> {
        RedbStore::in_memory()
    }
}

#[test]
fn test_redb_compliance() {
    run_test_suite::<RedbHarness>();
}

/// Values survive closing and reopening the file.
#[test]
fn test_persistence_across_reopen() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("prefs.redb");

    {
        let store = RedbStore::open(&path).expect("failed to open store");
        let mut editor = store.edit();
        editor.put_string("user.name", "Abby").put_float("user.height", 1.7);
        editor.commit().expect("failed to commit");
    }

    let store = RedbStore::open(&path).expect("failed to reopen store");
    assert_eq!(store.get_string("user.name").expect("get").as_deref(), Some("Abby"));
    assert_eq!(store.get("user.height").expect("get"), Some(StoredValue::Float(1.7)));
}

/// Reading an untouched database is not an error.
#[test]
fn test_empty_database_reads() {
    let store = RedbStore::in_memory().expect("failed to create store");
    assert_eq!(store.get("anything").expect("get"), None);
    assert!(store.keys().expect("keys").is_empty());
}
