//! Saved Query Invariant Tests
//!
//! - Built-in entries are always present and cannot be deleted
//! - Names are unique; texts are unique
//! - Persisted copies of built-ins and foreign ids are dropped on startup

use querydeck::catalog::builtin_queries;
use querydeck::persistence::{DurableStore, StoreKey};
use querydeck::saved::{SavedQueryError, SavedQueryStore, CUSTOM_ID_PREFIX};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (DurableStore, SavedQueryStore) {
    let store = DurableStore::in_memory();
    let mut saved = SavedQueryStore::new(store.clone());
    saved.initialize(&builtin_queries()).unwrap();
    (store, saved)
}

// =============================================================================
// Built-in Tests
// =============================================================================

/// Built-ins come first, in seed order, all protected.
#[test]
fn test_builtins_seeded_first() {
    let (_, saved) = setup();
    let queries = saved.queries().unwrap();
    let builtins = builtin_queries();

    assert_eq!(queries.len(), builtins.len());
    for (q, b) in queries.iter().zip(&builtins) {
        assert_eq!(q.id, b.id);
        assert!(q.is_protected);
    }
}

/// Deleting a built-in is refused and changes nothing.
#[test]
fn test_protected_delete_refused() {
    let (_, saved) = setup();
    let err = saved.delete(0).unwrap_err();
    assert!(matches!(err, SavedQueryError::Protected { .. }));
    assert_eq!(saved.queries().unwrap().len(), builtin_queries().len());
}

// =============================================================================
// Uniqueness Tests
// =============================================================================

/// A name already in use is refused, including built-in names.
#[test]
fn test_name_taken() {
    let (_, saved) = setup();
    saved.save("SELECT * FROM Orders", "orders").unwrap();

    let err = saved.save("SELECT * FROM Products", "orders").unwrap_err();
    assert!(matches!(err, SavedQueryError::NameTaken { .. }));

    let err = saved
        .save("SELECT * FROM Employees", "Customers by Country")
        .unwrap_err();
    assert!(matches!(err, SavedQueryError::NameTaken { .. }));
}

/// Saving an already saved text is refused, naming the existing entry.
#[test]
fn test_already_saved() {
    let (_, saved) = setup();
    let builtin = &builtin_queries()[0];

    let err = saved.save(&builtin.query, "mine").unwrap_err();
    match err {
        SavedQueryError::AlreadySaved { name } => assert_eq!(name, builtin.name),
        other => panic!("expected AlreadySaved, got {:?}", other),
    }
}

/// Blank names are refused; names are trimmed.
#[test]
fn test_name_trimmed() {
    let (_, saved) = setup();
    assert!(matches!(
        saved.save("SELECT 1", "   ").unwrap_err(),
        SavedQueryError::EmptyName
    ));

    let entry = saved.save("SELECT 1", "  one  ").unwrap();
    assert_eq!(entry.name, "one");
    assert!(entry.id.starts_with(CUSTOM_ID_PREFIX));
    assert!(!entry.is_protected);
}

/// Custom entries can be deleted by index.
#[test]
fn test_custom_delete() {
    let (_, saved) = setup();
    saved.save("SELECT * FROM Orders", "orders").unwrap();
    let index = builtin_queries().len();

    let removed = saved.delete(index).unwrap();
    assert_eq!(removed.name, "orders");
    assert!(!saved.is_saved("SELECT * FROM Orders").unwrap());
}

// =============================================================================
// Startup Merge Tests
// =============================================================================

/// Legacy and foreign entries are dropped; custom entries survive.
#[test]
fn test_initialize_drops_legacy_entries() {
    let store = DurableStore::in_memory();
    store
        .set(
            StoreKey::SavedQueryLog,
            &json!([
                {"id": "builtin-0", "name": "Tampered", "query": "SELECT 0", "timestamp": "2024-01-01T00:00:00Z", "isPredefined": true},
                {"id": "legacy-1", "name": "Legacy", "query": "SELECT 1", "timestamp": "2024-01-01T00:00:00Z"},
                {"id": "custom-abc", "name": "Kept", "query": "SELECT 2", "timestamp": "2024-01-01T00:00:00Z"},
                {"id": "custom-def", "name": "Customers by Country", "query": "SELECT 3", "timestamp": "2024-01-01T00:00:00Z"},
                {"garbage": true}
            ]),
        )
        .unwrap();

    let mut saved = SavedQueryStore::new(store.clone());
    let merged = saved.initialize(&builtin_queries()).unwrap();

    let names: Vec<&str> = merged.iter().map(|q| q.name.as_str()).collect();
    assert!(names.contains(&"Kept"));
    assert!(!names.contains(&"Tampered"));
    assert!(!names.contains(&"Legacy"));
    assert_eq!(merged.len(), builtin_queries().len() + 1);
    assert_eq!(merged[0].query, builtin_queries()[0].query);

    // merged list was written back
    let reopened = SavedQueryStore::new(store);
    assert_eq!(reopened.queries().unwrap().len(), 1);
}
