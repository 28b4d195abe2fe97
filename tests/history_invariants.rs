//! History Store Invariant Tests
//!
//! - Newest entry first
//! - Capacity is never exceeded; the oldest entries go
//! - Entries survive reopening the store

use querydeck::history::{HistoryEntry, HistoryStore, DEFAULT_MAX_HISTORY};
use querydeck::persistence::DurableStore;
use tempfile::TempDir;

/// Appending max + k entries keeps the newest max.
#[test]
fn test_capacity_evicts_oldest() {
    let history = HistoryStore::new(DurableStore::in_memory(), DEFAULT_MAX_HISTORY);
    let extra = 4;

    for i in 0..DEFAULT_MAX_HISTORY + extra {
        history
            .append(HistoryEntry::new(format!("SELECT {} FROM Orders", i), Some(1.0), false))
            .unwrap();
    }

    let entries = history.entries().unwrap();
    assert_eq!(entries.len(), DEFAULT_MAX_HISTORY);
    assert_eq!(
        entries[0].query,
        format!("SELECT {} FROM Orders", DEFAULT_MAX_HISTORY + extra - 1)
    );
    assert_eq!(
        entries.last().unwrap().query,
        format!("SELECT {} FROM Orders", extra)
    );
}

/// Duplicate texts are kept as separate entries.
#[test]
fn test_duplicates_are_kept() {
    let history = HistoryStore::new(DurableStore::in_memory(), 5);
    history.append(HistoryEntry::new("SELECT 1", None, false)).unwrap();
    history.append(HistoryEntry::new("SELECT 1", None, false)).unwrap();
    assert_eq!(history.len().unwrap(), 2);
}

/// Removing out of range fails without touching the entries.
#[test]
fn test_remove_out_of_range() {
    let history = HistoryStore::new(DurableStore::in_memory(), 5);
    history.append(HistoryEntry::new("SELECT 1", None, false)).unwrap();

    let err = history.remove(3).unwrap_err();
    assert_eq!(err.code(), "HISTORY_INDEX_OUT_OF_RANGE");
    assert_eq!(history.len().unwrap(), 1);
}

/// A reopened directory store sees the same entries.
#[test]
fn test_entries_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    {
        let history = HistoryStore::new(DurableStore::open_dir(tmp.path()).unwrap(), 15);
        history.append(HistoryEntry::new("SELECT a", Some(2.5), false)).unwrap();
        history.append(HistoryEntry::new("SELECT b", Some(3.5), true)).unwrap();
    }

    let history = HistoryStore::new(DurableStore::open_dir(tmp.path()).unwrap(), 15);
    let entries = history.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].query, "SELECT b");
    assert!(entries[0].saved);
    assert_eq!(entries[1].execution_time_ms, Some(2.5));
}

/// A smaller capacity on reopen trims on the next append.
#[test]
fn test_smaller_capacity_trims_on_append() {
    let store = DurableStore::in_memory();
    let wide = HistoryStore::new(store.clone(), 10);
    for i in 0..8 {
        wide.append(HistoryEntry::new(format!("SELECT {}", i), None, false)).unwrap();
    }

    let narrow = HistoryStore::new(store, 3);
    narrow.append(HistoryEntry::new("SELECT last", None, false)).unwrap();
    assert_eq!(narrow.len().unwrap(), 3);
}
