//! Persistence and Cross-Context Sync Tests
//!
//! - Text slots round-trip exactly, including quotes
//! - Writes by one context notify every other context on the same bus
//! - Directory stores are shared across handles
//! - Writes through one directory handle notify another, as from another process

use std::time::Duration;

use querydeck::persistence::{DurableStore, FileBackend, KvBackend, StoreKey};
use tempfile::TempDir;

/// Quoted text written by one context reads back unchanged in another.
#[test]
fn test_quoted_text_round_trip_across_contexts() {
    let a = DurableStore::in_memory();
    let b = a.attach();

    let text = r#"SELECT * FROM Customers WHERE Country = "UK""#;
    a.set_text(StoreKey::CurrentQueryText, text).unwrap();
    assert_eq!(b.get_text(StoreKey::CurrentQueryText, "").unwrap(), text);

    a.set_text(StoreKey::CurrentQueryText, "\"quoted\"").unwrap();
    assert_eq!(b.get_text(StoreKey::CurrentQueryText, "").unwrap(), "\"quoted\"");
}

/// A subscriber sees writes from both contexts and can tell them apart.
#[test]
fn test_events_carry_origin() {
    let a = DurableStore::in_memory();
    let b = a.attach();
    let sub = b.subscribe();

    a.set_text(StoreKey::ActiveTabId, "history").unwrap();
    b.set_text(StoreKey::ActiveTabId, "saved").unwrap();

    let first = sub.next_timeout(Duration::from_secs(1)).unwrap();
    assert!(first.is_for(StoreKey::ActiveTabId));
    assert!(first.is_foreign_to(b.context()));

    let second = sub.next_timeout(Duration::from_secs(1)).unwrap();
    assert!(!second.is_foreign_to(b.context()));
    assert_eq!(second.new_value.as_deref(), Some("\"saved\""));
}

/// The written value is readable before its event arrives.
#[test]
fn test_value_visible_when_event_seen() {
    let a = DurableStore::in_memory();
    let b = a.attach();
    let sub = b.subscribe();

    a.set(StoreKey::HistoryLog, &vec!["x"]).unwrap();
    sub.next_timeout(Duration::from_secs(1)).unwrap();
    let seen: Vec<String> = b.get(StoreKey::HistoryLog, Vec::new()).unwrap();
    assert_eq!(seen, vec!["x"]);
}

/// Clearing publishes one removal per slot.
#[test]
fn test_clear_notifies_every_slot() {
    let store = DurableStore::in_memory();
    let sub = store.subscribe();
    store.clear().unwrap();

    let events = sub.drain();
    assert_eq!(events.len(), StoreKey::ALL.len());
    assert!(events.iter().all(|e| e.new_value.is_none()));
}

/// Two handles on one directory share slots.
#[test]
fn test_directory_store_shared() {
    let tmp = TempDir::new().unwrap();
    let first = DurableStore::open_dir(tmp.path()).unwrap();
    let second = DurableStore::open_dir(tmp.path()).unwrap();

    first.set_text(StoreKey::CurrentQueryText, "SELECT 1").unwrap();
    assert_eq!(
        second.get_text_opt(StoreKey::CurrentQueryText).unwrap(),
        Some("SELECT 1".to_string())
    );

    second.remove(StoreKey::CurrentQueryText).unwrap();
    assert_eq!(first.get_text_opt(StoreKey::CurrentQueryText).unwrap(), None);
}

/// A write through one directory handle reaches the other handle's subscribers.
#[test]
fn test_directory_handles_notify_each_other() {
    let tmp = TempDir::new().unwrap();
    let a = DurableStore::open_dir(tmp.path()).unwrap();
    let b = DurableStore::open_dir(tmp.path()).unwrap();
    let sub = b.subscribe();

    a.set_text(StoreKey::CurrentQueryText, "SELECT 1").unwrap();
    // the watcher normally gets there first; a scan covers a slow one
    b.sync_external().unwrap();

    let event = sub.next_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(event.key, StoreKey::CurrentQueryText);
    assert!(event.is_foreign_to(b.context()));
    assert!(event.is_external());
    assert_eq!(event.new_value.as_deref(), Some("\"SELECT 1\""));

    // reported once
    assert_eq!(b.sync_external().unwrap(), 0);
    assert!(sub.next_timeout(Duration::from_millis(200)).is_none());
}

/// The directory watcher delivers another handle's write without a scan.
#[test]
fn test_directory_watcher_delivers_without_scan() {
    let tmp = TempDir::new().unwrap();
    let a = DurableStore::open_dir(tmp.path()).unwrap();
    let b = DurableStore::open_dir(tmp.path()).unwrap();
    assert!(b.is_watching());
    let sub = b.subscribe();

    a.set_text(StoreKey::ActiveTabId, "history").unwrap();

    let event = sub.next_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(event.key, StoreKey::ActiveTabId);
    assert!(event.is_external());
}

/// A directory handle hears its own writes once, never echoed back as external.
#[test]
fn test_directory_own_writes_not_echoed() {
    let tmp = TempDir::new().unwrap();
    let a = DurableStore::open_dir(tmp.path()).unwrap();
    let sub = a.subscribe();

    a.set_text(StoreKey::CurrentQueryText, "SELECT 2").unwrap();
    a.remove(StoreKey::CurrentQueryText).unwrap();
    assert_eq!(a.sync_external().unwrap(), 0);

    std::thread::sleep(Duration::from_millis(200));
    let events = sub.drain();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.origin == a.context()));
}

/// Raw text from a writer that skipped encoding loses one quote layer.
#[test]
fn test_foreign_raw_text() {
    let tmp = TempDir::new().unwrap();
    let raw = FileBackend::open(tmp.path()).unwrap();
    raw.write("currentQueryText", "'SELECT 1'").unwrap();

    let store = DurableStore::open_dir(tmp.path()).unwrap();
    assert_eq!(
        store.get_text(StoreKey::CurrentQueryText, "").unwrap(),
        "SELECT 1"
    );
}

/// Undecodable structured slots fall back to the default.
#[test]
fn test_corrupt_slot_uses_default() {
    let tmp = TempDir::new().unwrap();
    FileBackend::open(tmp.path())
        .unwrap()
        .write("historyLog", "{not json")
        .unwrap();

    let store = DurableStore::open_dir(tmp.path()).unwrap();
    let entries: Vec<String> = store.get(StoreKey::HistoryLog, Vec::new()).unwrap();
    assert!(entries.is_empty());
}
