//! Bounded, newest-first history log
//!
//! Every mutation re-reads the persisted slot, applies the change and
//! writes the whole list back, so writes from other contexts are merged
//! rather than overwritten with a stale copy.

use super::entry::HistoryEntry;
use super::errors::{HistoryError, HistoryResult};
use crate::observability::{log_event_with_fields, Event};
use crate::persistence::{DurableStore, StoreKey};

/// Default capacity
pub const DEFAULT_MAX_HISTORY: usize = 15;

/// History log over the `historyLog` slot
#[derive(Debug, Clone)]
pub struct HistoryStore {
    store: DurableStore,
    max_entries: usize,
}

impl HistoryStore {
    /// Store keeping at most `max_entries` (at least one)
    pub fn new(store: DurableStore, max_entries: usize) -> Self {
        Self {
            store,
            max_entries: max_entries.max(1),
        }
    }

    /// Capacity
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Current entries, newest first
    pub fn entries(&self) -> HistoryResult<Vec<HistoryEntry>> {
        Ok(self.store.get(StoreKey::HistoryLog, Vec::new())?)
    }

    /// Number of entries
    pub fn len(&self) -> HistoryResult<usize> {
        Ok(self.entries()?.len())
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> HistoryResult<bool> {
        Ok(self.entries()?.is_empty())
    }

    /// Prepend `entry`, evicting the oldest beyond capacity
    pub fn append(&self, entry: HistoryEntry) -> HistoryResult<()> {
        let mut entries = self.entries()?;
        entries.insert(0, entry);
        entries.truncate(self.max_entries);
        self.write(&entries)?;

        log_event_with_fields(Event::HistoryAppend, &[("len", &entries.len().to_string())]);
        Ok(())
    }

    /// Remove the entry at `index`, keeping the order of the rest
    pub fn remove(&self, index: usize) -> HistoryResult<HistoryEntry> {
        let mut entries = self.entries()?;
        if index >= entries.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: entries.len(),
            });
        }
        let removed = entries.remove(index);
        self.write(&entries)?;

        log_event_with_fields(Event::HistoryRemove, &[("index", &index.to_string())]);
        Ok(removed)
    }

    /// Set `saved` on every entry whose text equals `query`.
    ///
    /// Returns the number of entries touched; nothing is written when zero.
    pub fn mark_saved(&self, query: &str, saved: bool) -> HistoryResult<usize> {
        let mut entries = self.entries()?;
        let mut touched = 0;
        for entry in entries.iter_mut().filter(|e| e.query == query) {
            entry.saved = saved;
            touched += 1;
        }
        if touched > 0 {
            self.write(&entries)?;
        }
        Ok(touched)
    }

    /// Drop every entry
    pub fn clear(&self) -> HistoryResult<()> {
        self.write(&[])?;
        log_event_with_fields(Event::HistoryClear, &[]);
        Ok(())
    }

    fn write(&self, entries: &[HistoryEntry]) -> HistoryResult<()> {
        Ok(self.store.set(StoreKey::HistoryLog, entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(max: usize) -> HistoryStore {
        HistoryStore::new(DurableStore::in_memory(), max)
    }

    #[test]
    fn test_append_newest_first() {
        let history = store(DEFAULT_MAX_HISTORY);
        history.append(HistoryEntry::new("SELECT 1", Some(1.0), false)).unwrap();
        history.append(HistoryEntry::new("SELECT 2", Some(2.0), false)).unwrap();

        let entries = history.entries().unwrap();
        assert_eq!(entries[0].query, "SELECT 2");
        assert_eq!(entries[1].query, "SELECT 1");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let history = store(3);
        for i in 0..5 {
            history
                .append(HistoryEntry::new(format!("SELECT {}", i), None, false))
                .unwrap();
        }
        let queries: Vec<_> = history
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| e.query)
            .collect();
        assert_eq!(queries, vec!["SELECT 4", "SELECT 3", "SELECT 2"]);
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        assert_eq!(store(0).max_entries(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let history = store(10);
        for q in ["a", "b", "c"] {
            history.append(HistoryEntry::new(q, None, false)).unwrap();
        }
        let removed = history.remove(1).unwrap();
        assert_eq!(removed.query, "b");
        let queries: Vec<_> = history.entries().unwrap().into_iter().map(|e| e.query).collect();
        assert_eq!(queries, vec!["c", "a"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let history = store(10);
        let err = history.remove(0).unwrap_err();
        assert_eq!(err.code(), "HISTORY_INDEX_OUT_OF_RANGE");
    }

    #[test]
    fn test_mark_saved_touches_all_matches() {
        let history = store(10);
        history.append(HistoryEntry::new("q", None, false)).unwrap();
        history.append(HistoryEntry::new("other", None, false)).unwrap();
        history.append(HistoryEntry::new("q", None, false)).unwrap();

        assert_eq!(history.mark_saved("q", true).unwrap(), 2);
        let flags: Vec<_> = history.entries().unwrap().into_iter().map(|e| e.saved).collect();
        assert_eq!(flags, vec![true, false, true]);
        assert_eq!(history.mark_saved("missing", true).unwrap(), 0);
    }

    #[test]
    fn test_clear() {
        let history = store(10);
        history.append(HistoryEntry::new("q", None, false)).unwrap();
        history.clear().unwrap();
        assert!(history.is_empty().unwrap());
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = HistoryEntry::new("SELECT 1", Some(0.5), true);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["executionTimeMs"], 0.5);
        assert_eq!(json["saved"], true);
    }
}
