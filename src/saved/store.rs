//! Saved query store
//!
//! The persisted `savedQueryLog` slot holds protected and custom entries.
//! Protected entries always come from the in-process seed; persisted copies
//! of them are ignored. Every mutation re-reads the custom entries, applies
//! the change and writes the merged list back.

use serde_json::Value;

use super::errors::{SavedQueryError, SavedResult};
use super::query::SavedQuery;
use crate::catalog::BuiltinQuery;
use crate::observability::{log_event_with_fields, Event};
use crate::persistence::{DurableStore, StoreKey};

/// Named queries over the `savedQueryLog` slot
#[derive(Debug, Clone)]
pub struct SavedQueryStore {
    store: DurableStore,
    protected: Vec<SavedQuery>,
}

impl SavedQueryStore {
    /// Store with no protected entries; call [`initialize`](Self::initialize)
    pub fn new(store: DurableStore) -> Self {
        Self {
            store,
            protected: Vec::new(),
        }
    }

    /// Seed the protected entries and persist the merged list.
    ///
    /// Persisted entries flagged protected, or without a `custom-` id,
    /// are dropped.
    pub fn initialize(&mut self, seed: &[BuiltinQuery]) -> SavedResult<Vec<SavedQuery>> {
        self.protected = seed.iter().map(SavedQuery::protected).collect();

        let custom = self.custom_entries()?;
        let merged = self.merge(custom);
        self.write(&merged)?;

        log_event_with_fields(
            Event::SavedInitialized,
            &[
                ("protected", &self.protected.len().to_string()),
                ("custom", &(merged.len() - self.protected.len()).to_string()),
            ],
        );
        Ok(merged)
    }

    /// Protected entries first, then custom entries in save order
    pub fn queries(&self) -> SavedResult<Vec<SavedQuery>> {
        Ok(self.merge(self.custom_entries()?))
    }

    /// True if some entry has exactly this text
    pub fn is_saved(&self, query: &str) -> SavedResult<bool> {
        Ok(self.queries()?.iter().any(|q| q.query == query))
    }

    /// Save `query` under `name`
    pub fn save(&self, query: &str, name: &str) -> SavedResult<SavedQuery> {
        let mut merged = self.queries()?;

        if let Some(existing) = merged.iter().find(|q| q.query == query) {
            return Err(self.reject(SavedQueryError::AlreadySaved {
                name: existing.name.clone(),
            }));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(SavedQueryError::EmptyName));
        }
        if merged.iter().any(|q| q.name == name) {
            return Err(self.reject(SavedQueryError::NameTaken {
                name: name.to_string(),
            }));
        }

        let entry = SavedQuery::custom(name, query);
        merged.push(entry.clone());
        self.write(&merged)?;

        log_event_with_fields(Event::SavedCreate, &[("id", &entry.id), ("name", &entry.name)]);
        Ok(entry)
    }

    /// Delete the entry at `index` of [`queries`](Self::queries)
    pub fn delete(&self, index: usize) -> SavedResult<SavedQuery> {
        let mut merged = self.queries()?;

        let Some(target) = merged.get(index) else {
            return Err(self.reject(SavedQueryError::IndexOutOfRange {
                index,
                len: merged.len(),
            }));
        };
        if target.is_protected {
            return Err(self.reject(SavedQueryError::Protected {
                name: target.name.clone(),
            }));
        }

        let removed = merged.remove(index);
        self.write(&merged)?;

        log_event_with_fields(Event::SavedDelete, &[("id", &removed.id)]);
        Ok(removed)
    }

    /// Custom entries currently persisted, dropping anything undecodable
    fn custom_entries(&self) -> SavedResult<Vec<SavedQuery>> {
        let raw: Vec<Value> = self.store.get(StoreKey::SavedQueryLog, Vec::new())?;
        Ok(raw
            .into_iter()
            .filter_map(|v| serde_json::from_value::<SavedQuery>(v).ok())
            .filter(SavedQuery::is_custom)
            .collect())
    }

    fn merge(&self, custom: Vec<SavedQuery>) -> Vec<SavedQuery> {
        let mut merged = self.protected.clone();
        for entry in custom {
            // A custom entry may not shadow a protected name
            if !merged.iter().any(|q| q.name == entry.name || q.id == entry.id) {
                merged.push(entry);
            }
        }
        merged
    }

    fn write(&self, entries: &[SavedQuery]) -> SavedResult<()> {
        Ok(self.store.set(StoreKey::SavedQueryLog, entries)?)
    }

    fn reject(&self, err: SavedQueryError) -> SavedQueryError {
        log_event_with_fields(Event::SavedRejected, &[("code", err.code())]);
        err
    }
}
