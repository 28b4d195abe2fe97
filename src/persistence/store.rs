//! Durable store facade
//!
//! `DurableStore` binds a [`KvBackend`] to a [`ChangeBus`] and a context id.
//! Clones share the context; [`DurableStore::attach`] opens a new context
//! over the same backend and bus. A directory store also watches its
//! directory and relays other processes' writes onto the bus.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::backend::{KvBackend, MemoryBackend};
use super::codec;
use super::errors::StoreResult;
use super::local::FileBackend;
use super::watch::SlotWatcher;
use super::bus::{ChangeBus, ContextId, StorageEvent, Subscription, EXTERNAL_CONTEXT};
use crate::observability::{log_event_with_fields, Event, Logger};

/// Named slots of the durable store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreKey {
    /// Editor contents
    CurrentQueryText,
    /// Text of the most recent successful execution
    LastSucceededQueryText,
    /// `Vec<HistoryEntry>`, newest first
    HistoryLog,
    /// `Vec<SavedQuery>`
    SavedQueryLog,
    /// Selected tab
    ActiveTabId,
}

impl StoreKey {
    /// Every slot, in declaration order
    pub const ALL: [StoreKey; 5] = [
        StoreKey::CurrentQueryText,
        StoreKey::LastSucceededQueryText,
        StoreKey::HistoryLog,
        StoreKey::SavedQueryLog,
        StoreKey::ActiveTabId,
    ];

    /// Slot for a stored name
    pub fn from_name(name: &str) -> Option<StoreKey> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Slot name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::CurrentQueryText => "currentQueryText",
            StoreKey::LastSucceededQueryText => "lastSucceededQueryText",
            StoreKey::HistoryLog => "historyLog",
            StoreKey::SavedQueryLog => "savedQueryLog",
            StoreKey::ActiveTabId => "activeTabId",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle onto a shared durable store
#[derive(Debug, Clone)]
pub struct DurableStore {
    backend: Arc<dyn KvBackend>,
    bus: Arc<ChangeBus>,
    context: ContextId,
    watcher: Option<Arc<SlotWatcher>>,
}

impl DurableStore {
    /// Wrap a backend with a fresh bus and context
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend,
            bus: Arc::new(ChangeBus::new()),
            context: Uuid::new_v4(),
            watcher: None,
        }
    }

    /// Store that lives as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Store persisted under `dir`, watching it for other processes' writes.
    ///
    /// If the watch cannot be set up, external changes are still picked up
    /// by [`DurableStore::sync_external`].
    pub fn open_dir(dir: &Path) -> StoreResult<Self> {
        let mut store = Self::new(Arc::new(FileBackend::open(dir)?));
        match SlotWatcher::start(dir, Arc::clone(&store.backend), Arc::clone(&store.bus)) {
            Ok(watcher) => store.watcher = Some(Arc::new(watcher)),
            Err(e) => Logger::warn(
                Event::StoreWatchFailed.as_str(),
                &[("dir", &dir.display().to_string()), ("error", &e.to_string())],
            ),
        }
        Ok(store)
    }

    /// New context over the same backend and bus
    pub fn attach(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            bus: Arc::clone(&self.bus),
            context: Uuid::new_v4(),
            watcher: self.watcher.clone(),
        }
    }

    /// True while a directory watch relays external writes
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Publish slots changed by other processes since the last scan.
    ///
    /// Returns the number of events published.
    pub fn sync_external(&self) -> StoreResult<usize> {
        relay_external(self.backend.as_ref(), &self.bus)
    }

    /// This handle's context id
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Register a change listener
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    /// Read a structured slot, `default` if missing or undecodable
    pub fn get<T: DeserializeOwned>(&self, key: StoreKey, default: T) -> StoreResult<T> {
        let Some(raw) = self.backend.read(key.as_str())? else {
            return Ok(default);
        };

        match codec::decode(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                log_event_with_fields(
                    Event::StoreDecodeFailed,
                    &[("key", key.as_str()), ("reason", &e.to_string())],
                );
                Ok(default)
            }
        }
    }

    /// Write a structured slot, then notify
    pub fn set<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> StoreResult<()> {
        let raw = codec::encode(key.as_str(), value)?;
        self.backend.write(key.as_str(), &raw)?;
        self.publish(key, Some(raw));
        Ok(())
    }

    /// Read a free-form text slot
    pub fn get_text(&self, key: StoreKey, default: &str) -> StoreResult<String> {
        Ok(self.get_text_opt(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Read a free-form text slot, `None` if missing or null
    pub fn get_text_opt(&self, key: StoreKey) -> StoreResult<Option<String>> {
        Ok(self
            .backend
            .read(key.as_str())?
            .and_then(|raw| codec::decode_text(&raw)))
    }

    /// Write a free-form text slot, then notify
    pub fn set_text(&self, key: StoreKey, text: &str) -> StoreResult<()> {
        self.set(key, text)
    }

    /// Remove a slot, then notify
    pub fn remove(&self, key: StoreKey) -> StoreResult<()> {
        self.backend.remove(key.as_str())?;
        self.publish(key, None);
        Ok(())
    }

    /// Remove every slot, then notify once per slot
    pub fn clear(&self) -> StoreResult<()> {
        self.backend.clear()?;
        for key in StoreKey::ALL {
            self.publish(key, None);
        }
        Ok(())
    }

    fn publish(&self, key: StoreKey, new_value: Option<String>) {
        let event = StorageEvent {
            key,
            new_value,
            origin: self.context,
        };
        let reached = self.bus.publish(&event);
        Logger::trace(
            Event::StoreWrite.as_str(),
            &[("key", key.as_str()), ("listeners", &reached.to_string())],
        );
    }
}

/// Publish every external change `backend` reports, with the external origin
pub(crate) fn relay_external(backend: &dyn KvBackend, bus: &ChangeBus) -> StoreResult<usize> {
    let mut published = 0;
    for (name, new_value) in backend.external_changes()? {
        let Some(key) = StoreKey::from_name(&name) else {
            continue;
        };
        log_event_with_fields(Event::StoreExternalChange, &[("key", key.as_str())]);
        bus.publish(&StorageEvent {
            key,
            new_value,
            origin: EXTERNAL_CONTEXT,
        });
        published += 1;
    }
    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_missing() {
        let store = DurableStore::in_memory();
        let history: Vec<String> = store.get(StoreKey::HistoryLog, Vec::new()).unwrap();
        assert!(history.is_empty());
        assert_eq!(store.get_text(StoreKey::ActiveTabId, "results").unwrap(), "results");
    }

    #[test]
    fn test_set_get_structured() {
        let store = DurableStore::in_memory();
        store.set(StoreKey::HistoryLog, &vec![1, 2, 3]).unwrap();
        let back: Vec<i32> = store.get(StoreKey::HistoryLog, Vec::new()).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn test_corrupt_slot_falls_back() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write("historyLog", "{broken").unwrap();
        let store = DurableStore::new(backend);

        let back: Vec<i32> = store.get(StoreKey::HistoryLog, vec![7]).unwrap();
        assert_eq!(back, vec![7]);
    }

    #[test]
    fn test_listener_sees_new_value() {
        let writer = DurableStore::in_memory();
        let reader = writer.attach();
        let sub = reader.subscribe();

        writer.set_text(StoreKey::CurrentQueryText, "SELECT 1").unwrap();

        let event = sub.try_next().unwrap();
        assert_eq!(event.key, StoreKey::CurrentQueryText);
        assert!(event.is_foreign_to(reader.context()));
        assert_eq!(
            reader.get_text_opt(StoreKey::CurrentQueryText).unwrap().as_deref(),
            Some("SELECT 1")
        );
    }

    #[test]
    fn test_clear_notifies_every_slot() {
        let store = DurableStore::in_memory();
        let sub = store.subscribe();
        store.set_text(StoreKey::ActiveTabId, "history").unwrap();
        sub.drain();

        store.clear().unwrap();

        assert_eq!(sub.drain().len(), StoreKey::ALL.len());
        assert_eq!(store.get_text_opt(StoreKey::ActiveTabId).unwrap(), None);
    }

    #[test]
    fn test_memory_store_has_no_external_changes() {
        let store = DurableStore::in_memory();
        store.set_text(StoreKey::ActiveTabId, "schema").unwrap();
        assert_eq!(store.sync_external().unwrap(), 0);
        assert!(!store.is_watching());
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(StoreKey::from_name("historyLog"), Some(StoreKey::HistoryLog));
        assert_eq!(StoreKey::from_name("HistoryLog"), None);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(StoreKey::LastSucceededQueryText.as_str(), "lastSucceededQueryText");
        assert_eq!(
            serde_json::to_string(&StoreKey::SavedQueryLog).unwrap(),
            "\"savedQueryLog\""
        );
    }
}
