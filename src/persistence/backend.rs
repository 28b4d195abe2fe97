//! # Key/Value Backend Trait

use std::collections::HashMap;
use std::sync::RwLock;

use super::errors::{StoreError, StoreResult};

/// Raw slot storage. Values are already-encoded JSON text.
pub trait KvBackend: Send + Sync + std::fmt::Debug {
    /// Read the raw text of a slot, `None` if never written
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the raw text of a slot
    fn write(&self, key: &str, raw: &str) -> StoreResult<()>;

    /// Remove a slot; removing a missing slot is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Remove every slot
    fn clear(&self) -> StoreResult<()>;

    /// Slots whose stored text changed since this backend last wrote or
    /// scanned them, by someone other than this backend. `None` marks a
    /// removed slot. Backends nobody else can write report nothing.
    fn external_changes(&self) -> StoreResult<Vec<(String, Option<String>)>> {
        Ok(Vec::new())
    }
}

/// Process-local backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently written
    pub fn len(&self) -> usize {
        self.slots.read().map(|s| s.len()).unwrap_or(0)
    }

    /// True when no slot has been written
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvBackend for MemoryBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let slots = self.slots.read().map_err(|_| StoreError::Lock)?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, raw: &str) -> StoreResult<()> {
        let mut slots = self.slots.write().map_err(|_| StoreError::Lock)?;
        slots.insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut slots = self.slots.write().map_err(|_| StoreError::Lock)?;
        slots.remove(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut slots = self.slots.write().map_err(|_| StoreError::Lock)?;
        slots.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read() {
        let backend = MemoryBackend::new();
        backend.write("k", "\"v\"").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("\"v\""));
        assert_eq!(backend.read("missing").unwrap(), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let backend = MemoryBackend::new();
        backend.write("a", "1").unwrap();
        backend.write("b", "2").unwrap();

        backend.remove("a").unwrap();
        backend.remove("a").unwrap();
        assert_eq!(backend.len(), 1);

        backend.clear().unwrap();
        assert!(backend.is_empty());
    }
}
