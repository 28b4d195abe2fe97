//! # Directory Backend
//!
//! One file per slot: `<root>/<key>.json`. Writes go to a temporary sibling
//! and are renamed into place, so a concurrent reader in another process
//! sees either the old or the new value, never a torn one.
//!
//! The backend remembers the text it last wrote or scanned for each slot.
//! [`KvBackend::external_changes`] compares that against the directory, so
//! only writes made through other handles are reported.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use super::backend::KvBackend;
use super::errors::{StoreError, StoreResult};

const SLOT_EXTENSION: &str = "json";

/// Filesystem-backed slot storage
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
    /// Slot text as of this backend's last write or scan
    known: Mutex<HashMap<String, String>>,
}

impl FileBackend {
    /// Open a backend rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root.display().to_string(), e))?;
        let known = scan_slots(&root)?;
        Ok(Self {
            root,
            known: Mutex::new(known),
        })
    }

    /// Directory holding the slot files
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, SLOT_EXTENSION))
    }

    fn known(&self) -> StoreResult<MutexGuard<'_, HashMap<String, String>>> {
        self.known.lock().map_err(|_| StoreError::Lock)
    }
}

/// Slot name for a file in the store directory; staging files have none
pub(crate) fn slot_name(path: &Path) -> Option<&str> {
    if path.extension()? != SLOT_EXTENSION {
        return None;
    }
    path.file_stem()?
        .to_str()
        .filter(|stem| !stem.is_empty() && !stem.starts_with('.'))
}

/// Current text of every slot file under `root`
fn scan_slots(root: &Path) -> StoreResult<HashMap<String, String>> {
    let dir = root.display().to_string();
    let entries = fs::read_dir(root).map_err(|e| StoreError::io(&dir, e))?;

    let mut slots = HashMap::new();
    for entry in entries {
        let path = entry.map_err(|e| StoreError::io(&dir, e))?.path();
        let Some(key) = slot_name(&path) else {
            continue;
        };
        match fs::read_to_string(&path) {
            Ok(raw) => {
                slots.insert(key.to_string(), raw);
            }
            // removed between listing and reading
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(key, e)),
        }
    }
    Ok(slots)
}

impl KvBackend for FileBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn write(&self, key: &str, raw: &str) -> StoreResult<()> {
        let target = self.slot_path(key);
        let staging = self
            .root
            .join(format!(".{}.{}.tmp", key, Uuid::new_v4().simple()));

        // held across the rename so a scan never sees our write as foreign
        let mut known = self.known()?;
        fs::write(&staging, raw).map_err(|e| StoreError::io(key, e))?;
        fs::rename(&staging, &target).map_err(|e| {
            let _ = fs::remove_file(&staging);
            StoreError::io(key, e)
        })?;
        known.insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut known = self.known()?;
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(key, e)),
        }
        known.remove(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut known = self.known()?;
        let root = self.root.display().to_string();
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&root, e))?;

        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&root, e))?.path();
            if let Some(key) = slot_name(&path) {
                fs::remove_file(&path).map_err(|e| StoreError::io(&root, e))?;
                known.remove(key);
            }
        }

        Ok(())
    }

    fn external_changes(&self) -> StoreResult<Vec<(String, Option<String>)>> {
        let mut known = self.known()?;
        let current = scan_slots(&self.root)?;

        let mut changed: Vec<(String, Option<String>)> = current
            .iter()
            .filter(|(key, raw)| known.get(*key) != Some(*raw))
            .map(|(key, raw)| (key.clone(), Some(raw.clone())))
            .collect();
        changed.extend(
            known
                .keys()
                .filter(|key| !current.contains_key(*key))
                .map(|key| (key.clone(), None)),
        );
        changed.sort();

        *known = current;
        Ok(changed)
    }
}
