//! # Directory Watcher
//!
//! Relays slot files changed by other processes onto a [`ChangeBus`].
//! A filesystem event only triggers a scan; the backend's
//! [`KvBackend::external_changes`] decides what actually changed, so this
//! handle's own writes and repeated events for one write publish nothing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::backend::KvBackend;
use super::bus::ChangeBus;
use super::errors::{StoreError, StoreResult};
use super::local::slot_name;
use super::store::relay_external;
use crate::observability::{Event, Logger};

/// Live watch on a store directory. Dropping it stops the relay.
pub struct SlotWatcher {
    root: PathBuf,
    _watcher: RecommendedWatcher,
}

impl SlotWatcher {
    /// Watch `root` and publish external slot changes of `backend` on `bus`
    pub fn start(
        root: &Path,
        backend: Arc<dyn KvBackend>,
        bus: Arc<ChangeBus>,
    ) -> StoreResult<Self> {
        let dir = root.display().to_string();

        let handler = move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                if !event.paths.iter().any(|path| slot_name(path).is_some()) {
                    return;
                }
                if let Err(e) = relay_external(backend.as_ref(), &bus) {
                    Logger::warn(Event::StoreWatchFailed.as_str(), &[("error", &e.to_string())]);
                }
            }
            Err(e) => {
                Logger::warn(Event::StoreWatchFailed.as_str(), &[("error", &e.to_string())]);
            }
        };

        let mut watcher =
            notify::recommended_watcher(handler).map_err(|e| StoreError::io(&dir, e))?;
        watcher
            .watch(root, RecursiveMode::NonRecursive)
            .map_err(|e| StoreError::io(&dir, e))?;

        Ok(Self {
            root: root.to_path_buf(),
            _watcher: watcher,
        })
    }

    /// Directory being watched
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl fmt::Debug for SlotWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotWatcher")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
