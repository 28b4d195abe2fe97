//! Observable events
//!
//! Events are explicit and typed; the string form is what lands in the log.

use std::fmt;

/// Observable events in querydeck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Workspace opened over a durable store
    WorkspaceOpened,

    // Query execution
    /// Execution started (phase Running)
    QueryBegin,
    /// Execution succeeded
    QueryComplete,
    /// Validation or engine failure
    QueryFailed,
    /// Rejected before reaching Running (empty, unsupported, busy)
    QueryRejected,
    /// Identical to the last succeeded query; engine skipped
    QueryUnchanged,

    // History
    /// Entry appended to history
    HistoryAppend,
    /// Entry removed from history
    HistoryRemove,
    /// History cleared
    HistoryClear,

    // Saved queries
    /// Saved queries merged with the protected seed
    SavedInitialized,
    /// Custom query saved
    SavedCreate,
    /// Custom query deleted
    SavedDelete,
    /// Save or delete refused
    SavedRejected,

    // Durable store
    /// Slot written
    StoreWrite,
    /// Slot could not be decoded; default used
    StoreDecodeFailed,
    /// Slot changed by another process
    StoreExternalChange,
    /// Directory watcher could not start or reported an error
    StoreWatchFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::WorkspaceOpened => "WORKSPACE_OPENED",

            Event::QueryBegin => "QUERY_BEGIN",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::QueryFailed => "QUERY_FAILED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::QueryUnchanged => "QUERY_UNCHANGED",

            Event::HistoryAppend => "HISTORY_APPEND",
            Event::HistoryRemove => "HISTORY_REMOVE",
            Event::HistoryClear => "HISTORY_CLEAR",

            Event::SavedInitialized => "SAVED_INITIALIZED",
            Event::SavedCreate => "SAVED_CREATE",
            Event::SavedDelete => "SAVED_DELETE",
            Event::SavedRejected => "SAVED_REJECTED",

            Event::StoreWrite => "STORE_WRITE",
            Event::StoreDecodeFailed => "STORE_DECODE_FAILED",
            Event::StoreExternalChange => "STORE_EXTERNAL_CHANGE",
            Event::StoreWatchFailed => "STORE_WATCH_FAILED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::QueryFailed | Event::StoreDecodeFailed | Event::StoreWatchFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
