//! Workspace error types

use thiserror::Error;

use crate::engine::EngineFailure;
use crate::history::HistoryError;
use crate::persistence::StoreError;
use crate::saved::SavedQueryError;

/// Result type for workspace operations
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Workspace errors; each wraps the failing component's error
#[derive(Debug, Clone, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Saved(#[from] SavedQueryError),

    /// Engine could not be set up
    #[error("Failed to start engine: {0}")]
    Engine(#[from] EngineFailure),
}

impl WorkspaceError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            WorkspaceError::Store(e) => e.code(),
            WorkspaceError::History(e) => e.code(),
            WorkspaceError::Saved(e) => e.code(),
            WorkspaceError::Engine(_) => "ENGINE_INIT_FAILED",
        }
    }
}
