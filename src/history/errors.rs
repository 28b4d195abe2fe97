//! History error types

use thiserror::Error;

use crate::persistence::StoreError;

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// History errors
#[derive(Debug, Clone, Error)]
pub enum HistoryError {
    /// No entry at that position
    #[error("History index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Durable store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HistoryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            HistoryError::IndexOutOfRange { .. } => "HISTORY_INDEX_OUT_OF_RANGE",
            HistoryError::Store(e) => e.code(),
        }
    }
}
