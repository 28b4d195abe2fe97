//! # Durable Store Errors

use thiserror::Error;

/// Result type for durable store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Backend I/O failed
    #[error("I/O error on slot '{key}': {reason}")]
    Io { key: String, reason: String },

    /// Value could not be serialized
    #[error("Failed to encode slot '{key}': {reason}")]
    Encode { key: String, reason: String },

    /// Internal lock poisoned
    #[error("Store lock poisoned")]
    Lock,
}

impl StoreError {
    pub(crate) fn io(key: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Io {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "STORE_IO_FAILED",
            StoreError::Encode { .. } => "STORE_ENCODE_FAILED",
            StoreError::Lock => "STORE_LOCK_POISONED",
        }
    }
}
