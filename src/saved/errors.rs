//! Saved query error types
//!
//! Error codes:
//! - SAVED_ALREADY_SAVED
//! - SAVED_EMPTY_NAME
//! - SAVED_NAME_TAKEN
//! - SAVED_PROTECTED
//! - SAVED_INDEX_OUT_OF_RANGE

use thiserror::Error;

use crate::persistence::StoreError;

/// Result type for saved query operations
pub type SavedResult<T> = Result<T, SavedQueryError>;

/// Saved query errors
#[derive(Debug, Clone, Error)]
pub enum SavedQueryError {
    /// Same text already stored under `name`
    #[error("This query is already saved as \"{name}\"")]
    AlreadySaved { name: String },

    /// Name blank after trimming
    #[error("A saved query needs a name")]
    EmptyName,

    /// Another entry uses this name
    #[error("A query named \"{name}\" already exists. Please choose a different name.")]
    NameTaken { name: String },

    /// Built-in entries cannot be deleted
    #[error("Predefined example query \"{name}\" cannot be deleted")]
    Protected { name: String },

    /// No entry at that position
    #[error("Saved query index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Durable store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SavedQueryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SavedQueryError::AlreadySaved { .. } => "SAVED_ALREADY_SAVED",
            SavedQueryError::EmptyName => "SAVED_EMPTY_NAME",
            SavedQueryError::NameTaken { .. } => "SAVED_NAME_TAKEN",
            SavedQueryError::Protected { .. } => "SAVED_PROTECTED",
            SavedQueryError::IndexOutOfRange { .. } => "SAVED_INDEX_OUT_OF_RANGE",
            SavedQueryError::Store(e) => e.code(),
        }
    }

    /// True for refusals that leave the store untouched
    pub fn is_rejection(&self) -> bool {
        !matches!(self, SavedQueryError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(SavedQueryError::EmptyName.code(), "SAVED_EMPTY_NAME");
        assert_eq!(
            SavedQueryError::Store(StoreError::Lock).code(),
            "STORE_LOCK_POISONED"
        );
        assert!(!SavedQueryError::Store(StoreError::Lock).is_rejection());
        assert!(SavedQueryError::Protected { name: "x".into() }.is_rejection());
    }
}
