//! Execution error types
//!
//! Error codes:
//! - QUERY_EMPTY
//! - QUERY_UNSUPPORTED
//! - QUERY_BUSY
//! - QUERY_VALIDATION_TABLE / QUERY_VALIDATION_COLUMN
//! - QUERY_ENGINE_SYNTAX / QUERY_ENGINE_TABLE / QUERY_ENGINE_FAILED
//! - QUERY_INVALID_TRANSITION
//! - QUERY_RECORD_FAILED

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::engine::EngineErrorClass;
use crate::validator::ValidationError;

/// Result type for phase transitions
pub type PhaseResult<T> = Result<T, ExecutionError>;

/// Why an execution did not produce rows
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    /// Blank query text
    #[error("Please enter a query to execute")]
    EmptyQuery,

    /// Statement is not a read
    #[error("Only SELECT queries are supported; {keyword} is a {class} statement")]
    UnsupportedOperation { keyword: String, class: String },

    /// Another execution is in flight
    #[error("A query is already running")]
    Busy,

    /// Pre-flight validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The engine rejected or failed the query
    #[error("Error executing SQL query: {message}")]
    Engine {
        class: EngineErrorClass,
        message: String,
    },

    /// Rows were produced but a durable slot could not be updated
    #[error("Query ran but '{slot}' could not be updated: {reason}")]
    Record { slot: &'static str, reason: String },

    /// Phase machine refused a transition
    #[error("forbidden transition: {from} → {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl ExecutionError {
    /// Engine failure, classified by message
    pub fn engine(message: impl Into<String>) -> Self {
        let message = message.into();
        ExecutionError::Engine {
            class: EngineErrorClass::classify(&message),
            message,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutionError::EmptyQuery => "QUERY_EMPTY",
            ExecutionError::UnsupportedOperation { .. } => "QUERY_UNSUPPORTED",
            ExecutionError::Busy => "QUERY_BUSY",
            ExecutionError::Validation(e) => e.code(),
            ExecutionError::Engine { class, .. } => class.code(),
            ExecutionError::InvalidTransition { .. } => "QUERY_INVALID_TRANSITION",
            ExecutionError::Record { .. } => "QUERY_RECORD_FAILED",
        }
    }

    /// Shown only next to the editor, without a transient notice
    pub fn render_inline(&self) -> bool {
        match self {
            ExecutionError::EmptyQuery => true,
            ExecutionError::Engine { class, .. } => class.render_inline(),
            _ => false,
        }
    }

    /// True if the query reached the Running phase before failing
    pub fn ran(&self) -> bool {
        matches!(
            self,
            ExecutionError::Validation(_) | ExecutionError::Engine { .. }
        )
    }
}

impl Serialize for ExecutionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ExecutionError", 3)?;
        s.serialize_field("code", self.code())?;
        s.serialize_field("message", &self.to_string())?;
        s.serialize_field("inline", &self.render_inline())?;
        s.end()
    }
}
