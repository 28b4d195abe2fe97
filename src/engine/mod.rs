//! SQL engine interface
//!
//! The engine parses and runs queries; everything around it (validation,
//! state, history) lives elsewhere. Tables are registered when the engine
//! is built, before any query runs.

mod classify;
mod sqlite;

use thiserror::Error;

use crate::catalog::Row;

pub use classify::EngineErrorClass;
pub use sqlite::SqliteEngine;

/// Result type for engine calls
pub type EngineResult<T> = Result<T, EngineFailure>;

/// Raw engine failure; only the message is meaningful
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineFailure {
    pub message: String,
}

impl EngineFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Class of this failure, by message pattern
    pub fn class(&self) -> EngineErrorClass {
        EngineErrorClass::classify(&self.message)
    }
}

impl From<rusqlite::Error> for EngineFailure {
    fn from(err: rusqlite::Error) -> Self {
        EngineFailure::new(err.to_string())
    }
}

/// Executes a query over registered tables
pub trait SqlEngine: Send + Sync {
    /// Run `sql`, returning rows in engine order
    fn execute(&self, sql: &str) -> EngineResult<Vec<Row>>;
}

impl<E: SqlEngine + ?Sized> SqlEngine for std::sync::Arc<E> {
    fn execute(&self, sql: &str) -> EngineResult<Vec<Row>> {
        (**self).execute(sql)
    }
}
