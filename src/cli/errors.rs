//! CLI error types
//!
//! Every error carries the stable code of the component that raised it.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::execution::ExecutionError;
use crate::persistence::StoreError;
use crate::workspace::WorkspaceError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Query did not produce rows
    #[error(transparent)]
    Query(#[from] ExecutionError),

    /// Request could not be understood
    #[error("Invalid request: {0}")]
    Request(String),

    /// stdin/stdout failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Invalid request
    pub fn request(msg: impl Into<String>) -> Self {
        CliError::Request(msg.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(e) => e.code(),
            CliError::Store(e) => e.code(),
            CliError::Workspace(e) => e.code(),
            CliError::Query(e) => e.code(),
            CliError::Request(_) => "CLI_INVALID_REQUEST",
            CliError::Io(_) => "CLI_IO_ERROR",
            CliError::Json(_) => "CLI_JSON_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        assert_eq!(CliError::from(ExecutionError::Busy).code(), "QUERY_BUSY");
        assert_eq!(CliError::request("x").code(), "CLI_INVALID_REQUEST");
    }
}
