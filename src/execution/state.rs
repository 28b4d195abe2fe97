//! Execution phase machine
//!
//! - Phases are explicit and enumerable
//! - Transitions are explicit calls, never inferred
//! - Idle is reached from a settled phase only through `rearm`

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::{ExecutionError, PhaseResult};
use super::result::ExecutionResult;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Ready for a query
    #[default]
    Idle,
    /// Validator or engine in progress
    Running,
    /// Last run produced rows
    Succeeded,
    /// Last run failed validation or in the engine
    Failed,
}

impl Phase {
    /// Phase name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Running => "Running",
            Phase::Succeeded => "Succeeded",
            Phase::Failed => "Failed",
        }
    }

    /// True for Succeeded and Failed
    pub fn is_settled(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }

    /// Idle → Running
    pub fn begin(self) -> PhaseResult<Self> {
        match self {
            Phase::Idle => Ok(Phase::Running),
            _ => Err(self.forbidden(Phase::Running)),
        }
    }

    /// Running → Succeeded
    pub fn succeed(self) -> PhaseResult<Self> {
        match self {
            Phase::Running => Ok(Phase::Succeeded),
            _ => Err(self.forbidden(Phase::Succeeded)),
        }
    }

    /// Running → Failed
    pub fn fail(self) -> PhaseResult<Self> {
        match self {
            Phase::Running => Ok(Phase::Failed),
            _ => Err(self.forbidden(Phase::Failed)),
        }
    }

    /// Succeeded | Failed → Idle
    pub fn rearm(self) -> PhaseResult<Self> {
        match self {
            Phase::Succeeded | Phase::Failed => Ok(Phase::Idle),
            _ => Err(self.forbidden(Phase::Idle)),
        }
    }

    fn forbidden(self, to: Phase) -> ExecutionError {
        ExecutionError::InvalidTransition {
            from: self.name(),
            to: to.name(),
        }
    }
}

/// Snapshot of the controller
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionState {
    pub phase: Phase,
    /// Text of the last successful run; cleared when a run fails
    pub last_query: Option<String>,
    /// Rows of the last successful run; cleared when a run fails
    pub last_result: Option<ExecutionResult>,
    pub last_error: Option<ExecutionError>,
    /// History or `lastSucceededQueryText` write that failed after the last successful run
    pub record_error: Option<ExecutionError>,
    pub last_run_at: Option<DateTime<Utc>>,
}
