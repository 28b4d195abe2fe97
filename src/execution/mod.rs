//! Query execution
//!
//! # Principles
//!
//! 1. At most one execution in flight; overlapping calls get `Busy`
//! 2. Only read statements reach the validator or engine
//! 3. Failures never touch history
//! 4. Idle is re-entered only through an explicit `rearm`

mod controller;
mod errors;
mod result;
mod state;

pub use controller::{ExecutionController, ExecutionOutcome};
pub use errors::{ExecutionError, PhaseResult};
pub use result::ExecutionResult;
pub use state::{ExecutionState, Phase};
