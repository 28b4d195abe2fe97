//! Single-flight execution controller
//!
//! Order of checks in [`ExecutionController::execute`]:
//!
//! 1. Busy: another call holds the in-flight flag
//! 2. EmptyQuery: blank text; phase unchanged
//! 3. UnsupportedOperation: not `SELECT` + whitespace
//! 4. Unchanged: identical to the last successful text; engine skipped
//! 5. Rearm, Running, validator, engine
//!
//! History and `lastSucceededQueryText` are written only on success. A failed
//! write leaves the outcome `Succeeded` and is kept as the state's
//! `record_error` until the next run begins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::errors::ExecutionError;
use super::result::ExecutionResult;
use super::state::{ExecutionState, Phase};
use crate::engine::SqlEngine;
use crate::history::{HistoryEntry, HistoryStore};
use crate::observability::{log_event_with_fields, Event, Logger, ObservationScope, Timer};
use crate::persistence::{DurableStore, StoreKey};
use crate::saved::SavedQuery;
use crate::validator::{QueryValidator, StatementClass};

/// What one `execute` call produced
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// Engine ran and returned rows
    Succeeded(ExecutionResult),
    /// Text matched the last successful run; previous rows returned
    Unchanged(ExecutionResult),
    /// Rejected, invalid, or failed in the engine
    Failed(ExecutionError),
}

impl ExecutionOutcome {
    /// Rows for Succeeded and Unchanged
    pub fn result(&self) -> Option<&ExecutionResult> {
        match self {
            ExecutionOutcome::Succeeded(r) | ExecutionOutcome::Unchanged(r) => Some(r),
            ExecutionOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ExecutionError> {
        match self {
            ExecutionOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Succeeded(_))
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, ExecutionOutcome::Unchanged(_))
    }
}

/// Holds the in-flight flag until dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs read queries one at a time
pub struct ExecutionController {
    engine: Box<dyn SqlEngine>,
    validator: QueryValidator,
    history: HistoryStore,
    store: DurableStore,
    state: Mutex<ExecutionState>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for ExecutionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionController")
            .field("phase", &self.phase())
            .field("in_flight", &self.in_flight.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl ExecutionController {
    pub fn new(
        engine: Box<dyn SqlEngine>,
        validator: QueryValidator,
        history: HistoryStore,
        store: DurableStore,
    ) -> Self {
        Self {
            engine,
            validator,
            history,
            store,
            state: Mutex::new(ExecutionState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ExecutionState {
        self.lock_state().clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock_state().phase
    }

    /// Rows of the last successful run
    pub fn result(&self) -> Option<ExecutionResult> {
        self.lock_state().last_result.clone()
    }

    pub fn last_error(&self) -> Option<ExecutionError> {
        self.lock_state().last_error.clone()
    }

    /// Durable write that failed after the last successful run
    pub fn record_error(&self) -> Option<ExecutionError> {
        self.lock_state().record_error.clone()
    }

    /// True while a call holds the in-flight flag
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Succeeded | Failed → Idle
    pub fn rearm(&self) -> Result<Phase, ExecutionError> {
        let mut state = self.lock_state();
        state.phase = state.phase.rearm()?;
        Ok(state.phase)
    }

    /// Run `text`. `saved` decides the history entry's `saved` flag.
    pub fn execute(&self, text: &str, saved: &[SavedQuery]) -> ExecutionOutcome {
        let Some(_flight) = InFlight::acquire(&self.in_flight) else {
            return self.reject(ExecutionError::Busy, false);
        };

        if text.trim().is_empty() {
            return self.reject(ExecutionError::EmptyQuery, true);
        }

        let class = StatementClass::classify(text);
        if !class.is_read() {
            let err = ExecutionError::UnsupportedOperation {
                keyword: class.keyword().to_string(),
                class: class.class_name().to_string(),
            };
            return self.reject(err, true);
        }

        {
            let state = self.lock_state();
            if state.last_query.as_deref() == Some(text) {
                if let Some(result) = state.last_result.clone() {
                    log_event_with_fields(
                        Event::QueryUnchanged,
                        &[("rows", &result.row_count().to_string())],
                    );
                    return ExecutionOutcome::Unchanged(result);
                }
            }
        }

        if let Err(e) = self.begin() {
            return self.reject(e, true);
        }
        log_event_with_fields(Event::QueryBegin, &[("query_len", &text.len().to_string())]);
        let timer = Timer::new();

        if let Err(e) = self.validator.validate(text) {
            return self.fail(ExecutionError::Validation(e));
        }

        let scope = ObservationScope::new("ENGINE");
        let rows = match self.engine.execute(text) {
            Ok(rows) => {
                scope.complete_with_fields(&[("rows", &rows.len().to_string())]);
                rows
            }
            Err(failure) => {
                scope.fail(&failure.message);
                return self.fail(ExecutionError::engine(failure.message));
            }
        };

        let result = ExecutionResult::from_rows(rows, timer.elapsed_millis_f64());
        if let Err(e) = self.succeed(text, &result) {
            return self.reject(e, true);
        }

        log_event_with_fields(
            Event::QueryComplete,
            &[
                ("rows", &result.row_count().to_string()),
                ("duration_ms", &format!("{:.3}", result.duration_ms)),
            ],
        );

        let is_saved = saved.iter().any(|q| q.query == text);
        let entry = HistoryEntry::new(text, Some(result.duration_ms), is_saved);
        if let Err(e) = self.history.append(entry) {
            Logger::warn(Event::HistoryAppend.as_str(), &[("error", &e.to_string())]);
            self.record_failed(StoreKey::HistoryLog, e);
        }
        if let Err(e) = self.store.set_text(StoreKey::LastSucceededQueryText, text) {
            Logger::warn(Event::StoreWrite.as_str(), &[("error", &e.to_string())]);
            self.record_failed(StoreKey::LastSucceededQueryText, e);
        }

        ExecutionOutcome::Succeeded(result)
    }

    /// Rearm if settled, then Idle → Running
    fn begin(&self) -> Result<(), ExecutionError> {
        let mut state = self.lock_state();
        let mut phase = state.phase;
        if phase.is_settled() {
            phase = phase.rearm()?;
        }
        state.phase = phase.begin()?;
        state.last_error = None;
        state.record_error = None;
        state.last_run_at = Some(Utc::now());
        Ok(())
    }

    /// Keep the first failed durable write of this run
    fn record_failed(&self, slot: StoreKey, err: impl std::fmt::Display) {
        let mut state = self.lock_state();
        if state.record_error.is_none() {
            state.record_error = Some(ExecutionError::Record {
                slot: slot.as_str(),
                reason: err.to_string(),
            });
        }
    }

    fn succeed(&self, text: &str, result: &ExecutionResult) -> Result<(), ExecutionError> {
        let mut state = self.lock_state();
        state.phase = state.phase.succeed()?;
        state.last_query = Some(text.to_string());
        state.last_result = Some(result.clone());
        Ok(())
    }

    /// Running → Failed; the previous result is cleared
    fn fail(&self, err: ExecutionError) -> ExecutionOutcome {
        {
            let mut state = self.lock_state();
            match state.phase.fail() {
                Ok(phase) => state.phase = phase,
                Err(e) => Logger::warn(Event::QueryFailed.as_str(), &[("error", &e.to_string())]),
            }
            state.last_query = None;
            state.last_result = None;
            state.last_error = Some(err.clone());
        }
        log_event_with_fields(
            Event::QueryFailed,
            &[("code", err.code()), ("message", &err.to_string())],
        );
        ExecutionOutcome::Failed(err)
    }

    /// Refuse without changing phase; optionally record as last error
    fn reject(&self, err: ExecutionError, record: bool) -> ExecutionOutcome {
        if record {
            self.lock_state().last_error = Some(err.clone());
        }
        log_event_with_fields(Event::QueryRejected, &[("code", err.code())]);
        ExecutionOutcome::Failed(err)
    }

    fn lock_state(&self) -> MutexGuard<'_, ExecutionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
