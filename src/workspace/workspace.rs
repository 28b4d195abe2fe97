//! Application facade
//!
//! Wires the durable store, history, saved queries, execution controller,
//! tabs and notices together. Each store owns its own slots; the workspace
//! only sequences calls and reports outcomes.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use super::errors::WorkspaceResult;
use super::notify::{Notice, NoticeLevel, Notifier};
use super::tabs::Tab;
use crate::catalog::{builtin_queries, DatasetCatalog, SchemaCatalog};
use crate::config::Config;
use crate::engine::{SqlEngine, SqliteEngine};
use crate::execution::{
    ExecutionController, ExecutionError, ExecutionOutcome, ExecutionResult, ExecutionState,
};
use crate::history::{HistoryEntry, HistoryError, HistoryStore};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::persistence::{DurableStore, StoreKey, Subscription};
use crate::saved::{SavedQuery, SavedQueryError, SavedQueryStore};
use crate::validator::QueryValidator;
use crate::view::{self, ViewSlice, ViewState};

/// One user context over a durable store
pub struct Workspace {
    store: DurableStore,
    schema: SchemaCatalog,
    controller: ExecutionController,
    history: HistoryStore,
    saved: SavedQueryStore,
    notifier: Arc<dyn Notifier>,
    changes: Mutex<Subscription>,
    expanded_table: Option<String>,
}

impl Workspace {
    /// Open over `store` with the given dataset and engine
    pub fn open(
        config: &Config,
        store: DurableStore,
        dataset: Arc<DatasetCatalog>,
        engine: Box<dyn SqlEngine>,
        notifier: Arc<dyn Notifier>,
    ) -> WorkspaceResult<Self> {
        let changes = Mutex::new(store.subscribe());

        let history = HistoryStore::new(store.clone(), config.max_history);
        let mut saved = SavedQueryStore::new(store.clone());
        saved.initialize(&builtin_queries())?;

        let controller = ExecutionController::new(
            engine,
            QueryValidator::new(dataset),
            history.clone(),
            store.clone(),
        );

        let schema = SchemaCatalog::northwind();
        let expanded_table = schema.table_names().first().map(|t| t.to_string());

        log_event_with_fields(
            Event::WorkspaceOpened,
            &[("context", &store.context().to_string())],
        );

        Ok(Self {
            store,
            schema,
            controller,
            history,
            saved,
            notifier,
            changes,
            expanded_table,
        })
    }

    /// Open over the bundled sales dataset, run by SQLite
    pub fn northwind(
        config: &Config,
        store: DurableStore,
        notifier: Arc<dyn Notifier>,
    ) -> WorkspaceResult<Self> {
        let dataset = Arc::new(DatasetCatalog::northwind());
        let engine = SqliteEngine::new(&dataset)?;
        Self::open(config, store, dataset, Box::new(engine), notifier)
    }

    pub fn store(&self) -> &DurableStore {
        &self.store
    }

    pub fn schema(&self) -> &SchemaCatalog {
        &self.schema
    }

    // ---- editor ----------------------------------------------------------

    /// Editor contents
    pub fn current_query(&self) -> WorkspaceResult<String> {
        Ok(self.store.get_text(StoreKey::CurrentQueryText, "")?)
    }

    /// Replace the editor contents
    pub fn set_current_query(&self, text: &str) -> WorkspaceResult<()> {
        Ok(self.store.set_text(StoreKey::CurrentQueryText, text)?)
    }

    /// Text of the last successful run, across restarts
    pub fn last_succeeded_query(&self) -> WorkspaceResult<Option<String>> {
        Ok(self.store.get_text_opt(StoreKey::LastSucceededQueryText)?)
    }

    // ---- execution -------------------------------------------------------

    /// Run the editor contents
    pub fn execute_current(&self) -> WorkspaceResult<ExecutionOutcome> {
        let text = self.current_query()?;
        self.execute(&text)
    }

    /// Run `text`, switch to the results tab and raise a notice
    pub fn execute(&self, text: &str) -> WorkspaceResult<ExecutionOutcome> {
        let saved = self.saved.queries()?;
        let outcome = self.controller.execute(text, &saved);

        self.set_active_tab(Tab::Results)?;
        if let Some(notice) = outcome_notice(&outcome) {
            self.notifier.notify(notice);
        }
        if outcome.is_success() {
            if let Some(err) = self.controller.record_error() {
                self.notify(NoticeLevel::Warning, err.to_string());
            }
        }
        Ok(outcome)
    }

    pub fn execution_state(&self) -> ExecutionState {
        self.controller.state()
    }

    /// Rows of the last successful run
    pub fn result(&self) -> Option<ExecutionResult> {
        self.controller.result()
    }

    pub fn last_error(&self) -> Option<ExecutionError> {
        self.controller.last_error()
    }

    /// Visible slice of `result` under `view`
    pub fn view<'a>(&self, result: &'a ExecutionResult, view: &mut ViewState) -> ViewSlice<'a> {
        view.init_column_widths(&result.columns);
        view::compute(&result.rows, &result.columns, view)
    }

    // ---- history ---------------------------------------------------------

    pub fn history(&self) -> WorkspaceResult<Vec<HistoryEntry>> {
        Ok(self.history.entries()?)
    }

    /// Load a history entry into the editor
    pub fn select_from_history(&self, index: usize) -> WorkspaceResult<String> {
        let entries = self.history.entries()?;
        let entry = entries
            .get(index)
            .ok_or(HistoryError::IndexOutOfRange {
                index,
                len: entries.len(),
            })?;
        self.set_current_query(&entry.query)?;
        self.notify(NoticeLevel::Info, "Query loaded from history");
        Ok(entry.query.clone())
    }

    pub fn delete_history(&self, index: usize) -> WorkspaceResult<HistoryEntry> {
        Ok(self.history.remove(index)?)
    }

    pub fn clear_history(&self) -> WorkspaceResult<()> {
        Ok(self.history.clear()?)
    }

    // ---- saved queries ---------------------------------------------------

    pub fn saved_queries(&self) -> WorkspaceResult<Vec<SavedQuery>> {
        Ok(self.saved.queries()?)
    }

    /// Load a saved query into the editor
    pub fn select_saved(&self, index: usize) -> WorkspaceResult<String> {
        let queries = self.saved.queries()?;
        let entry = queries
            .get(index)
            .ok_or(SavedQueryError::IndexOutOfRange {
                index,
                len: queries.len(),
            })?;
        self.set_current_query(&entry.query)?;
        self.notify(NoticeLevel::Info, "Query loaded from saved queries");
        Ok(entry.query.clone())
    }

    /// Save the editor contents under `name`
    pub fn save_current(&self, name: &str) -> WorkspaceResult<SavedQuery> {
        let text = self.current_query()?;
        self.save_query(&text, name)
    }

    /// Save `query` under `name` and flag matching history entries
    pub fn save_query(&self, query: &str, name: &str) -> WorkspaceResult<SavedQuery> {
        match self.saved.save(query, name) {
            Ok(entry) => {
                self.history.mark_saved(query, true)?;
                self.notify(NoticeLevel::Success, "Query saved successfully");
                Ok(entry)
            }
            Err(e) => {
                let level = match e {
                    SavedQueryError::AlreadySaved { .. } => NoticeLevel::Info,
                    _ => NoticeLevel::Error,
                };
                let message = match e {
                    SavedQueryError::AlreadySaved { .. } => "This query is already saved".to_string(),
                    ref other if other.is_rejection() => other.to_string(),
                    ref other => format!("Failed to save query: {}", other),
                };
                self.notify(level, message);
                Err(e.into())
            }
        }
    }

    /// Delete a saved query and clear the flag on matching history entries
    pub fn delete_saved(&self, index: usize) -> WorkspaceResult<SavedQuery> {
        match self.saved.delete(index) {
            Ok(removed) => {
                self.history.mark_saved(&removed.query, false)?;
                self.notify(NoticeLevel::Info, "Saved query deleted");
                Ok(removed)
            }
            Err(e) => {
                match &e {
                    SavedQueryError::Protected { .. } => self.notify(
                        NoticeLevel::Info,
                        "Predefined example queries cannot be deleted",
                    ),
                    other => self.notify(
                        NoticeLevel::Error,
                        format!("Failed to delete query: {}", other),
                    ),
                }
                Err(e.into())
            }
        }
    }

    // ---- tabs and schema -------------------------------------------------

    /// Persisted tab, `Results` if unset or unknown
    pub fn active_tab(&self) -> WorkspaceResult<Tab> {
        let raw = self.store.get_text(StoreKey::ActiveTabId, Tab::Results.as_str())?;
        Ok(raw.parse().unwrap_or_default())
    }

    pub fn set_active_tab(&self, tab: Tab) -> WorkspaceResult<()> {
        Ok(self.store.set_text(StoreKey::ActiveTabId, tab.as_str())?)
    }

    /// Table currently expanded in the schema panel
    pub fn expanded_table(&self) -> Option<&str> {
        self.expanded_table.as_deref()
    }

    /// Expand `table`, or collapse it if already expanded
    pub fn toggle_schema_table(&mut self, table: &str) {
        if self.expanded_table.as_deref() == Some(table) {
            self.expanded_table = None;
        } else {
            self.expanded_table = Some(table.to_string());
        }
    }

    // ---- cross-context sync ----------------------------------------------

    /// Slots written by other contexts or processes since the last call, in key order
    pub fn foreign_changes(&self) -> Vec<StoreKey> {
        if let Err(e) = self.store.sync_external() {
            Logger::warn(Event::StoreWatchFailed.as_str(), &[("error", &e.to_string())]);
        }
        let Ok(changes) = self.changes.lock() else {
            return Vec::new();
        };
        let context = self.store.context();
        let keys: BTreeSet<StoreKey> = changes
            .drain()
            .into_iter()
            .filter(|e| e.is_foreign_to(context))
            .map(|e| e.key)
            .collect();
        keys.into_iter().collect()
    }

    fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        self.notifier.notify(Notice::new(level, message));
    }
}

/// Notice for an execution outcome; `None` when the error is shown inline
fn outcome_notice(outcome: &ExecutionOutcome) -> Option<Notice> {
    match outcome {
        ExecutionOutcome::Succeeded(result) => Some(Notice::new(
            NoticeLevel::Success,
            format!("Query executed successfully in {:.3}ms", result.duration_ms),
        )),
        ExecutionOutcome::Unchanged(_) => Some(Notice::new(
            NoticeLevel::Info,
            "Query is unchanged. Showing previous results.",
        )),
        ExecutionOutcome::Failed(err) if err.render_inline() => None,
        ExecutionOutcome::Failed(ExecutionError::UnsupportedOperation { .. }) => Some(Notice::new(
            NoticeLevel::Error,
            "Only SELECT queries are supported",
        )),
        ExecutionOutcome::Failed(ExecutionError::Busy) => Some(Notice::new(
            NoticeLevel::Warning,
            "A query is already running",
        )),
        ExecutionOutcome::Failed(ExecutionError::Engine { class, message }) => Some(Notice::new(
            NoticeLevel::Error,
            class.friendly_message(message),
        )),
        ExecutionOutcome::Failed(err) => Some(Notice::new(
            NoticeLevel::Error,
            format!("Query failed: {}", err),
        )),
    }
}
