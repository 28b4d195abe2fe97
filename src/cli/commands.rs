//! Command implementations
//!
//! Every subcommand is turned into a `Request` and answered by the same
//! `Session::handle`, so `shell` and one-shot invocations behave alike.
//! One-shot invocations start from a fresh in-process session; only the
//! durable store carries over between them.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::args::{Cli, Command, EditorAction, HistoryAction, SavedAction};
use super::errors::{CliError, CliResult};
use super::io::{
    attach_notices, error_response, read_requests, response, write_envelope, write_error,
    write_response,
};
use crate::config::Config;
use crate::execution::ExecutionOutcome;
use crate::observability::Logger;
use crate::persistence::DurableStore;
use crate::view::{column_label, SortSpec, ViewState};
use crate::workspace::{Notice, NoticeLog, Tab, Workspace};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::load(&cli.config)?;
    Logger::set_min_severity(config.severity()?);

    let store = DurableStore::open_dir(&config.data_dir)?;
    let mut session = Session::open(&config, store)?;

    match cli.command {
        Command::Shell => session.serve(),
        command => {
            let mut last = Value::Null;
            let mut outcome = None;
            let mut notices = Vec::new();
            for request in requests_for(command) {
                let (result, raised) = session.answer(request);
                notices.extend(raised);
                match result {
                    Ok(mut data) => {
                        // the run outcome survives follow-up view requests
                        if let Some(value) = data.get_mut("outcome").map(Value::take) {
                            outcome = Some(value);
                        }
                        last = data;
                    }
                    Err(e) => {
                        write_error(e.code(), &e.to_string(), &notices)?;
                        return Err(e);
                    }
                }
            }
            if let (Value::Object(map), Some(outcome)) = (&mut last, outcome) {
                map.insert("outcome".to_string(), outcome);
            }
            write_response(attach_notices(last, &notices))
        }
    }
}

/// One request, as read by `shell` or built from a subcommand
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Execute `sql`, or the editor contents
    Run { sql: Option<String> },
    /// Current page of the last result
    View,
    Search { term: String },
    /// Cycle the sort on `column`
    Sort { column: String },
    SortBy { column: String, descending: bool },
    Page { page: usize },
    PageSize { size: usize },
    Resize { column: String, width: u32 },
    Editor,
    SetEditor { sql: String },
    History,
    SelectHistory { index: usize },
    RemoveHistory { index: usize },
    ClearHistory,
    Saved,
    SelectSaved { index: usize },
    Save { name: String, sql: Option<String> },
    DeleteSaved { index: usize },
    Schema { table: Option<String> },
    Tab { tab: Option<String> },
    State,
    /// Slots changed by other contexts since the last call
    Sync,
}

fn requests_for(command: Command) -> Vec<Request> {
    match command {
        Command::Run {
            sql,
            search,
            sort,
            desc,
            page,
            page_size,
        } => {
            let mut requests = Vec::new();
            if let Some(size) = page_size {
                requests.push(Request::PageSize { size });
            }
            requests.push(Request::Run { sql });
            if let Some(term) = search {
                requests.push(Request::Search { term });
            }
            if let Some(column) = sort {
                requests.push(Request::SortBy {
                    column,
                    descending: desc,
                });
            }
            if let Some(page) = page {
                requests.push(Request::Page { page });
            }
            requests
        }
        Command::Editor { action } => vec![match action {
            EditorAction::Get => Request::Editor,
            EditorAction::Set { sql } => Request::SetEditor { sql },
        }],
        Command::History { action } => vec![match action {
            HistoryAction::List => Request::History,
            HistoryAction::Select { index } => Request::SelectHistory { index },
            HistoryAction::Remove { index } => Request::RemoveHistory { index },
            HistoryAction::Clear => Request::ClearHistory,
        }],
        Command::Saved { action } => vec![match action {
            SavedAction::List => Request::Saved,
            SavedAction::Select { index } => Request::SelectSaved { index },
            SavedAction::Save { name, sql } => Request::Save { name, sql },
            SavedAction::Delete { index } => Request::DeleteSaved { index },
        }],
        Command::Schema { table } => vec![Request::Schema { table }],
        Command::Tab { tab } => vec![Request::Tab { tab }],
        Command::State => vec![Request::State],
        Command::Shell => Vec::new(),
    }
}

/// A workspace plus the UI-only view state of one user
pub struct Session {
    workspace: Workspace,
    notices: Arc<NoticeLog>,
    view: ViewState,
    fresh_view: ViewState,
}

impl Session {
    /// Open a session over `store` with the bundled dataset
    pub fn open(config: &Config, store: DurableStore) -> CliResult<Self> {
        let notices = Arc::new(NoticeLog::new());
        let workspace = Workspace::northwind(config, store, notices.clone())?;
        Ok(Self {
            workspace,
            notices,
            view: config.view_state(),
            fresh_view: config.view_state(),
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Answer requests from stdin until EOF; failures are reported per line
    fn serve(&mut self) -> CliResult<()> {
        for request in read_requests() {
            let envelope = match request
                .and_then(|value| serde_json::from_value::<Request>(value).map_err(CliError::from))
            {
                Ok(request) => self.reply(request),
                Err(e) => error_response(e.code(), &e.to_string(), &[]),
            };
            write_envelope(&envelope)?;
        }
        Ok(())
    }

    /// Envelope for one request, as written by `shell`.
    ///
    /// Notices raised while handling it are attached on success and failure.
    pub fn reply(&mut self, request: Request) -> Value {
        match self.answer(request) {
            (Ok(data), notices) => response(attach_notices(data, &notices)),
            (Err(e), notices) => error_response(e.code(), &e.to_string(), &notices),
        }
    }

    /// Handle one request and take the notices raised while handling it
    pub fn answer(&mut self, request: Request) -> (CliResult<Value>, Vec<Notice>) {
        let result = self.handle(request);
        (result, self.notices.take())
    }

    fn handle(&mut self, request: Request) -> CliResult<Value> {
        match request {
            Request::Run { sql } => self.run_query(sql),
            Request::View => self.render_view(),
            Request::Search { term } => {
                self.view.set_search(term);
                self.render_view()
            }
            Request::Sort { column } => {
                self.view.toggle_sort(&column);
                self.render_view()
            }
            Request::SortBy { column, descending } => {
                let spec = if descending {
                    SortSpec::desc(column)
                } else {
                    SortSpec::asc(column)
                };
                self.view.set_sort(Some(spec));
                self.render_view()
            }
            Request::Page { page } => {
                let filtered = self.filtered_count();
                self.view.set_page(page, filtered);
                self.render_view()
            }
            Request::PageSize { size } => {
                self.view.set_page_size(size);
                self.render_view()
            }
            Request::Resize { column, width } => {
                self.view.resize_column(&column, width);
                Ok(json!({ "columnWidths": self.view.column_widths() }))
            }
            Request::Editor => Ok(json!({ "query": self.workspace.current_query()? })),
            Request::SetEditor { sql } => {
                self.workspace.set_current_query(&sql)?;
                Ok(json!({ "query": sql }))
            }
            Request::History => Ok(json!({ "history": self.workspace.history()? })),
            Request::SelectHistory { index } => {
                let query = self.workspace.select_from_history(index)?;
                Ok(json!({ "query": query }))
            }
            Request::RemoveHistory { index } => {
                let removed = self.workspace.delete_history(index)?;
                Ok(json!({ "removed": removed }))
            }
            Request::ClearHistory => {
                self.workspace.clear_history()?;
                Ok(json!({ "history": [] }))
            }
            Request::Saved => Ok(json!({ "saved": self.workspace.saved_queries()? })),
            Request::SelectSaved { index } => {
                let query = self.workspace.select_saved(index)?;
                Ok(json!({ "query": query }))
            }
            Request::Save { name, sql } => {
                let saved = match sql {
                    Some(sql) => self.workspace.save_query(&sql, &name)?,
                    None => self.workspace.save_current(&name)?,
                };
                Ok(json!({ "saved": saved }))
            }
            Request::DeleteSaved { index } => {
                let removed = self.workspace.delete_saved(index)?;
                Ok(json!({ "removed": removed }))
            }
            Request::Schema { table } => self.render_schema(table),
            Request::Tab { tab } => {
                if let Some(tab) = tab {
                    let tab: Tab = tab.parse().map_err(CliError::Request)?;
                    self.workspace.set_active_tab(tab)?;
                }
                Ok(json!({ "tab": self.workspace.active_tab()? }))
            }
            Request::State => Ok(json!({
                "query": self.workspace.current_query()?,
                "lastSucceededQuery": self.workspace.last_succeeded_query()?,
                "tab": self.workspace.active_tab()?,
                "execution": self.workspace.execution_state(),
                "view": &self.view,
            })),
            Request::Sync => {
                let changed: Vec<&str> = self
                    .workspace
                    .foreign_changes()
                    .iter()
                    .map(|k| k.as_str())
                    .collect();
                Ok(json!({ "changed": changed }))
            }
        }
    }

    fn run_query(&mut self, sql: Option<String>) -> CliResult<Value> {
        let previous_columns = self.workspace.result().map(|r| r.columns);

        let outcome = match sql {
            Some(sql) => {
                self.workspace.set_current_query(&sql)?;
                self.workspace.execute(&sql)?
            }
            None => self.workspace.execute_current()?,
        };

        match outcome {
            ExecutionOutcome::Failed(err) => Err(err.into()),
            ExecutionOutcome::Unchanged(_) => {
                let mut data = self.render_view()?;
                data["outcome"] = json!("unchanged");
                Ok(data)
            }
            ExecutionOutcome::Succeeded(result) => {
                let mut view = self.fresh_view.clone();
                view.set_page_size(self.view.page_size());
                if previous_columns.as_ref() == Some(&result.columns) {
                    for (column, width) in self.view.column_widths() {
                        view.resize_column(column, *width);
                    }
                }
                self.view = view;
                let mut data = self.render_view()?;
                data["outcome"] = json!("succeeded");
                Ok(data)
            }
        }
    }

    fn filtered_count(&mut self) -> usize {
        match self.workspace.result() {
            Some(result) => {
                self.workspace
                    .view(&result, &mut self.view)
                    .filtered_count
            }
            None => 0,
        }
    }

    fn render_view(&mut self) -> CliResult<Value> {
        let Some(result) = self.workspace.result() else {
            return Ok(json!({ "result": null, "error": self.workspace.last_error() }));
        };
        let slice = self.workspace.view(&result, &mut self.view);
        let labels: Vec<String> = result.columns.iter().map(|c| column_label(c)).collect();

        Ok(json!({
            "columns": &result.columns,
            "labels": labels,
            "columnWidths": self.view.column_widths(),
            "rowCount": result.row_count(),
            "durationMs": result.duration_ms,
            "search": self.view.search(),
            "sort": self.view.sort(),
            "pageSize": self.view.page_size(),
            "view": slice,
        }))
    }

    fn render_schema(&mut self, table: Option<String>) -> CliResult<Value> {
        match table {
            Some(name) => {
                let schema = self
                    .workspace
                    .schema()
                    .table(&name)
                    .cloned()
                    .ok_or_else(|| CliError::request(format!("unknown table '{}'", name)))?;
                self.workspace.toggle_schema_table(&name);
                Ok(json!({
                    "table": schema,
                    "expanded": self.workspace.expanded_table(),
                }))
            }
            None => Ok(json!({
                "tables": self.workspace.schema().tables(),
                "expanded": self.workspace.expanded_table(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::open(&Config::default(), DurableStore::in_memory()).unwrap()
    }

    #[test]
    fn test_request_json_shape() {
        let request: Request =
            serde_json::from_str(r#"{"op": "run", "sql": "SELECT * FROM Orders"}"#).unwrap();
        assert_eq!(
            request,
            Request::Run {
                sql: Some("SELECT * FROM Orders".to_string())
            }
        );

        let request: Request = serde_json::from_str(r#"{"op": "clear_history"}"#).unwrap();
        assert_eq!(request, Request::ClearHistory);
    }

    fn ok(session: &mut Session, request: Request) -> Value {
        let reply = session.reply(request);
        assert_eq!(reply["status"], "ok", "{}", reply);
        reply["data"].clone()
    }

    #[test]
    fn test_run_then_page() {
        let mut session = session();
        let data = ok(
            &mut session,
            Request::Run {
                sql: Some("SELECT * FROM OrderDetails".to_string()),
            },
        );
        assert_eq!(data["outcome"], "succeeded");
        assert_eq!(data["rowCount"], 13);
        assert_eq!(data["view"]["totalPages"], 2);
        assert_eq!(data["notices"][0]["level"], "success");

        let data = ok(&mut session, Request::Page { page: 2 });
        assert_eq!(data["view"]["page"], 2);
        assert_eq!(data["view"]["rows"].as_array().unwrap().len(), 3);

        // past the end lands on the last page
        let data = ok(&mut session, Request::Page { page: 3 });
        assert_eq!(data["view"]["page"], 2);

        let data = ok(&mut session, Request::Page { page: 0 });
        assert_eq!(data["view"]["page"], 1);
    }

    #[test]
    fn test_rerun_is_unchanged() {
        let mut session = session();
        let run = || Request::Run {
            sql: Some("SELECT * FROM Employees".to_string()),
        };
        ok(&mut session, run());
        let data = ok(&mut session, run());
        assert_eq!(data["outcome"], "unchanged");
        assert_eq!(session.workspace().history().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_run_reports_code() {
        let mut session = session();
        let reply = session.reply(Request::Run {
            sql: Some("SELECT * FROM Missing".to_string()),
        });
        assert_eq!(reply["status"], "error");
        assert_eq!(reply["code"], "QUERY_VALIDATION_TABLE");
    }

    #[test]
    fn test_unknown_tab_rejected() {
        let mut session = session();
        let (result, _) = session.answer(Request::Tab {
            tab: Some("settings".to_string()),
        });
        assert_eq!(result.unwrap_err().code(), "CLI_INVALID_REQUEST");
    }

    #[test]
    fn test_rejected_run_carries_notice() {
        let mut session = session();
        let reply = session.reply(Request::Run {
            sql: Some("DELETE FROM Orders".to_string()),
        });
        assert_eq!(reply["status"], "error");
        assert_eq!(reply["code"], "QUERY_UNSUPPORTED");
        assert_eq!(reply["notices"][0]["level"], "error");
        assert_eq!(reply["notices"][0]["message"], "Only SELECT queries are supported");
    }
}
