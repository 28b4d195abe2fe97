//! SQLite-backed engine
//!
//! Registers every dataset table into a private in-memory database at
//! construction. Columns are untyped (SQLite affinity `BLOB`), booleans are
//! stored as 0/1. Once loaded the connection is switched to `query_only`, so
//! any statement that writes fails inside SQLite itself.

use std::sync::Mutex;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::{Number, Value};

use super::{EngineFailure, EngineResult, SqlEngine};
use crate::catalog::{DatasetCatalog, Row};

/// In-memory SQLite database holding one dataset
pub struct SqliteEngine {
    conn: Mutex<Connection>,
}

impl SqliteEngine {
    /// Open an in-memory database and load `dataset` into it
    pub fn new(dataset: &DatasetCatalog) -> EngineResult<Self> {
        let mut conn = Connection::open_in_memory()?;
        let tx = conn.transaction()?;
        for (name, rows) in dataset.tables() {
            register_table(&tx, name, rows)?;
        }
        tx.commit()?;
        conn.execute_batch("PRAGMA query_only = ON;")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl std::fmt::Debug for SqliteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteEngine").finish_non_exhaustive()
    }
}

impl SqlEngine for SqliteEngine {
    fn execute(&self, sql: &str) -> EngineResult<Vec<Row>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineFailure::new(format!("lock: {e}")))?;

        let mut stmt = conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (i, name) in names.iter().enumerate() {
                record.insert(name.clone(), to_json(row.get_ref(i)?));
            }
            out.push(record);
        }
        Ok(out)
    }
}

fn register_table(conn: &Connection, name: &str, rows: &[Row]) -> EngineResult<()> {
    // Column order follows first appearance across all rows
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }
    if columns.is_empty() {
        // SQLite needs at least one column; keep the table queryable
        columns.push("_");
    }

    let column_list = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!(
        "CREATE TABLE {} ({});",
        quote_ident(name),
        column_list
    ))?;

    if rows.is_empty() {
        return Ok(());
    }

    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut insert = conn.prepare(&format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(name),
        column_list,
        placeholders
    ))?;

    for row in rows {
        let values = columns
            .iter()
            .map(|c| to_sql(row.get(*c).unwrap_or(&Value::Null)));
        insert.execute(params_from_iter(values))?;
    }
    Ok(())
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}
