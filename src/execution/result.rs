//! Execution result

use serde::{Deserialize, Serialize};

use crate::catalog::Row;

/// Rows of one successful run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Keys of the first row, in order; empty when there are no rows
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub duration_ms: f64,
}

impl ExecutionResult {
    /// Wrap engine rows
    pub fn from_rows(rows: Vec<Row>, duration_ms: f64) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            columns,
            rows,
            duration_ms,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
