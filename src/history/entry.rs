//! History entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successful execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub execution_time_ms: Option<f64>,
    #[serde(default)]
    pub saved: bool,
}

impl HistoryEntry {
    /// Entry stamped now
    pub fn new(query: impl Into<String>, execution_time_ms: Option<f64>, saved: bool) -> Self {
        Self {
            query: query.into(),
            timestamp: Utc::now(),
            execution_time_ms,
            saved,
        }
    }
}
