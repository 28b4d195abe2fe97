//! Search filtering over result rows
//!
//! A row matches when any visible column's text contains the term,
//! case-insensitively. Nulls and missing cells never match.

use serde_json::Value;

use crate::catalog::Row;

/// Evaluates a search term against rows
pub struct SearchFilter;

impl SearchFilter {
    /// Rows matching `term` over `columns`; an empty term keeps every row
    pub fn apply<'a>(rows: &'a [Row], columns: &[String], term: &str) -> Vec<&'a Row> {
        if term.is_empty() {
            return rows.iter().collect();
        }
        let needle = term.to_lowercase();
        rows.iter()
            .filter(|row| Self::matches(row, columns, &needle))
            .collect()
    }

    /// Checks one row against an already lower-cased term
    pub fn matches(row: &Row, columns: &[String], needle: &str) -> bool {
        columns.iter().any(|column| {
            row.get(column)
                .and_then(display_text)
                .map(|text| text.to_lowercase().contains(needle))
                .unwrap_or(false)
        })
    }
}

/// Text shown for a cell; `None` for null
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            // f64 Display drops a zero fraction: 14.0 shows as "14"
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}
