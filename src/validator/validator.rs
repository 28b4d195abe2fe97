//! Schema-aware pre-flight checks
//!
//! Regex-level, not a parser. Catches the common single-table mistakes
//! (unknown table, misspelt column) before the engine sees the query and
//! stays out of the way for anything more complex.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::errors::{ValidationError, ValidationResult};
use crate::catalog::DatasetCatalog;

struct Patterns {
    join: Regex,
    from_table: Regex,
    projection: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        join: Regex::new(r"(?i)\bJOIN\b").expect("static pattern"),
        from_table: Regex::new(r"(?i)\bFROM\s+(\w+)").expect("static pattern"),
        projection: Regex::new(r"(?is)\bSELECT\s+(.*?)\s+FROM\b").expect("static pattern"),
    })
}

/// Validates a read query against the dataset catalog
#[derive(Debug, Clone)]
pub struct QueryValidator {
    dataset: Arc<DatasetCatalog>,
}

impl QueryValidator {
    /// Validator over `dataset`; patterns are compiled once per process
    pub fn new(dataset: Arc<DatasetCatalog>) -> Self {
        Self { dataset }
    }

    /// Dataset the validator checks against
    pub fn dataset(&self) -> &DatasetCatalog {
        &self.dataset
    }

    /// Check `text`; `Ok` when the query looks runnable or is too
    /// complex to judge
    pub fn validate(&self, text: &str) -> ValidationResult<()> {
        let patterns = patterns();
        if patterns.join.is_match(text) {
            return Ok(());
        }

        let Some(table) = patterns.from_table.captures(text).and_then(|c| c.get(1)) else {
            return Ok(());
        };
        let table = table.as_str();

        if !self.dataset.contains(table) {
            return Err(ValidationError::Table {
                table: table.to_string(),
            });
        }

        let Some(list) = patterns.projection.captures(text).and_then(|c| c.get(1)) else {
            return Ok(());
        };
        let list = list.as_str().trim();
        if list == "*" {
            return Ok(());
        }

        // Tables without a sample row cannot be column-checked
        let Some(available) = self.dataset.sample_columns(table) else {
            return Ok(());
        };

        for column in projected_columns(list) {
            if !available.contains(&column) {
                return Err(ValidationError::Column {
                    column: column.to_string(),
                    table: table.to_string(),
                    available: available.iter().map(|c| c.to_string()).collect(),
                });
            }
        }

        Ok(())
    }
}

/// Plain column references of a projection list, in order
fn projected_columns(list: &str) -> Vec<&str> {
    list.split(',').filter_map(column_reference).collect()
}

/// Column named by one projection item, `None` for expressions,
/// literals and wildcards
fn column_reference(item: &str) -> Option<&str> {
    let mut tokens = item.split_whitespace();
    let mut first = tokens.next()?;
    if first.eq_ignore_ascii_case("DISTINCT") || first.eq_ignore_ascii_case("ALL") {
        first = tokens.next()?;
    }

    let name = first.rsplit('.').next().unwrap_or(first);
    if name.is_empty() || name == "*" || name.contains('(') || name.contains(')') {
        return None;
    }
    if is_literal(name) {
        return None;
    }
    Some(name)
}

fn is_literal(token: &str) -> bool {
    token.starts_with(|c: char| c == '\'' || c == '"' || c.is_ascii_digit())
        || token.parse::<f64>().is_ok()
}
