//! Validation error types
//!
//! Error codes:
//! - QUERY_VALIDATION_TABLE
//! - QUERY_VALIDATION_COLUMN

use thiserror::Error;

/// Result type for pre-flight validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A query referenced something the dataset does not have
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `FROM` names an unregistered table
    #[error("Table \"{table}\" does not exist in the database. Please check the table name.")]
    Table { table: String },

    /// A projected column is not in the table's sample row
    #[error("Column \"{column}\" does not exist in table \"{table}\". Available columns are: {}", available.join(", "))]
    Column {
        column: String,
        table: String,
        available: Vec<String>,
    },
}

impl ValidationError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Table { .. } => "QUERY_VALIDATION_TABLE",
            ValidationError::Column { .. } => "QUERY_VALIDATION_COLUMN",
        }
    }

    /// Table the error is about
    pub fn table(&self) -> &str {
        match self {
            ValidationError::Table { table } | ValidationError::Column { table, .. } => table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_message_lists_available() {
        let err = ValidationError::Column {
            column: "Bogus".into(),
            table: "Customers".into(),
            available: vec!["CustomerID".into(), "Country".into()],
        };
        assert_eq!(
            err.to_string(),
            "Column \"Bogus\" does not exist in table \"Customers\". Available columns are: CustomerID, Country"
        );
        assert_eq!(err.code(), "QUERY_VALIDATION_COLUMN");
    }

    #[test]
    fn test_table_message() {
        let err = ValidationError::Table {
            table: "Missing".into(),
        };
        assert!(err.to_string().starts_with("Table \"Missing\" does not exist"));
        assert_eq!(err.table(), "Missing");
    }
}
