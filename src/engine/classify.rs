//! Engine error classification
//!
//! The engine is opaque; its failures are sorted by message pattern only.

use serde::Serialize;
use std::fmt;

/// Coarse class of an engine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineErrorClass {
    /// Parser rejected the text
    SyntaxError,
    /// Query names a table the engine does not know
    TableNotFound,
    /// Anything else
    Other,
}

const SYNTAX_MARKERS: &[&str] = &[
    "Parse error",
    "Expecting",
    "SEMICOLON",
    "syntax error",
    "incomplete input",
    "unrecognized token",
];

impl EngineErrorClass {
    /// Classify an engine message
    pub fn classify(message: &str) -> Self {
        if is_table_not_found(message) {
            return EngineErrorClass::TableNotFound;
        }
        if SYNTAX_MARKERS.iter().any(|m| message.contains(m)) {
            return EngineErrorClass::SyntaxError;
        }
        EngineErrorClass::Other
    }

    /// Shown next to the editor rather than as a transient notice
    pub fn render_inline(&self) -> bool {
        matches!(
            self,
            EngineErrorClass::SyntaxError | EngineErrorClass::TableNotFound
        )
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            EngineErrorClass::SyntaxError => "QUERY_ENGINE_SYNTAX",
            EngineErrorClass::TableNotFound => "QUERY_ENGINE_TABLE",
            EngineErrorClass::Other => "QUERY_ENGINE_FAILED",
        }
    }

    /// Short user-facing explanation of `message`
    pub fn friendly_message(&self, message: &str) -> String {
        match self {
            EngineErrorClass::TableNotFound => {
                "Error: Table not found. Please check the table name in your query.".to_string()
            }
            EngineErrorClass::SyntaxError if message.contains("SEMICOLON") => {
                "Syntax error: Missing or misplaced semicolon in your query".to_string()
            }
            EngineErrorClass::SyntaxError if message.contains("FROM") => {
                "Syntax error: Issue with the FROM clause in your query".to_string()
            }
            EngineErrorClass::SyntaxError => {
                "Syntax error in your SQL query. Please check your syntax.".to_string()
            }
            EngineErrorClass::Other => format!("Query failed: {}", message),
        }
    }
}

impl fmt::Display for EngineErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineErrorClass::SyntaxError => "syntax error",
            EngineErrorClass::TableNotFound => "table not found",
            EngineErrorClass::Other => "engine error",
        };
        f.write_str(name)
    }
}

fn is_table_not_found(message: &str) -> bool {
    (message.contains("Table") && message.contains("not found"))
        || message.contains("Cannot find table")
        || message.contains("no such table")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_markers() {
        for msg in [
            "Parse error on line 1: Expecting 'EOF', got 'FORM'",
            "near \"FORM\": syntax error",
            "incomplete input",
            "unrecognized token: \"'abc\"",
        ] {
            assert_eq!(EngineErrorClass::classify(msg), EngineErrorClass::SyntaxError, "{}", msg);
        }
    }

    #[test]
    fn test_table_not_found_markers() {
        for msg in [
            "Table \"Foo\" not found",
            "Cannot find table Foo",
            "no such table: Foo",
        ] {
            assert_eq!(EngineErrorClass::classify(msg), EngineErrorClass::TableNotFound);
        }
    }

    #[test]
    fn test_other_is_not_inline() {
        let class = EngineErrorClass::classify("division by zero");
        assert_eq!(class, EngineErrorClass::Other);
        assert!(!class.render_inline());
        assert!(EngineErrorClass::SyntaxError.render_inline());
        assert!(EngineErrorClass::TableNotFound.render_inline());
    }

    #[test]
    fn test_friendly_message() {
        let class = EngineErrorClass::SyntaxError;
        assert!(class
            .friendly_message("Expecting SEMICOLON")
            .contains("semicolon"));
        assert_eq!(
            EngineErrorClass::Other.friendly_message("boom"),
            "Query failed: boom"
        );
    }
}
