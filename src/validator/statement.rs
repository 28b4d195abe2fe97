//! Statement classification by leading keyword
//!
//! Textual prefix test only; the engine is the parser.

use std::fmt;

use serde::Serialize;

/// Kind of statement, judged by its first keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementClass {
    /// `SELECT` followed by whitespace
    Read,
    /// CREATE / DROP / ALTER / TRUNCATE
    Definition(String),
    /// INSERT / UPDATE / DELETE / REPLACE / MERGE
    Mutation(String),
    /// Anything else, including `SELECT` not followed by whitespace
    Unrecognized(String),
}

const DEFINITION_KEYWORDS: &[&str] = &["CREATE", "DROP", "ALTER", "TRUNCATE"];
const MUTATION_KEYWORDS: &[&str] = &["INSERT", "UPDATE", "DELETE", "REPLACE", "MERGE"];

impl StatementClass {
    /// Classify `text` by its upper-cased, trimmed prefix
    pub fn classify(text: &str) -> Self {
        let upper = text.trim().to_uppercase();

        if let Some(rest) = upper.strip_prefix("SELECT") {
            if rest.starts_with(char::is_whitespace) {
                return StatementClass::Read;
            }
        }

        let keyword: String = upper
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();

        if DEFINITION_KEYWORDS.contains(&keyword.as_str()) {
            StatementClass::Definition(keyword)
        } else if MUTATION_KEYWORDS.contains(&keyword.as_str()) {
            StatementClass::Mutation(keyword)
        } else {
            StatementClass::Unrecognized(keyword)
        }
    }

    /// True only for read statements
    pub fn is_read(&self) -> bool {
        matches!(self, StatementClass::Read)
    }

    /// Leading keyword as written (upper-cased)
    pub fn keyword(&self) -> &str {
        match self {
            StatementClass::Read => "SELECT",
            StatementClass::Definition(k)
            | StatementClass::Mutation(k)
            | StatementClass::Unrecognized(k) => k,
        }
    }

    /// Class name for messages and logs
    pub fn class_name(&self) -> &'static str {
        match self {
            StatementClass::Read => "read",
            StatementClass::Definition(_) => "definition",
            StatementClass::Mutation(_) => "mutation",
            StatementClass::Unrecognized(_) => "unrecognized",
        }
    }
}

impl fmt::Display for StatementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}
