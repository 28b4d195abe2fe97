//! JSON I/O handling for the CLI
//!
//! - Input (shell): one JSON object per line on stdin
//! - Output: one JSON object per response on stdout
//! - Logs go to stderr and never mix with responses

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::workspace::Notice;

/// Read JSON requests from stdin until EOF; blank lines are skipped
pub fn read_requests() -> impl Iterator<Item = CliResult<Value>> {
    io::stdin()
        .lock()
        .lines()
        .filter(|line| line.as_ref().map(|l| !l.trim().is_empty()).unwrap_or(true))
        .map(|line| {
            let line = line.map_err(CliError::from)?;
            serde_json::from_str(&line).map_err(CliError::from)
        })
}

/// Success envelope
pub fn response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope; notices raised before the failure are attached
pub fn error_response(code: &str, message: &str, notices: &[Notice]) -> Value {
    let envelope = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    attach_notices(envelope, notices)
}

/// Add a `notices` array to an object; left alone when there are none
pub fn attach_notices(mut value: Value, notices: &[Notice]) -> Value {
    if let Value::Object(map) = &mut value {
        if !notices.is_empty() {
            map.insert("notices".to_string(), json!(notices));
        }
    }
    value
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_envelope(&response(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str, notices: &[Notice]) -> CliResult<()> {
    write_envelope(&error_response(code, message, notices))
}

/// Write one envelope as a single line
pub fn write_envelope(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
