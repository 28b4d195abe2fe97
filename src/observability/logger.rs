//! Structured JSON logger
//!
//! Record layout: `ts`, `event`, `severity`, then caller fields sorted by
//! key. One record per line on stderr, written synchronously; stdout
//! belongs to CLI responses. Records below the process-wide minimum
//! severity are dropped before rendering.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

/// How loud a record is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Severity {
    const LEVELS: [Severity; 4] = [
        Severity::Trace,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Upper-case label written into records
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the config spellings: `trace`, `info`, `warn`/`warning`, `error`
impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("warning") {
            return Ok(Severity::Warn);
        }
        Self::LEVELS
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown log level '{}'", s))
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// Process-wide JSON-lines logger
pub struct Logger;

impl Logger {
    /// Drop records below `severity` from now on
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    pub fn min_severity() -> Severity {
        let raw = MIN_SEVERITY.load(Ordering::Relaxed);
        Severity::LEVELS
            .into_iter()
            .find(|level| *level as u8 == raw)
            .unwrap_or(Severity::Error)
    }

    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Write one record to stderr if `severity` is enabled
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if Self::enabled(severity) {
            Self::write_record(&mut io::stderr().lock(), severity, event, fields);
        }
    }

    pub(crate) fn write_record<W: Write>(
        writer: &mut W,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
    ) {
        let line = Self::render(severity, event, fields);
        // a lost log line never fails the operation being logged
        let _ = writeln!(writer, "{}", line);
    }

    /// One record as a JSON object, without the trailing newline
    pub fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut record = Map::new();
        record.insert(
            "ts".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        record.insert("event".to_string(), Value::String(event.to_string()));
        record.insert("severity".to_string(), Value::String(severity.as_str().to_string()));

        let sorted: BTreeMap<&str, &str> = fields.iter().copied().collect();
        for (key, value) in sorted {
            if !record.contains_key(key) {
                record.insert(key.to_string(), Value::String(value.to_string()));
            }
        }

        Value::Object(record).to_string()
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_levels_ordered() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_config_spellings() {
        assert_eq!("INFO".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!(" warning ".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("trace".parse::<Severity>().unwrap(), Severity::Trace);
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_record_layout() {
        let line = Logger::render(
            Severity::Info,
            "QUERY_BEGIN",
            &[("zebra", "1"), ("query", "SELECT 1")],
        );
        let record = parse(&line);
        assert_eq!(record["event"], "QUERY_BEGIN");
        assert_eq!(record["severity"], "INFO");
        assert_eq!(record["query"], "SELECT 1");
        assert!(record["ts"].as_str().unwrap().ends_with('Z'));

        let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["ts", "event", "severity", "query", "zebra"]);
    }

    #[test]
    fn test_fields_cannot_shadow_header() {
        let record = parse(&Logger::render(Severity::Warn, "E", &[("event", "spoof")]));
        assert_eq!(record["event"], "E");
    }

    #[test]
    fn test_multiline_query_stays_on_one_line() {
        let mut buffer = Vec::new();
        Logger::write_record(
            &mut buffer,
            Severity::Error,
            "E",
            &[("query", "SELECT \"a\"\nFROM t")],
        );
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
        assert_eq!(parse(text.trim_end())["query"], "SELECT \"a\"\nFROM t");
    }
}
