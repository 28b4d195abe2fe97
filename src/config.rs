//! Configuration file
//!
//! A single JSON object, every field optional:
//!
//! ```json
//! {
//!   "data_dir": "./.querydeck",
//!   "max_history": 15,
//!   "page_size": 10,
//!   "first_column_width": 180,
//!   "column_width": 150,
//!   "min_column_width": 50,
//!   "log_level": "info"
//! }
//! ```
//!
//! A missing file yields the defaults; a malformed one is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Severity};
use crate::view::{ViewState, WidthDefaults};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File exists but could not be read
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// File is not valid JSON for `Config`
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field is out of range
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CONFIG_READ_FAILED",
            ConfigError::Parse(_) => "CONFIG_PARSE_FAILED",
            ConfigError::Invalid { .. } => "CONFIG_INVALID",
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the durable store slots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// History ring capacity
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Rows per page in the derived view
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Initial width of the first result column
    #[serde(default = "default_first_column_width")]
    pub first_column_width: u32,

    /// Initial width of every other result column
    #[serde(default = "default_column_width")]
    pub column_width: u32,

    /// Floor applied to column resize requests
    #[serde(default = "default_min_column_width")]
    pub min_column_width: u32,

    /// Minimum log severity: trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./.querydeck")
}
fn default_max_history() -> usize {
    15
}
fn default_page_size() -> usize {
    10
}
fn default_first_column_width() -> u32 {
    180
}
fn default_column_width() -> u32 {
    150
}
fn default_min_column_width() -> u32 {
    50
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_history: default_max_history(),
            page_size: default_page_size(),
            first_column_width: default_first_column_width(),
            column_width: default_column_width(),
            min_column_width: default_min_column_width(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        let config = Self::from_json(&content)?;
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_history == 0 {
            return Err(ConfigError::Invalid {
                field: "max_history",
                reason: "must be > 0".into(),
            });
        }

        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: "must be > 0".into(),
            });
        }

        if self.first_column_width < self.min_column_width
            || self.column_width < self.min_column_width
        {
            return Err(ConfigError::Invalid {
                field: "column_width",
                reason: format!(
                    "initial widths must be at least min_column_width ({})",
                    self.min_column_width
                ),
            });
        }

        self.severity()?;
        Ok(())
    }

    /// Column width defaults for result tables
    pub fn width_defaults(&self) -> WidthDefaults {
        WidthDefaults {
            first: self.first_column_width,
            rest: self.column_width,
            min: self.min_column_width,
        }
    }

    /// Fresh view state using the configured page size and widths
    pub fn view_state(&self) -> ViewState {
        ViewState::new(self.page_size, self.width_defaults())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level
            .parse()
            .map_err(|reason| ConfigError::Invalid {
                field: "log_level",
                reason,
            })
    }
}
