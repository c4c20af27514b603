//! Scheduling run configuration.
//!
//! Controls chunking, trace labelling and the name of the chosen-alternative
//! column. Loadable from TOML so runs can be tuned without code changes.
//!
//! # Examples
//!
//! ```
//! use tour_schedule::config::SchedulingConfig;
//!
//! let config = SchedulingConfig::from_toml_str(r#"
//!     chunk_size = 500
//!     trace_label = "non_mandatory_tour_scheduling"
//! "#).unwrap();
//!
//! assert_eq!(config.chunk_size, 500);
//! assert_eq!(config.choice_column, "tdd");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default trace label for a full scheduling run.
pub const DEFAULT_TRACE_LABEL: &str = "vectorize_tour_scheduling";

/// Default name of the chosen-alternative column.
pub const DEFAULT_CHOICE_COLUMN: &str = "tdd";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SchedulingConfig {
    /// Maximum choosers per interaction sub-batch (0 = no chunking).
    pub chunk_size: usize,
    /// Base label for tracing spans and log lines.
    pub trace_label: String,
    /// Name under which alternative ids appear in the interaction dataset.
    pub choice_column: String,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 0,
            trace_label: DEFAULT_TRACE_LABEL.to_string(),
            choice_column: DEFAULT_CHOICE_COLUMN.to_string(),
        }
    }
}

impl SchedulingConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the trace label.
    pub fn with_trace_label(mut self, label: impl Into<String>) -> Self {
        self.trace_label = label.into();
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.choice_column.is_empty() {
            return Err(ConfigError::Invalid("choice_column must not be empty".into()));
        }
        if self.trace_label.is_empty() {
            return Err(ConfigError::Invalid("trace_label must not be empty".into()));
        }
        Ok(())
    }
}
