//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional; anything left out falls back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Dispatcher and worker pool section
    #[serde(default)]
    pub dispatcher: DispatcherSection,

    /// HTTP client section
    #[serde(default)]
    pub client: ClientSection,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Dispatcher configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatcherSection {
    /// Number of worker slots
    pub workers: Option<usize>,

    /// Queue pop order: "lifo" or "fifo"
    pub queue_order: Option<String>,

    /// Maximum queued calls (absent = unbounded)
    pub capacity: Option<usize>,

    /// Overflow policy: "drop-newest" or "drop-oldest"
    pub overflow: Option<String>,

    /// Failure policy: "stop-worker" or "continue"
    pub on_failure: Option<String>,

    /// Treat non-2xx responses as failures
    #[serde(default)]
    pub error_for_status: bool,
}

/// HTTP client configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Request timeout in seconds
    pub timeout: Option<u64>,

    /// `User-Agent` header value
    pub user_agent: Option<String>,
}

/// Logging configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable debug-level logging
    #[serde(default)]
    pub verbose: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# hookpool configuration file

[dispatcher]
# Number of concurrent workers draining the queue (default: 3)
workers = 3

# Which end of the queue workers pop from: "lifo" (default) or "fifo"
# queue_order = "lifo"

# Maximum number of queued calls (default: unbounded)
# capacity = 10000

# What to do when the queue is full: "drop-newest" (default) or "drop-oldest"
# overflow = "drop-newest"

# Reaction to a failed call: "stop-worker" (default) or "continue"
# on_failure = "stop-worker"

# Treat non-2xx responses as failed calls (default: false)
# error_for_status = false

[client]
# Request timeout in seconds (default: 30)
timeout = 30

# User-Agent header value
# user_agent = "hookpool"

[logging]
# Enable debug-level logging
# verbose = false
"#
    .to_string()
}
