//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A count (workers, capacity) is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidCount {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A string option names none of its accepted values.
    #[error("Invalid value '{value}' for {field}: expected {expected}")]
    InvalidChoice {
        /// Name of the field
        field: &'static str,
        /// The rejected value
        value: String,
        /// Accepted values
        expected: &'static str,
    },

    /// Invalid duration value (zero or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A value meant for an HTTP header is not a valid header value.
    #[error("Invalid header value for '{name}': {reason}")]
    InvalidHeaderValue {
        /// The header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names used in error values.
pub mod field {
    /// `dispatcher.workers`
    pub const WORKERS: &str = "dispatcher.workers";
    /// `dispatcher.queue_order`
    pub const QUEUE_ORDER: &str = "dispatcher.queue_order";
    /// `dispatcher.capacity`
    pub const CAPACITY: &str = "dispatcher.capacity";
    /// `dispatcher.overflow`
    pub const OVERFLOW: &str = "dispatcher.overflow";
    /// `dispatcher.on_failure`
    pub const ON_FAILURE: &str = "dispatcher.on_failure";
    /// `client.timeout`
    pub const TIMEOUT: &str = "client.timeout";
}

impl ConfigError {
    /// Creates an `InvalidChoice` error from a policy parse failure.
    #[must_use]
    pub fn choice(field: &'static str, err: crate::dispatch::ParseChoiceError) -> Self {
        Self::InvalidChoice {
            field,
            value: err.value,
            expected: err.expected,
        }
    }
}
