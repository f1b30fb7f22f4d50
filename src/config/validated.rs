//! Validated configuration built from the TOML file and defaults.
//!
//! This module contains the final, validated configuration used to build the
//! dispatcher and its HTTP client. All validation happens during construction.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use http::HeaderValue;

use crate::dispatch::{DispatcherConfig, FailurePolicy, OverflowPolicy, QueueOrder};
use crate::transport::ClientConfig;

use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{ClientSection, DispatcherSection, TomlConfig};

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::load`] for a config file,
/// [`ValidatedConfig::from_toml`] for already-parsed TOML, or
/// [`ValidatedConfig::default`] for built-in defaults only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// Dispatcher and worker pool settings
    pub dispatcher: DispatcherConfig,

    /// HTTP client settings
    pub client: ClientConfig,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherConfig::new().with_num_workers(defaults::WORKERS),
            client: ClientConfig::new()
                .with_timeout(defaults::request_timeout())
                .with_user_agent(defaults::USER_AGENT),
            verbose: false,
        }
    }
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capacity = self
            .dispatcher
            .capacity
            .map_or_else(|| "unbounded".to_string(), |c| c.to_string());
        let timeout = self
            .client
            .timeout
            .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));

        write!(
            f,
            "Config {{ workers: {}, queue_order: {}, capacity: {}, overflow: {}, on_failure: {}, \
             error_for_status: {}, timeout: {} }}",
            self.dispatcher.num_workers,
            self.dispatcher.queue_order,
            capacity,
            self.dispatcher.overflow,
            self.dispatcher.failure_policy,
            self.dispatcher.error_for_status,
            timeout,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from parsed TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `workers` or `capacity` is zero
    /// - A policy name is not recognized
    /// - `timeout` is zero
    /// - `user_agent` is not a valid header value
    pub fn from_toml(toml: &TomlConfig) -> Result<Self, ConfigError> {
        let dispatcher = Self::build_dispatcher(&toml.dispatcher)?;
        let client = Self::build_client(&toml.client)?;

        Ok(Self {
            dispatcher,
            client,
            verbose: toml.logging.verbose,
        })
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The configuration is invalid
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let toml = TomlConfig::load(path)?;
        Self::from_toml(&toml)
    }

    fn build_dispatcher(section: &DispatcherSection) -> Result<DispatcherConfig, ConfigError> {
        let workers = section.workers.unwrap_or(defaults::WORKERS);
        if workers < DispatcherConfig::MIN_NUM_WORKERS {
            return Err(ConfigError::InvalidCount {
                field: field::WORKERS,
                reason: "must be at least 1".to_string(),
            });
        }

        let queue_order: QueueOrder = section
            .queue_order
            .as_deref()
            .unwrap_or(defaults::QUEUE_ORDER)
            .parse()
            .map_err(|e| ConfigError::choice(field::QUEUE_ORDER, e))?;

        let overflow: OverflowPolicy = section
            .overflow
            .as_deref()
            .unwrap_or(defaults::OVERFLOW)
            .parse()
            .map_err(|e| ConfigError::choice(field::OVERFLOW, e))?;

        let failure_policy: FailurePolicy = section
            .on_failure
            .as_deref()
            .unwrap_or(defaults::ON_FAILURE)
            .parse()
            .map_err(|e| ConfigError::choice(field::ON_FAILURE, e))?;

        let mut config = DispatcherConfig::new()
            .with_num_workers(workers)
            .with_queue_order(queue_order)
            .with_failure_policy(failure_policy)
            .with_error_for_status(section.error_for_status);

        // Overflow only means something for a bounded queue.
        config.overflow = overflow;
        if let Some(capacity) = section.capacity {
            let capacity = NonZeroUsize::new(capacity).ok_or_else(|| ConfigError::InvalidCount {
                field: field::CAPACITY,
                reason: "must be at least 1; omit it for an unbounded queue".to_string(),
            })?;
            config = config.with_capacity(capacity, overflow);
        }

        Ok(config)
    }

    fn build_client(section: &ClientSection) -> Result<ClientConfig, ConfigError> {
        let seconds = section.timeout.unwrap_or(defaults::REQUEST_TIMEOUT_SECS);
        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: field::TIMEOUT,
                reason: "must be greater than 0".to_string(),
            });
        }

        let user_agent = section.user_agent.as_deref().unwrap_or(defaults::USER_AGENT);
        HeaderValue::from_str(user_agent).map_err(|e| ConfigError::InvalidHeaderValue {
            name: http::header::USER_AGENT.to_string(),
            reason: e.to_string(),
        })?;

        Ok(ClientConfig::new()
            .with_timeout(Duration::from_secs(seconds))
            .with_user_agent(user_agent))
    }
}
