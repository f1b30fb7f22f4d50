//! Configuration layer for hookpool.
//!
//! This module provides:
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values come from the TOML file when present and fall back to the
//! built-in defaults otherwise. Every value is validated once, when the
//! [`ValidatedConfig`] is built; the dispatcher and client never see an
//! invalid setting.

pub mod defaults;
mod error;
mod toml;
mod validated;


pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::ValidatedConfig;
