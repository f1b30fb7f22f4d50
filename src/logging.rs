//! Tracing subscriber setup for applications embedding the dispatcher.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! the application's call. [`setup_tracing`] is the stock choice.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber as the global default.
///
/// Logs at INFO, or DEBUG when `verbose` is set; `RUST_LOG` overrides both.
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn setup_tracing(verbose: bool) -> bool {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
