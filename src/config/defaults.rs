//! Default values for configuration options.

use std::time::Duration;

/// Default number of worker slots.
pub const WORKERS: usize = 3;

/// Default queue pop order.
pub const QUEUE_ORDER: &str = "lifo";

/// Default overflow policy for a bounded queue.
pub const OVERFLOW: &str = "drop-newest";

/// Default reaction to a failed call.
pub const ON_FAILURE: &str = "stop-worker";

/// Default request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` header value.
pub const USER_AGENT: &str = concat!("hookpool/", env!("CARGO_PKG_VERSION"));

/// Default request timeout as Duration.
#[must_use]
pub const fn request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}
