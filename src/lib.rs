//! hookpool: fire-and-forget outbound HTTP calls.
//!
//! A library for queueing webhook-style HTTP calls from a request path and
//! issuing them from a small pool of background workers.

pub mod config;
pub mod dispatch;
pub mod logging;
pub mod transport;
