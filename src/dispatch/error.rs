//! Error types for dispatching calls.

use thiserror::Error;

use crate::transport::HttpError;

/// Error raised while issuing a queued call, or while building a dispatcher.
///
/// Call failures are never returned to the code that enqueued the call;
/// they surface only from [`sync_flush`](super::Dispatcher::sync_flush) and
/// in the logs.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The HTTP call itself failed.
    #[error("Transport error: {0}")]
    Transport(#[from] HttpError),

    /// The server answered with a non-success status.
    ///
    /// Only produced when status checking is enabled.
    #[error("Non-success status {status}")]
    Status {
        /// The HTTP status code received
        status: http::StatusCode,
        /// Response body, if valid UTF-8
        body: Option<String>,
    },

    /// No tokio runtime was available to run workers on.
    #[error("Dispatcher must be created inside a tokio runtime")]
    NoRuntime(#[source] tokio::runtime::TryCurrentError),
}
