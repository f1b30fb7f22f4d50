//! Pending calls and the options they carry.

use std::time::Duration;

use serde::Serialize;

use crate::transport::HttpRequest;

use super::Verb;

/// Options forwarded verbatim to the HTTP client when a call is issued.
///
/// The dispatcher never inspects these; they are the call's payload.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Headers to send
    pub headers: http::HeaderMap,
    /// Optional request body
    pub body: Option<Vec<u8>>,
    /// Per-call timeout, overriding the client's default
    pub timeout: Option<Duration>,
}

impl CallOptions {
    /// Creates empty options: no headers, no body, client default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header. Repeated names keep every value.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the raw request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the JSON body and sets `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if `value` cannot be represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(
        mut self,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        self.headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        self.body = Some(body);
        Ok(self)
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// One not-yet-issued HTTP call.
///
/// Immutable once queued and consumed by exactly one worker.
#[derive(Debug, Clone)]
pub struct PendingCall {
    verb: Verb,
    url: url::Url,
    options: CallOptions,
}

impl PendingCall {
    /// Creates a pending call.
    #[must_use]
    pub const fn new(verb: Verb, url: url::Url, options: CallOptions) -> Self {
        Self { verb, url, options }
    }

    /// Returns the verb the call will be issued with.
    #[must_use]
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    /// Returns the target URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Returns the options forwarded to the client.
    #[must_use]
    pub const fn options(&self) -> &CallOptions {
        &self.options
    }

    /// Converts the call into the request handed to the client.
    #[must_use]
    pub fn into_request(self) -> HttpRequest {
        let CallOptions {
            headers,
            body,
            timeout,
        } = self.options;

        let mut request = HttpRequest::new(self.verb.into(), self.url).with_headers(headers);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        if let Some(timeout) = timeout {
            request = request.with_timeout(timeout);
        }
        request
    }
}
