//! Shared test fixtures for dispatcher tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Stub HTTP client with scripted failures, latency and call recording.
#[derive(Debug)]
pub struct StubClient {
    latency: Option<Duration>,
    failing_calls: HashSet<usize>,
    status: http::StatusCode,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubClient {
    /// A client that answers every call with 200 OK immediately.
    pub fn new() -> Self {
        Self {
            latency: None,
            failing_calls: HashSet::new(),
            status: http::StatusCode::OK,
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Sleeps this long inside every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fails the given calls (1-based, in the order the client sees them).
    pub fn failing_on(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_calls.extend(calls);
        self
    }

    /// Answers every successful call with this status.
    pub fn with_status(mut self, status: http::StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Number of calls received, including failed ones.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Requests received, in arrival order.
    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Paths of the requests received, in arrival order.
    pub fn captured_paths(&self) -> Vec<String> {
        self.captured_requests()
            .iter()
            .map(|req| req.url.path().to_string())
            .collect()
    }
}

impl HttpClient for StubClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(req);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_calls.contains(&call) {
            return Err(HttpError::Connection(Box::new(std::io::Error::other(
                "connection refused",
            ))));
        }

        Ok(HttpResponse::new(
            self.status,
            http::HeaderMap::new(),
            b"stub".to_vec(),
        ))
    }
}

/// Builds `https://hooks.test/<path>`.
pub fn hook_url(path: &str) -> url::Url {
    url::Url::parse("https://hooks.test/")
        .unwrap()
        .join(path)
        .unwrap()
}
