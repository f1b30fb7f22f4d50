//! HTTP transport used by the dispatcher.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The client abstraction the dispatcher issues calls through ([`HttpClient`])
//! - The production client over `reqwest` ([`ReqwestClient`], [`ClientConfig`])

mod client;
mod error;
mod request;


pub use client::{ClientConfig, ReqwestClient};
pub use error::HttpError;
pub use request::{HttpClient, HttpRequest, HttpResponse};
