//! Fire-and-forget dispatch of outbound HTTP calls.
//!
//! This module provides:
//! - The dispatcher and its worker pool ([`Dispatcher`])
//! - Queued call values ([`PendingCall`], [`CallOptions`], [`Verb`])
//! - Tuning ([`DispatcherConfig`], [`QueueOrder`], [`OverflowPolicy`], [`FailurePolicy`])
//! - Worker lifecycle introspection ([`WorkerState`])
//!
//! # Lifecycle
//!
//! Every enqueue appends to the queue and refreshes the pool: each of the
//! `num_workers` slots whose worker is not running gets a new worker, started
//! immediately. A worker drains the queue until it is empty and exits; it is
//! never restarted. At most `num_workers` workers run at once.

mod call;
mod config;
mod dispatcher;
mod error;
mod policy;
mod queue;
mod verb;
mod worker;

#[cfg(test)]
mod test_fixtures;

pub use call::{CallOptions, PendingCall};
pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use policy::{FailurePolicy, OverflowPolicy, ParseChoiceError, QueueOrder};
pub use verb::{ParseVerbError, Verb};
pub use worker::WorkerState;
