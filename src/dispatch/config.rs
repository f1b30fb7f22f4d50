//! Dispatcher tuning knobs.

use std::num::NonZeroUsize;

use super::{FailurePolicy, OverflowPolicy, QueueOrder};

/// Configuration for a [`Dispatcher`](super::Dispatcher).
///
/// # Defaults
///
/// - `num_workers`: 3
/// - `queue_order`: LIFO
/// - `capacity`: unbounded
/// - `overflow`: drop newest
/// - `failure_policy`: stop worker
/// - `error_for_status`: false
///
/// # Example
///
/// ```
/// use hookpool::dispatch::{DispatcherConfig, FailurePolicy, QueueOrder};
///
/// let config = DispatcherConfig::new()
///     .with_num_workers(5)
///     .with_queue_order(QueueOrder::Fifo)
///     .with_failure_policy(FailurePolicy::Continue);
/// assert_eq!(config.num_workers, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Number of worker slots, fixed for the dispatcher's lifetime.
    pub num_workers: usize,

    /// End of the queue workers pop from.
    pub queue_order: QueueOrder,

    /// Maximum number of queued calls. `None` means unbounded.
    pub capacity: Option<NonZeroUsize>,

    /// What to do with a call enqueued while the queue is full.
    pub overflow: OverflowPolicy,

    /// How a drain loop reacts to a failed call.
    pub failure_policy: FailurePolicy,

    /// Treat non-2xx responses as failed calls.
    pub error_for_status: bool,
}

impl DispatcherConfig {
    /// Default number of workers.
    pub const DEFAULT_NUM_WORKERS: usize = 3;

    /// Minimum value for `num_workers`.
    pub const MIN_NUM_WORKERS: usize = 1;

    /// Creates a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            num_workers: Self::DEFAULT_NUM_WORKERS,
            queue_order: QueueOrder::Lifo,
            capacity: None,
            overflow: OverflowPolicy::DropNewest,
            failure_policy: FailurePolicy::StopWorker,
            error_for_status: false,
        }
    }

    /// Sets the number of worker slots.
    ///
    /// # Panics
    ///
    /// Panics if `num_workers` is 0.
    #[must_use]
    pub const fn with_num_workers(mut self, num_workers: usize) -> Self {
        assert!(
            num_workers >= Self::MIN_NUM_WORKERS,
            "num_workers must be at least 1"
        );
        self.num_workers = num_workers;
        self
    }

    /// Sets the queue pop order.
    #[must_use]
    pub const fn with_queue_order(mut self, order: QueueOrder) -> Self {
        self.queue_order = order;
        self
    }

    /// Bounds the queue and sets the overflow policy.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: NonZeroUsize, overflow: OverflowPolicy) -> Self {
        self.capacity = Some(capacity);
        self.overflow = overflow;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Enables or disables treating non-2xx responses as failures.
    #[must_use]
    pub const fn with_error_for_status(mut self, enabled: bool) -> Self {
        self.error_for_status = enabled;
        self
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_three_workers_and_baseline_policies() {
        let config = DispatcherConfig::default();

        assert_eq!(config.num_workers, 3);
        assert_eq!(config.queue_order, QueueOrder::Lifo);
        assert!(config.capacity.is_none());
        assert_eq!(config.failure_policy, FailurePolicy::StopWorker);
        assert!(!config.error_for_status);
    }

    #[test]
    fn with_capacity_sets_bound_and_overflow() {
        let capacity = NonZeroUsize::new(100).unwrap();
        let config = DispatcherConfig::new().with_capacity(capacity, OverflowPolicy::DropOldest);

        assert_eq!(config.capacity, Some(capacity));
        assert_eq!(config.overflow, OverflowPolicy::DropOldest);
    }

    #[test]
    #[should_panic(expected = "num_workers must be at least 1")]
    fn zero_workers_panics() {
        let _ = DispatcherConfig::new().with_num_workers(0);
    }
}
