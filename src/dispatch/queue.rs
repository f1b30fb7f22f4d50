//! The shared queue of pending calls.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{OverflowPolicy, PendingCall, QueueOrder};

/// Result of appending a call to the queue.
#[derive(Debug)]
pub enum PushOutcome {
    /// The call was appended.
    Queued,
    /// The queue was full and the incoming call was rejected.
    Rejected(PendingCall),
    /// The queue was full; the oldest call was evicted and the new one appended.
    Evicted(PendingCall),
}

/// Double-ended queue of pending calls shared by the dispatcher and its workers.
///
/// Calls are appended at the tail and popped from the end selected by
/// [`QueueOrder`]. Every operation takes the internal lock for its full
/// duration, so a pop is an indivisible test-and-remove.
#[derive(Debug)]
pub struct CallQueue {
    calls: Mutex<VecDeque<PendingCall>>,
    order: QueueOrder,
    capacity: Option<NonZeroUsize>,
    overflow: OverflowPolicy,
}

impl CallQueue {
    /// Creates an unbounded queue.
    #[must_use]
    pub const fn new(order: QueueOrder) -> Self {
        Self {
            calls: Mutex::new(VecDeque::new()),
            order,
            capacity: None,
            overflow: OverflowPolicy::DropNewest,
        }
    }

    /// Creates a queue holding at most `capacity` calls.
    #[must_use]
    pub const fn bounded(
        order: QueueOrder,
        capacity: NonZeroUsize,
        overflow: OverflowPolicy,
    ) -> Self {
        Self {
            calls: Mutex::new(VecDeque::new()),
            order,
            capacity: Some(capacity),
            overflow,
        }
    }

    // Queue operations never panic mid-update, so a poisoned lock still
    // guards a consistent deque.
    fn lock(&self) -> MutexGuard<'_, VecDeque<PendingCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a call at the tail, applying the overflow policy when full.
    pub fn push(&self, call: PendingCall) -> PushOutcome {
        let mut calls = self.lock();

        let full = self
            .capacity
            .is_some_and(|capacity| calls.len() >= capacity.get());
        if !full {
            calls.push_back(call);
            return PushOutcome::Queued;
        }

        match self.overflow {
            OverflowPolicy::DropNewest => PushOutcome::Rejected(call),
            OverflowPolicy::DropOldest => {
                let evicted = calls.pop_front();
                calls.push_back(call);
                evicted.map_or(PushOutcome::Queued, PushOutcome::Evicted)
            }
        }
    }

    /// Removes and returns the next call, or `None` if the queue is empty.
    pub fn pop(&self) -> Option<PendingCall> {
        let mut calls = self.lock();
        match self.order {
            QueueOrder::Lifo => calls.pop_back(),
            QueueOrder::Fifo => calls.pop_front(),
        }
    }

    /// Returns the number of queued calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no calls are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{CallOptions, Verb};

    fn call(path: &str) -> PendingCall {
        let url = url::Url::parse("https://example.com/")
            .unwrap()
            .join(path)
            .unwrap();
        PendingCall::new(Verb::Post, url, CallOptions::new())
    }

    fn path_of(call: &PendingCall) -> &str {
        call.url().path()
    }

    #[test]
    fn lifo_pops_most_recent_first() {
        let queue = CallQueue::new(QueueOrder::Lifo);
        queue.push(call("a"));
        queue.push(call("b"));
        queue.push(call("c"));

        let order: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|c| path_of(&c).to_string())
            .collect();

        assert_eq!(order, ["/c", "/b", "/a"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn fifo_pops_in_arrival_order() {
        let queue = CallQueue::new(QueueOrder::Fifo);
        queue.push(call("a"));
        queue.push(call("b"));

        assert_eq!(path_of(&queue.pop().unwrap()), "/a");
        assert_eq!(path_of(&queue.pop().unwrap()), "/b");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn drop_newest_rejects_when_full() {
        let capacity = NonZeroUsize::new(2).unwrap();
        let queue = CallQueue::bounded(QueueOrder::Lifo, capacity, OverflowPolicy::DropNewest);
        queue.push(call("a"));
        queue.push(call("b"));

        let outcome = queue.push(call("c"));

        assert!(matches!(outcome, PushOutcome::Rejected(ref c) if path_of(c) == "/c"));
        assert_eq!(queue.len(), 2);
        assert_eq!(path_of(&queue.pop().unwrap()), "/b");
    }

    #[test]
    fn drop_oldest_evicts_head_when_full() {
        let capacity = NonZeroUsize::new(2).unwrap();
        let queue = CallQueue::bounded(QueueOrder::Fifo, capacity, OverflowPolicy::DropOldest);
        queue.push(call("a"));
        queue.push(call("b"));

        let outcome = queue.push(call("c"));

        assert!(matches!(outcome, PushOutcome::Evicted(ref c) if path_of(c) == "/a"));
        assert_eq!(queue.len(), 2);
        assert_eq!(path_of(&queue.pop().unwrap()), "/b");
        assert_eq!(path_of(&queue.pop().unwrap()), "/c");
    }

    #[test]
    fn concurrent_pops_hand_out_each_call_once() {
        let queue = std::sync::Arc::new(CallQueue::new(QueueOrder::Lifo));
        for i in 0..1000 {
            queue.push(call(&format!("c{i}")));
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let queue = std::sync::Arc::clone(&queue);
                std::thread::spawn(move || {
                    std::iter::from_fn(|| queue.pop())
                        .map(|c| path_of(&c).to_string())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        seen.sort();
        seen.dedup();

        assert_eq!(seen.len(), 1000);
        assert!(queue.is_empty());
    }
}
