//! Worker slots and the per-worker lifecycle state.

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use tokio::sync::Notify;

/// Lifecycle of a single worker.
///
/// Transitions only move forward: `Idle → Running → Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, not yet started.
    Idle,
    /// Drain loop executing.
    Running,
    /// Drain loop returned, failed, or panicked. Never restarted.
    Finished,
}

impl WorkerState {
    const fn to_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Finished => 2,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Running,
            _ => Self::Finished,
        }
    }
}

/// Atomic cell holding a [`WorkerState`], shared between a slot and its task.
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    const fn new() -> Self {
        Self(AtomicU8::new(WorkerState::Idle.to_u8()))
    }

    fn load(&self) -> WorkerState {
        WorkerState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn begin(&self) -> bool {
        self.0
            .compare_exchange(
                WorkerState::Idle.to_u8(),
                WorkerState::Running.to_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    fn finish(&self) {
        self.0.store(WorkerState::Finished.to_u8(), Ordering::Release);
    }
}

/// Marks its worker `Finished` when dropped.
///
/// Held by the running task, so the transition also happens when the drain
/// loop panics and the task unwinds.
#[derive(Debug)]
pub struct FinishGuard {
    state: Arc<StateCell>,
    worker_id: u64,
}

impl FinishGuard {
    /// Returns the id of the worker this guard belongs to.
    #[must_use]
    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.state.finish();
    }
}

/// Counts worker tasks that have been spawned and not yet returned.
///
/// Any number of callers may wait for the count to reach zero at once.
#[derive(Debug, Default)]
pub struct LiveTasks {
    count: AtomicUsize,
    drained: Notify,
}

impl LiveTasks {
    /// Registers one more live task. The task must hold the returned guard
    /// until it returns.
    #[must_use]
    pub fn enter(self: &Arc<Self>) -> LiveTask {
        self.count.fetch_add(1, Ordering::SeqCst);
        LiveTask(Arc::clone(self))
    }

    /// Number of tasks still live.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Resolves once no task is live.
    pub async fn wait_drained(&self) {
        loop {
            let mut drained = pin!(self.drained.notified());
            // Register before checking so a concurrent last exit cannot be missed.
            drained.as_mut().enable();

            if self.count() == 0 {
                return;
            }
            drained.await;
        }
    }
}

/// Keeps its task counted in [`LiveTasks`] until dropped.
#[derive(Debug)]
pub struct LiveTask(Arc<LiveTasks>);

impl Drop for LiveTask {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.drained.notify_waiters();
        }
    }
}

/// The occupant of one fixed-index worker slot.
#[derive(Debug)]
pub struct Worker {
    id: u64,
    slot: usize,
    state: Arc<StateCell>,
}

impl Worker {
    /// Creates an idle worker for the given slot.
    #[must_use]
    pub fn new(id: u64, slot: usize) -> Self {
        Self {
            id,
            slot,
            state: Arc::new(StateCell::new()),
        }
    }

    /// Returns the worker's unique id within its dispatcher.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the index of the slot the worker occupies.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> WorkerState {
        self.state.load()
    }

    /// Returns true while the drain loop is executing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == WorkerState::Running
    }

    /// Moves the worker from `Idle` to `Running`.
    ///
    /// Returns the guard the spawned task must hold for its whole lifetime,
    /// or `None` if the worker was already started once.
    #[must_use]
    pub fn begin(&self) -> Option<FinishGuard> {
        self.state.begin().then(|| FinishGuard {
            state: Arc::clone(&self.state),
            worker_id: self.id,
        })
    }
}
