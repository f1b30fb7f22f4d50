//! The dispatcher: shared queue, fixed worker pool, and completion counters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;

use crate::transport::HttpClient;

use super::queue::{CallQueue, PushOutcome};
use super::worker::{FinishGuard, LiveTask, LiveTasks, Worker};
use super::{
    CallOptions, DispatchError, DispatcherConfig, FailurePolicy, PendingCall, Verb, WorkerState,
};

/// Fire-and-forget HTTP dispatcher backed by a small pool of workers.
///
/// Enqueuing appends a call to a shared queue and makes sure that up to
/// `num_workers` workers are draining it. Workers are tokio tasks spawned on
/// the runtime the dispatcher was built on; each one issues calls until it
/// finds the queue empty and then exits. Nothing is retried and failures are
/// never reported back to the enqueuing code.
///
/// The handle is cheap to clone; clones share the same queue and pool.
///
/// # Example
///
/// ```no_run
/// use hookpool::dispatch::{CallOptions, Dispatcher, DispatcherConfig};
/// use hookpool::transport::ReqwestClient;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dispatcher = Dispatcher::new(ReqwestClient::new(), DispatcherConfig::default())?;
///
/// let url = Url::parse("https://hooks.example.com/deploy")?;
/// dispatcher.post(url, CallOptions::new().with_json(&serde_json::json!({"ok": true}))?);
///
/// // Before shutdown, wait for everything still queued.
/// dispatcher.flush().await?;
/// # Ok(())
/// # }
/// ```
pub struct Dispatcher<H> {
    shared: Arc<Shared<H>>,
}

/// State shared by every dispatcher handle and every worker task.
struct Shared<H> {
    client: H,
    queue: CallQueue,
    slots: Mutex<Vec<Worker>>,
    live: Arc<LiveTasks>,
    next_worker_id: AtomicU64,
    total_sent: AtomicU64,
    total_failed: AtomicU64,
    total_dropped: AtomicU64,
    failure_policy: FailurePolicy,
    error_for_status: bool,
    runtime: Handle,
}

impl<H: HttpClient + 'static> Dispatcher<H> {
    /// Creates a dispatcher whose workers run on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoRuntime`] when called outside a runtime.
    /// Use [`Dispatcher::with_runtime`] to supply a handle explicitly.
    pub fn new(client: H, config: DispatcherConfig) -> Result<Self, DispatchError> {
        let runtime = Handle::try_current().map_err(DispatchError::NoRuntime)?;
        Ok(Self::with_runtime(client, config, runtime))
    }

    /// Creates a dispatcher whose workers run on the given runtime.
    #[must_use]
    pub fn with_runtime(client: H, config: DispatcherConfig, runtime: Handle) -> Self {
        let num_workers = config.num_workers.max(DispatcherConfig::MIN_NUM_WORKERS);

        let queue = match config.capacity {
            Some(capacity) => CallQueue::bounded(config.queue_order, capacity, config.overflow),
            None => CallQueue::new(config.queue_order),
        };

        let slots: Vec<Worker> = (0..num_workers)
            .map(|slot| Worker::new(slot as u64, slot))
            .collect();

        Self {
            shared: Arc::new(Shared {
                client,
                queue,
                slots: Mutex::new(slots),
                live: Arc::new(LiveTasks::default()),
                next_worker_id: AtomicU64::new(num_workers as u64),
                total_sent: AtomicU64::new(0),
                total_failed: AtomicU64::new(0),
                total_dropped: AtomicU64::new(0),
                failure_policy: config.failure_policy,
                error_for_status: config.error_for_status,
                runtime,
            }),
        }
    }

    /// Queues a call and makes sure workers are draining the queue.
    ///
    /// Never waits on network I/O. It may block briefly on the pool lock.
    pub fn enqueue(&self, verb: Verb, url: url::Url, options: CallOptions) {
        let call = PendingCall::new(verb, url, options);

        match self.shared.queue.push(call) {
            PushOutcome::Queued => {
                tracing::debug!("Queued {verb} call");
            }
            PushOutcome::Rejected(call) => {
                self.shared.total_dropped.fetch_add(1, Ordering::SeqCst);
                tracing::warn!("Queue full, dropping {} {}", call.verb(), call.url());
            }
            PushOutcome::Evicted(call) => {
                self.shared.total_dropped.fetch_add(1, Ordering::SeqCst);
                tracing::warn!(
                    "Queue full, evicted oldest call {} {}",
                    call.verb(),
                    call.url()
                );
            }
        }

        self.shared.refresh_pool();
    }

    /// Queues a `GET` call.
    pub fn get(&self, url: url::Url, options: CallOptions) {
        self.enqueue(Verb::Get, url, options);
    }

    /// Queues a `POST` call.
    pub fn post(&self, url: url::Url, options: CallOptions) {
        self.enqueue(Verb::Post, url, options);
    }

    /// Queues a `PUT` call.
    pub fn put(&self, url: url::Url, options: CallOptions) {
        self.enqueue(Verb::Put, url, options);
    }

    /// Queues a `DELETE` call.
    pub fn delete(&self, url: url::Url, options: CallOptions) {
        self.enqueue(Verb::Delete, url, options);
    }

    /// Replaces every non-running worker with a freshly started one.
    ///
    /// Does nothing when the queue is empty. Returns the number of workers
    /// started.
    pub fn refresh_pool(&self) -> usize {
        self.shared.refresh_pool()
    }

    /// Drains the queue on the calling task.
    ///
    /// Pops and issues calls until the queue is observed empty. Safe to run
    /// alongside the pool's workers; each call is still issued once.
    ///
    /// # Errors
    ///
    /// With [`FailurePolicy::StopWorker`], returns the first failure and
    /// leaves the remaining calls queued. With [`FailurePolicy::Continue`],
    /// never fails.
    pub async fn sync_flush(&self) -> Result<(), DispatchError> {
        self.shared.sync_flush().await
    }

    /// Waits until every started worker has finished.
    ///
    /// Workers started while waiting (by the pool's own handoff) are waited
    /// for too. Calls enqueued concurrently from elsewhere may start more.
    /// Several handles may wait at the same time.
    pub async fn join_workers(&self) {
        self.shared.live.wait_drained().await;
    }

    /// Waits for running workers, then drains whatever is still queued.
    ///
    /// Call this before shutdown; dropping the dispatcher abandons queued
    /// calls.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::sync_flush`].
    pub async fn flush(&self) -> Result<(), DispatchError> {
        self.join_workers().await;
        self.sync_flush().await
    }
}

impl<H> Dispatcher<H> {
    /// Number of calls issued successfully.
    #[must_use]
    pub fn total_sent(&self) -> u64 {
        self.shared.total_sent.load(Ordering::SeqCst)
    }

    /// Number of calls that failed when issued.
    #[must_use]
    pub fn total_failed(&self) -> u64 {
        self.shared.total_failed.load(Ordering::SeqCst)
    }

    /// Number of calls dropped because the queue was full.
    #[must_use]
    pub fn total_dropped(&self) -> u64 {
        self.shared.total_dropped.load(Ordering::SeqCst)
    }

    /// Number of calls waiting in the queue.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.shared.queue.len()
    }

    /// Number of worker slots.
    #[must_use]
    pub fn num_workers(&self) -> usize {
        self.shared.lock_slots().len()
    }

    /// Lifecycle state of the worker in each slot, by slot index.
    #[must_use]
    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.shared.lock_slots().iter().map(Worker::state).collect()
    }

    /// Number of workers currently draining the queue.
    #[must_use]
    pub fn running_workers(&self) -> usize {
        self.shared
            .lock_slots()
            .iter()
            .filter(|worker| worker.is_running())
            .count()
    }
}

impl<H> Clone for Dispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<H> fmt::Debug for Dispatcher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("num_workers", &self.num_workers())
            .field("queue_len", &self.queue_len())
            .field("total_sent", &self.total_sent())
            .field("total_failed", &self.total_failed())
            .field("total_dropped", &self.total_dropped())
            .finish_non_exhaustive()
    }
}

impl<H> Shared<H> {
    // Slot bookkeeping never panics while the lock is held.
    fn lock_slots(&self) -> MutexGuard<'_, Vec<Worker>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: HttpClient + 'static> Shared<H> {
    fn refresh_pool(self: &Arc<Self>) -> usize {
        let mut slots = self.lock_slots();

        if self.queue.is_empty() {
            return 0;
        }

        let mut started = 0;
        for slot in slots.iter_mut().filter(|worker| !worker.is_running()) {
            let id = self.next_worker_id.fetch_add(1, Ordering::SeqCst);
            let mut worker = Worker::new(id, slot.slot());

            if let Some(guard) = worker.begin() {
                let live = self.live.enter();
                self.runtime.spawn(Arc::clone(self).run_worker(guard, live));
                tracing::debug!("Started worker {} in slot {}", worker.id(), worker.slot());
                started += 1;
            }

            *slot = worker;
        }

        started
    }

    // `live` outlives the handoff, so waiters never see a gap between this
    // worker and the one it starts.
    async fn run_worker(self: Arc<Self>, guard: FinishGuard, live: LiveTask) {
        let worker_id = guard.worker_id();
        tracing::debug!("Worker {worker_id} started");

        let result = self.sync_flush().await;
        drop(guard);

        match result {
            Ok(()) => {
                tracing::debug!("Worker {worker_id} finished");
                // A call enqueued between our last pop and the state change
                // saw this worker as running and started nobody.
                if !self.queue.is_empty() {
                    self.refresh_pool();
                }
            }
            Err(e) => {
                tracing::debug!("Worker {worker_id} stopped: {e}");
            }
        }

        drop(live);
    }

    async fn sync_flush(&self) -> Result<(), DispatchError> {
        while let Some(call) = self.queue.pop() {
            let verb = call.verb();
            let url = call.url().clone();

            match self.issue(call).await {
                Ok(()) => {
                    self.total_sent.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => {
                    self.total_failed.fetch_add(1, Ordering::SeqCst);
                    tracing::warn!("{verb} {url} failed: {e}");
                    if self.failure_policy == FailurePolicy::StopWorker {
                        return Err(e);
                    }
                }
            }
        }

        Ok(())
    }

    async fn issue(&self, call: PendingCall) -> Result<(), DispatchError> {
        let response = self.client.request(call.into_request()).await?;

        if self.error_for_status && !response.is_success() {
            return Err(DispatchError::Status {
                status: response.status,
                body: response.body_text().map(ToString::to_string),
            });
        }

        Ok(())
    }
}
