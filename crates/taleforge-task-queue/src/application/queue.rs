//! `TaskQueue` — the public facade over registry, buffer, state store and
//! worker.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use taleforge_core::clock::{Clock, SystemClock};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use super::pending::PendingTasks;
use super::registry::HandlerRegistry;
use super::state_store::StateStore;
use super::worker::Worker;
use crate::config::QueueConfig;
use crate::domain::handler::TaskHandler;
use crate::domain::task::{QueueStatistics, TaskRecord, TaskState};

/// State shared between the controller and its worker.
pub(crate) struct Shared {
    pub(crate) registry: HandlerRegistry,
    pub(crate) pending: PendingTasks,
    pub(crate) states: Arc<StateStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: QueueConfig,
}

/// Controls one spawned worker.
///
/// `exited` never carries a value. Its sender lives inside the worker task and
/// is dropped when that task ends, whether it returns or unwinds, so every
/// clone of the receiver observes the same exit.
struct WorkerHandle {
    shutdown: watch::Sender<bool>,
    exited: watch::Receiver<()>,
}

impl WorkerHandle {
    fn has_exited(&self) -> bool {
        self.exited.has_changed().is_err()
    }

    fn is_stopping(&self) -> bool {
        *self.shutdown.borrow()
    }
}

async fn wait_for_exit(mut exited: watch::Receiver<()>) {
    while exited.changed().await.is_ok() {}
}

/// In-process FIFO task queue with a single background worker.
///
/// Construct one per process and share it as `Arc<TaskQueue>`.
pub struct TaskQueue {
    shared: Arc<Shared>,
    worker: Mutex<Option<WorkerHandle>>,
}

impl TaskQueue {
    /// Creates a stopped queue using the system clock.
    #[must_use]
    pub fn new(config: QueueConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a stopped queue that timestamps tasks with `clock`.
    #[must_use]
    pub fn with_clock(config: QueueConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry: HandlerRegistry::new(),
                pending: PendingTasks::new(),
                states: Arc::new(StateStore::new()),
                clock,
                config,
            }),
            worker: Mutex::new(None),
        }
    }

    /// Registers `handler` for `task_type`. Re-registering a type replaces
    /// the previous handler. Handlers may be registered while the worker
    /// runs; a task dequeued before its handler exists fails.
    pub fn register_handler<H>(&self, task_type: impl Into<String>, handler: H)
    where
        H: TaskHandler + 'static,
    {
        self.shared.registry.register(task_type, Arc::new(handler));
    }

    /// Returns the registered task types, sorted.
    #[must_use]
    pub fn registered_types(&self) -> Vec<String> {
        self.shared.registry.registered_types()
    }

    /// Enqueues a task and returns its id without waiting for it to run.
    ///
    /// The task type is not checked against the registry here.
    pub fn submit(&self, task_type: impl Into<String>, payload: serde_json::Value) -> Uuid {
        let record = TaskRecord::new(task_type, payload, self.shared.clock.now());
        let task_id = record.task_id;
        let task_type = record.task_type.clone();

        self.shared.states.insert(TaskState::queued(&record));
        self.shared.pending.push(record);

        info!(%task_id, %task_type, "task queued");
        task_id
    }

    /// Returns a snapshot of the task's state, or `None` for unknown ids.
    #[must_use]
    pub fn get_state(&self, task_id: Uuid) -> Option<TaskState> {
        self.shared.states.get(task_id)
    }

    /// Returns the buffer depth and per-status counts.
    #[must_use]
    pub fn statistics(&self) -> QueueStatistics {
        let mut stats = self.shared.states.tally();
        stats.queue_size = self.shared.pending.len();
        stats
    }

    /// Spawns the worker on the current tokio runtime. Does nothing if a
    /// worker is already running.
    ///
    /// If the previous worker is still draining after `stop()`, the new one
    /// waits for it to exit before it dequeues anything, so at most one task
    /// is ever processing.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&self) {
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        let predecessor = match worker.as_ref() {
            Some(handle) if handle.has_exited() => None,
            Some(handle) if handle.is_stopping() => Some(handle.exited.clone()),
            Some(_) => return,
            None => None,
        };

        let (shutdown, signal) = watch::channel(false);
        let (exit_guard, exited) = watch::channel(());
        let next = Worker::new(Arc::clone(&self.shared), signal);
        tokio::spawn(async move {
            let _exit_guard = exit_guard;
            if let Some(previous) = predecessor {
                debug!("waiting for the previous task worker to exit");
                wait_for_exit(previous).await;
            }
            next.run().await;
        });
        *worker = Some(WorkerHandle { shutdown, exited });
    }

    /// Signals the worker to stop and waits for it to exit. An in-flight
    /// task finishes first; queued tasks stay queued. Concurrent callers all
    /// wait for the same exit. Does nothing if the worker is not running.
    pub async fn stop(&self) {
        let exited = {
            let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(handle) = worker.as_ref() else {
                return;
            };
            handle.shutdown.send_replace(true);
            handle.exited.clone()
        };
        wait_for_exit(exited).await;
    }

    /// Returns `true` while a worker task is alive, including while it
    /// drains its last task after `stop()`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.has_exited())
    }

    /// Drops terminal task states that completed before `cutoff`, returning
    /// how many were removed.
    pub fn evict_finished_before(&self, cutoff: DateTime<Utc>) -> usize {
        self.shared.states.evict_finished_before(cutoff)
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("config", &self.shared.config)
            .field("statistics", &self.statistics())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
