//! The single background worker that drains the queue.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::queue::Shared;
use crate::domain::handler::{ProgressReporter, ProgressSink, TaskContext, TaskHandler};
use crate::domain::task::TaskRecord;

enum Wake {
    Task,
    Stop,
    Tick,
}

/// Dequeues tasks one at a time and records their outcome.
pub(crate) struct Worker {
    shared: Arc<Shared>,
    shutdown: watch::Receiver<bool>,
}

impl Worker {
    pub(crate) fn new(shared: Arc<Shared>, shutdown: watch::Receiver<bool>) -> Self {
        Self { shared, shutdown }
    }

    /// Runs until the stop signal is set or its sender is dropped. A task
    /// already dequeued always runs to completion first.
    pub(crate) async fn run(mut self) {
        info!(
            poll_interval = ?self.shared.config.poll_interval,
            "task worker started"
        );

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            if let Some(record) = self.shared.pending.pop() {
                self.process(record).await;
                continue;
            }

            let wake = tokio::select! {
                () = self.shared.pending.wait() => Wake::Task,
                // The flag only ever flips to true, and a dropped sender means
                // the controller is gone.
                _ = self.shutdown.changed() => Wake::Stop,
                () = tokio::time::sleep(self.shared.config.poll_interval) => Wake::Tick,
            };

            match wake {
                Wake::Task => {}
                Wake::Stop => break,
                Wake::Tick => self.apply_retention(),
            }
        }

        info!("task worker stopped");
    }

    async fn process(&self, record: TaskRecord) {
        let TaskRecord {
            task_id,
            task_type,
            payload,
            ..
        } = record;

        let started_at = self.shared.clock.now();
        if let Err(err) = self
            .shared
            .states
            .update(task_id, |state| state.start(started_at))
        {
            error!(%task_id, error = %err, "could not start task");
            return;
        }
        info!(%task_id, %task_type, "processing task");

        let outcome = match self.shared.registry.resolve(&task_type) {
            Some(handler) => self.execute(handler, task_id, &task_type, payload).await,
            None => Err(format!("no handler registered for task type '{task_type}'")),
        };

        self.finish(task_id, outcome);
    }

    /// Runs the handler in its own tokio task so each invocation gets a fresh
    /// execution context and a panic stays contained to this task.
    async fn execute(
        &self,
        handler: Arc<dyn TaskHandler>,
        task_id: Uuid,
        task_type: &str,
        payload: Value,
    ) -> Result<Value, String> {
        let sink: Arc<dyn ProgressSink> = self.shared.states.clone();
        let progress = ProgressReporter::new(task_id, sink);
        let context = TaskContext::new(task_id, task_type, progress);

        let execution = tokio::spawn(async move { handler.handle(context, payload).await });

        match execution.await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(err.to_string()),
            Err(err) => Err(describe_join_error(err)),
        }
    }

    fn finish(&self, task_id: Uuid, outcome: Result<Value, String>) {
        let completed_at = self.shared.clock.now();
        let recorded = match outcome {
            Ok(result) => {
                info!(%task_id, "task completed");
                self.shared
                    .states
                    .update(task_id, |state| state.complete(result, completed_at))
            }
            Err(message) => {
                warn!(%task_id, error = %message, "task failed");
                self.shared
                    .states
                    .update(task_id, |state| state.fail(message, completed_at))
            }
        };

        if let Err(err) = recorded {
            error!(%task_id, error = %err, "could not record task outcome");
        }
    }

    fn apply_retention(&self) {
        let Some(window) = self.shared.config.retention else {
            return;
        };
        let cutoff = self.shared.clock.cutoff(window);
        let evicted = self.shared.states.evict_finished_before(cutoff);
        if evicted > 0 {
            debug!(evicted, %cutoff, "evicted finished task states");
        }
    }
}

fn describe_join_error(err: JoinError) -> String {
    if !err.is_panic() {
        return "handler was cancelled".to_owned();
    }
    let panic = err.into_panic();
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned());
    format!("handler panicked: {message}")
}
