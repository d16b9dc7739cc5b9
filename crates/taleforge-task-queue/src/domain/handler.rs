//! Handler abstraction: the unit of work registered against a task type.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use taleforge_core::error::DomainError;
use taleforge_core::llm::LlmError;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Failure returned by a handler. Its display text becomes the task's
/// `error` field.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The payload does not match what the handler expects.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A domain or persistence failure.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The language model could not be reached or answered badly.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model answered, but not in a usable shape.
    #[error("invalid model output: {0}")]
    InvalidModelOutput(String),

    /// Any other failure.
    #[error("{0}")]
    Failed(String),
}

/// Deserializes a task payload into the handler's request type.
///
/// # Errors
///
/// Returns `HandlerError::InvalidPayload` if the payload does not match `T`.
pub fn parse_payload<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, HandlerError> {
    serde_json::from_value(payload).map_err(|e| HandlerError::InvalidPayload(e.to_string()))
}

/// Destination for progress reports, e.g. the queue's state store.
pub trait ProgressSink: Send + Sync {
    /// Records `percent` as the progress of `task_id`.
    fn record(&self, task_id: Uuid, percent: u8);
}

/// Lets a running handler publish intermediate progress for its task.
#[derive(Clone)]
pub struct ProgressReporter {
    task_id: Uuid,
    sink: Option<Arc<dyn ProgressSink>>,
}

impl ProgressReporter {
    /// A reporter that forwards every report to `sink`.
    #[must_use]
    pub fn new(task_id: Uuid, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            task_id,
            sink: Some(sink),
        }
    }

    /// A reporter that discards every report. For invoking handlers outside
    /// a queue.
    #[must_use]
    pub fn detached(task_id: Uuid) -> Self {
        Self {
            task_id,
            sink: None,
        }
    }

    /// Records `percent` (clamped to 100) as the task's progress.
    pub fn report(&self, percent: u8) {
        debug!(task_id = %self.task_id, percent, "task progress");
        if let Some(sink) = &self.sink {
            sink.record(self.task_id, percent);
        }
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("task_id", &self.task_id)
            .field("attached", &self.sink.is_some())
            .finish()
    }
}

/// Per-invocation context handed to a handler.
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// The task being executed.
    pub task_id: Uuid,
    /// The task's type tag.
    pub task_type: String,
    /// Progress sink for this task.
    pub progress: ProgressReporter,
}

impl TaskContext {
    /// Creates a context bound to `progress`.
    #[must_use]
    pub fn new(task_id: Uuid, task_type: impl Into<String>, progress: ProgressReporter) -> Self {
        Self {
            task_id,
            task_type: task_type.into(),
            progress,
        }
    }

    /// Creates a context whose progress reports go nowhere.
    #[must_use]
    pub fn detached(task_type: impl Into<String>) -> Self {
        let task_id = Uuid::new_v4();
        Self::new(task_id, task_type, ProgressReporter::detached(task_id))
    }
}

/// An executable unit of work for one task type.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Executes the task and returns its result.
    async fn handle(
        &self,
        context: TaskContext,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, HandlerError>;
}

/// Adapter turning an async closure into a `TaskHandler`.
pub struct FnHandler<F>(F);

/// Wraps `f` as a handler.
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(TaskContext, serde_json::Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, HandlerError>> + Send,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> TaskHandler for FnHandler<F>
where
    F: Fn(TaskContext, serde_json::Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, HandlerError>> + Send,
{
    async fn handle(
        &self,
        context: TaskContext,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, HandlerError> {
        (self.0)(context, payload).await
    }
}
