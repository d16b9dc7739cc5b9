//! Queue error types.

use thiserror::Error;
use uuid::Uuid;

use super::task::TaskStatus;

/// Errors raised by the queue's own bookkeeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// No state is recorded for the task.
    #[error("task not found: {0}")]
    TaskNotFound(Uuid),

    /// The requested lifecycle transition is not allowed.
    #[error("illegal transition for task {task_id}: {from} -> {to}")]
    IllegalTransition {
        /// The task whose state was being updated.
        task_id: Uuid,
        /// The current status.
        from: TaskStatus,
        /// The requested status.
        to: TaskStatus,
    },
}
