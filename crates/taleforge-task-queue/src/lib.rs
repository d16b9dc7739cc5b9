//! Taleforge — background task queue.
//!
//! A single-process, in-memory FIFO queue with exactly one worker. Callers
//! register handlers by task type, submit jobs, and poll their lifecycle
//! state (`queued → processing → completed | failed`) by task id.

pub mod application;
pub mod config;
pub mod domain;

pub use application::queue::TaskQueue;
pub use config::QueueConfig;
pub use domain::error::QueueError;
pub use domain::handler::{
    FnHandler, HandlerError, ProgressReporter, ProgressSink, TaskContext, TaskHandler,
    handler_fn, parse_payload,
};
pub use domain::task::{QueueStatistics, TaskRecord, TaskState, TaskStatus};
