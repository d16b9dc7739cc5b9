//! Queue domain types: task records, lifecycle state, handlers and errors.

pub mod error;
pub mod handler;
pub mod task;
