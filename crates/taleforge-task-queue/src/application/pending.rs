//! FIFO buffer of submitted records awaiting the worker.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::Notify;

use crate::domain::task::TaskRecord;

/// Ordered buffer plus a wake-up signal for the worker.
#[derive(Debug, Default)]
pub(crate) struct PendingTasks {
    records: Mutex<VecDeque<TaskRecord>>,
    available: Notify,
}

impl PendingTasks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a record and wakes the worker. If the worker is not waiting
    /// yet, the wake-up is stored for its next wait.
    pub(crate) fn push(&self, record: TaskRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(record);
        self.available.notify_one();
    }

    /// Removes the oldest record.
    pub(crate) fn pop(&self) -> Option<TaskRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resolves once a record has been pushed since the last wake-up.
    pub(crate) async fn wait(&self) {
        self.available.notified().await;
    }
}
