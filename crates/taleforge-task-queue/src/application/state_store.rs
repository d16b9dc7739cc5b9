//! Task-id → lifecycle state map, shared by pollers and the worker.
//!
//! Every transition runs under a single write guard, so a reader never sees
//! a half-applied update such as `completed` without its `result`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::error::QueueError;
use crate::domain::handler::ProgressSink;
use crate::domain::task::{QueueStatistics, TaskState};

/// Concurrent store of task states.
#[derive(Debug, Default)]
pub struct StateStore {
    states: RwLock<HashMap<Uuid, TaskState>>,
}

impl StateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the initial state for a task.
    pub fn insert(&self, state: TaskState) {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(state.task_id, state);
    }

    /// Returns a snapshot of the task's state.
    #[must_use]
    pub fn get(&self, task_id: Uuid) -> Option<TaskState> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&task_id)
            .cloned()
    }

    /// Applies `transition` to the task's state atomically.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::TaskNotFound` if the task has no state, or the
    /// transition's own error.
    pub fn update<F>(&self, task_id: Uuid, transition: F) -> Result<(), QueueError>
    where
        F: FnOnce(&mut TaskState) -> Result<(), QueueError>,
    {
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
        let state = states
            .get_mut(&task_id)
            .ok_or(QueueError::TaskNotFound(task_id))?;
        transition(state)
    }

    /// Records handler-reported progress. Unknown ids are ignored.
    pub fn report_progress(&self, task_id: Uuid, percent: u8) {
        if let Some(state) = self
            .states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&task_id)
        {
            state.report_progress(percent);
        }
    }

    /// Counts tasks per status. `queue_size` is left at zero for the caller
    /// to fill in.
    #[must_use]
    pub fn tally(&self) -> QueueStatistics {
        let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
        let mut stats = QueueStatistics::default();
        for state in states.values() {
            stats.count(state.status);
        }
        stats
    }

    /// Removes terminal states that completed before `cutoff`, returning how
    /// many were removed.
    pub fn evict_finished_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
        let before = states.len();
        states.retain(|_, state| {
            !(state.status.is_terminal() && state.completed_at.is_some_and(|at| at < cutoff))
        });
        before - states.len()
    }
}

impl ProgressSink for StateStore {
    fn record(&self, task_id: Uuid, percent: u8) {
        self.report_progress(task_id, percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    use std::sync::Arc;

    use crate::domain::handler::ProgressReporter;
    use crate::domain::task::{TaskRecord, TaskStatus};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, minute, 0).unwrap()
    }

    fn insert_queued(store: &StateStore) -> Uuid {
        let record = TaskRecord::new("echo", json!(null), at(0));
        let task_id = record.task_id;
        store.insert(TaskState::queued(&record));
        task_id
    }

    #[test]
    fn test_get_unknown_task_returns_none() {
        let store = StateStore::new();

        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_update_applies_transition() {
        let store = StateStore::new();
        let task_id = insert_queued(&store);

        store.update(task_id, |state| state.start(at(1))).unwrap();

        assert_eq!(store.get(task_id).unwrap().status, TaskStatus::Processing);
    }

    #[test]
    fn test_update_unknown_task_is_not_found() {
        let store = StateStore::new();
        let task_id = Uuid::new_v4();

        let err = store.update(task_id, |state| state.start(at(1))).unwrap_err();

        assert_eq!(err, QueueError::TaskNotFound(task_id));
    }

    #[test]
    fn test_progress_reporter_writes_through_to_store() {
        // Arrange
        let store = Arc::new(StateStore::new());
        let task_id = insert_queued(&store);
        store.update(task_id, |state| state.start(at(1))).unwrap();
        let sink: Arc<dyn ProgressSink> = store.clone();
        let reporter = ProgressReporter::new(task_id, sink);

        // Act
        reporter.report(40);
        reporter.report(250);

        // Assert
        assert_eq!(store.get(task_id).unwrap().progress, 100);
    }

    #[test]
    fn test_tally_counts_each_status() {
        let store = StateStore::new();
        let processing = insert_queued(&store);
        let failed = insert_queued(&store);
        insert_queued(&store);
        store.update(processing, |s| s.start(at(1))).unwrap();
        store.update(failed, |s| s.start(at(1))).unwrap();
        store.update(failed, |s| s.fail("boom", at(2))).unwrap();

        let stats = store.tally();

        assert_eq!(stats.queued, 1);
        assert_eq!(stats.processing, 1);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.total, 3);
    }

    #[test]
    fn test_evict_removes_only_old_terminal_states() {
        let store = StateStore::new();
        let old = insert_queued(&store);
        let recent = insert_queued(&store);
        let pending = insert_queued(&store);
        store.update(old, |s| s.start(at(1))).unwrap();
        store.update(old, |s| s.complete(json!(1), at(2))).unwrap();
        store.update(recent, |s| s.start(at(1))).unwrap();
        store.update(recent, |s| s.fail("boom", at(9))).unwrap();

        let evicted = store.evict_finished_before(at(5));

        assert_eq!(evicted, 1);
        assert!(store.get(old).is_none());
        assert!(store.get(recent).is_some());
        assert!(store.get(pending).is_some());
    }
}
