//! Task records and their lifecycle state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::QueueError;

/// Progress published when the worker picks a task up.
pub const DISPATCH_PROGRESS: u8 = 10;

/// Progress of a completed task.
pub const COMPLETE_PROGRESS: u8 = 100;

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting in the FIFO buffer.
    Queued,
    /// Being executed by the worker.
    Processing,
    /// The handler returned a result.
    Completed,
    /// No handler was found, or the handler failed.
    Failed,
}

impl TaskStatus {
    /// Returns `true` for `Completed` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns the wire name of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted unit of work. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    /// Globally unique task identifier.
    pub task_id: Uuid,
    /// Tag selecting the handler.
    pub task_type: String,
    /// Handler-specific input.
    pub payload: serde_json::Value,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Creates a record with a fresh identifier.
    #[must_use]
    pub fn new(
        task_type: impl Into<String>,
        payload: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            task_type: task_type.into(),
            payload,
            created_at,
        }
    }
}

/// Point-in-time view of a task's lifecycle.
///
/// Transitions go through the methods below, which reject anything other
/// than `queued → processing → completed | failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskState {
    /// The task this state belongs to.
    pub task_id: Uuid,
    /// Tag selecting the handler.
    pub task_type: String,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Advisory completion percentage.
    pub progress: u8,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Set when the worker picks the task up.
    pub started_at: Option<DateTime<Utc>>,
    /// Set when the task reaches a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
    /// Handler output; only present when completed.
    pub result: Option<serde_json::Value>,
    /// Failure description; only present when failed.
    pub error: Option<String>,
}

impl TaskState {
    /// Initial state for a freshly submitted record.
    #[must_use]
    pub fn queued(record: &TaskRecord) -> Self {
        Self {
            task_id: record.task_id,
            task_type: record.task_type.clone(),
            status: TaskStatus::Queued,
            progress: 0,
            created_at: record.created_at,
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
        }
    }

    /// `queued → processing`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::IllegalTransition` unless the task is queued.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), QueueError> {
        self.ensure_status(TaskStatus::Queued, TaskStatus::Processing)?;
        self.status = TaskStatus::Processing;
        self.progress = DISPATCH_PROGRESS;
        self.started_at = Some(now);
        Ok(())
    }

    /// `processing → completed`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::IllegalTransition` unless the task is processing.
    pub fn complete(
        &mut self,
        result: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<(), QueueError> {
        self.ensure_status(TaskStatus::Processing, TaskStatus::Completed)?;
        self.status = TaskStatus::Completed;
        self.progress = COMPLETE_PROGRESS;
        self.completed_at = Some(now);
        self.result = Some(result);
        Ok(())
    }

    /// `processing → failed`. Progress keeps its last reported value.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::IllegalTransition` unless the task is processing.
    pub fn fail(&mut self, error: impl Into<String>, now: DateTime<Utc>) -> Result<(), QueueError> {
        self.ensure_status(TaskStatus::Processing, TaskStatus::Failed)?;
        self.status = TaskStatus::Failed;
        self.completed_at = Some(now);
        self.error = Some(error.into());
        Ok(())
    }

    /// Records handler-reported progress, clamped to 100. Ignored outside
    /// `processing` so a late report cannot touch a terminal record.
    pub fn report_progress(&mut self, percent: u8) {
        if self.status == TaskStatus::Processing {
            self.progress = percent.min(COMPLETE_PROGRESS);
        }
    }

    fn ensure_status(&self, expected: TaskStatus, to: TaskStatus) -> Result<(), QueueError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(QueueError::IllegalTransition {
                task_id: self.task_id,
                from: self.status,
                to,
            })
        }
    }
}

/// Aggregate counts over the queue and its state history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStatistics {
    /// Records waiting in the FIFO buffer.
    pub queue_size: usize,
    /// Tasks in `queued`.
    pub queued: usize,
    /// Tasks in `processing`.
    pub processing: usize,
    /// Tasks in `completed`.
    pub completed: usize,
    /// Tasks in `failed`.
    pub failed: usize,
    /// All tasks held in the state store.
    pub total: usize,
}

impl QueueStatistics {
    /// Counts one more task in `status`.
    pub(crate) fn count(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Queued => self.queued += 1,
            TaskStatus::Processing => self.processing += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Failed => self.failed += 1,
        }
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, minute, 0).unwrap()
    }

    fn queued_state() -> TaskState {
        let record = TaskRecord::new("echo", json!("hi"), at(0));
        TaskState::queued(&record)
    }

    #[test]
    fn test_queued_state_starts_at_zero_progress() {
        let state = queued_state();

        assert_eq!(state.status, TaskStatus::Queued);
        assert_eq!(state.progress, 0);
        assert_eq!(state.created_at, at(0));
        assert!(state.started_at.is_none());
        assert!(state.completed_at.is_none());
        assert!(state.result.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_start_moves_to_processing_at_ten_percent() {
        let mut state = queued_state();

        state.start(at(1)).unwrap();

        assert_eq!(state.status, TaskStatus::Processing);
        assert_eq!(state.progress, DISPATCH_PROGRESS);
        assert_eq!(state.started_at, Some(at(1)));
    }

    #[test]
    fn test_complete_sets_result_and_full_progress() {
        let mut state = queued_state();
        state.start(at(1)).unwrap();

        state.complete(json!({"ok": true}), at(2)).unwrap();

        assert_eq!(state.status, TaskStatus::Completed);
        assert_eq!(state.progress, 100);
        assert_eq!(state.completed_at, Some(at(2)));
        assert_eq!(state.result, Some(json!({"ok": true})));
        assert!(state.error.is_none());
    }

    #[test]
    fn test_fail_sets_error_and_keeps_progress() {
        let mut state = queued_state();
        state.start(at(1)).unwrap();
        state.report_progress(40);

        state.fail("model unavailable", at(2)).unwrap();

        assert_eq!(state.status, TaskStatus::Failed);
        assert_eq!(state.progress, 40);
        assert_eq!(state.completed_at, Some(at(2)));
        assert_eq!(state.error.as_deref(), Some("model unavailable"));
        assert!(state.result.is_none());
    }

    #[test]
    fn test_complete_from_queued_is_rejected() {
        let mut state = queued_state();

        let err = state.complete(json!(null), at(1)).unwrap_err();

        assert_eq!(
            err,
            QueueError::IllegalTransition {
                task_id: state.task_id,
                from: TaskStatus::Queued,
                to: TaskStatus::Completed,
            }
        );
        assert_eq!(state.status, TaskStatus::Queued);
    }

    #[test]
    fn test_terminal_states_cannot_be_restarted_or_refailed() {
        let mut state = queued_state();
        state.start(at(1)).unwrap();
        state.complete(json!(1), at(2)).unwrap();

        assert!(state.start(at(3)).is_err());
        assert!(state.fail("late", at(3)).is_err());
        assert_eq!(state.status, TaskStatus::Completed);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_report_progress_clamps_and_ignores_terminal_states() {
        let mut state = queued_state();
        state.report_progress(50);
        assert_eq!(state.progress, 0);

        state.start(at(1)).unwrap();
        state.report_progress(250);
        assert_eq!(state.progress, 100);

        state.fail("boom", at(2)).unwrap();
        state.report_progress(5);
        assert_eq!(state.progress, 100);
    }

    #[test]
    fn test_status_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_value(TaskStatus::Processing).unwrap(),
            json!("processing")
        );
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::Queued.is_terminal());
    }

    #[test]
    fn test_statistics_count_tallies_total() {
        let mut stats = QueueStatistics::default();
        stats.count(TaskStatus::Queued);
        stats.count(TaskStatus::Failed);
        stats.count(TaskStatus::Failed);

        assert_eq!(stats.queued, 1);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.total, 3);
    }
}
