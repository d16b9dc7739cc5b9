//! Route modules, one per resource.

pub mod artifacts;
pub mod health;
pub mod plots;
pub mod tasks;
pub mod worlds;

use serde::Serialize;
use uuid::Uuid;

/// Response body returned when a task has been queued.
#[derive(Debug, Serialize)]
pub struct TaskAccepted {
    /// Id to poll at `GET /api/v1/tasks/{task_id}`.
    pub task_id: Uuid,
    /// Always `"queued"`.
    pub status: &'static str,
}

impl TaskAccepted {
    pub(crate) fn queued(task_id: Uuid) -> Self {
        Self {
            task_id,
            status: "queued",
        }
    }
}
