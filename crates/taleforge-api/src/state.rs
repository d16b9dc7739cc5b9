//! Shared application state.

use std::sync::Arc;

use taleforge_core::repository::ArtifactRepository;
use taleforge_task_queue::TaskQueue;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The background task queue.
    pub task_queue: Arc<TaskQueue>,
    /// Persisted generation output.
    pub artifact_repository: Arc<dyn ArtifactRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(task_queue: Arc<TaskQueue>, artifact_repository: Arc<dyn ArtifactRepository>) -> Self {
        Self {
            task_queue,
            artifact_repository,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("task_queue", &self.task_queue)
            .finish_non_exhaustive()
    }
}
