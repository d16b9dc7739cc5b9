//! Routes for submitting and polling background tasks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use taleforge_task_queue::{QueueError, QueueStatistics, TaskState};
use tracing::{info, instrument};
use uuid::Uuid;

use super::TaskAccepted;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /tasks.
#[derive(Debug, Deserialize)]
pub struct SubmitTaskRequest {
    /// Handler to run.
    pub task_type: String,
    /// Opaque input handed to the handler.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Response body for GET /tasks/statistics.
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    /// Buffer depth and per-status counts.
    #[serde(flatten)]
    pub statistics: QueueStatistics,
    /// Whether the worker is running.
    pub running: bool,
    /// Registered task types.
    pub handlers: Vec<String>,
}

/// POST /tasks
///
/// Accepts any task type; an unregistered one fails when the worker
/// dequeues it.
#[instrument(skip(state, request), fields(task_type = %request.task_type))]
async fn submit_task(
    State(state): State<AppState>,
    Json(request): Json<SubmitTaskRequest>,
) -> Result<(StatusCode, Json<TaskAccepted>), ApiError> {
    let task_id = state.task_queue.submit(request.task_type, request.payload);
    info!(%task_id, "task submitted");

    Ok((StatusCode::ACCEPTED, Json(TaskAccepted::queued(task_id))))
}

/// GET /tasks/{task_id}
async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskState>, ApiError> {
    state
        .task_queue
        .get_state(task_id)
        .map(Json)
        .ok_or_else(|| QueueError::TaskNotFound(task_id).into())
}

/// GET /tasks/statistics
async fn get_statistics(State(state): State<AppState>) -> Json<StatisticsResponse> {
    Json(StatisticsResponse {
        statistics: state.task_queue.statistics(),
        running: state.task_queue.is_running(),
        handlers: state.task_queue.registered_types(),
    })
}

/// Returns the router for task submission and polling.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(submit_task))
        .route("/tasks/statistics", get(get_statistics))
        .route("/tasks/{task_id}", get(get_task))
}
