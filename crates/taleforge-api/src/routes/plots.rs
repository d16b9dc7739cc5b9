//! Routes for detailed plot generation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use taleforge_generation::GENERATE_DETAILED_PLOT;
use taleforge_generation::domain::requests::DetailedPlotRequest;
use tracing::{info, instrument};

use super::TaskAccepted;
use super::worlds::{ensure_world_exists, to_payload};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /plots/detailed/generate
#[instrument(skip(state, request), fields(world_id = %request.world_id))]
async fn generate_detailed_plot(
    State(state): State<AppState>,
    Json(request): Json<DetailedPlotRequest>,
) -> Result<(StatusCode, Json<TaskAccepted>), ApiError> {
    request.validate()?;
    ensure_world_exists(&state, request.world_id).await?;

    let task_id = state
        .task_queue
        .submit(GENERATE_DETAILED_PLOT, to_payload(&request)?);
    info!(%task_id, title = %request.title, "detailed plot generation queued");

    Ok((StatusCode::ACCEPTED, Json(TaskAccepted::queued(task_id))))
}

/// Returns the router for plot generation.
pub fn router() -> Router<AppState> {
    Router::new().route("/plots/detailed/generate", post(generate_detailed_plot))
}
