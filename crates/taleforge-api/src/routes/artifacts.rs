//! Routes for reading generated artifacts.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use taleforge_core::error::DomainError;
use taleforge_core::repository::StoredArtifact;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /artifacts/{artifact_id}
async fn get_artifact(
    State(state): State<AppState>,
    Path(artifact_id): Path<Uuid>,
) -> Result<Json<StoredArtifact>, ApiError> {
    state
        .artifact_repository
        .load(artifact_id)
        .await?
        .map(Json)
        .ok_or_else(|| DomainError::ArtifactNotFound(artifact_id).into())
}

/// Returns the router for artifact lookup.
pub fn router() -> Router<AppState> {
    Router::new().route("/artifacts/{artifact_id}", get(get_artifact))
}
