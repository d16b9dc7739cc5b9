//! Routes for world and character generation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use taleforge_core::error::DomainError;
use taleforge_core::repository::ArtifactKind;
use taleforge_generation::domain::requests::{CharacterGenerationRequest, WorldGenerationRequest};
use taleforge_generation::{GENERATE_CHARACTERS, GENERATE_WORLD};
use tracing::{info, instrument};
use uuid::Uuid;

use super::TaskAccepted;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /worlds/{world_id}/characters/generate.
#[derive(Debug, Deserialize)]
pub struct GenerateCharactersBody {
    /// How many characters to create.
    pub count: u8,
    /// Optional direction for the cast.
    #[serde(default)]
    pub focus: Option<String>,
}

/// Serializes a validated request into a task payload.
pub(crate) fn to_payload<T: serde::Serialize>(request: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(request)
        .map_err(|e| DomainError::Infrastructure(format!("payload serialization failed: {e}")).into())
}

/// Fails with `ArtifactNotFound` unless `world_id` names a stored world.
pub(crate) async fn ensure_world_exists(state: &AppState, world_id: Uuid) -> Result<(), ApiError> {
    match state.artifact_repository.load(world_id).await? {
        Some(artifact) if artifact.kind == ArtifactKind::World => Ok(()),
        _ => Err(DomainError::ArtifactNotFound(world_id).into()),
    }
}

/// POST /worlds/generate
#[instrument(skip(state, request))]
async fn generate_world(
    State(state): State<AppState>,
    Json(request): Json<WorldGenerationRequest>,
) -> Result<(StatusCode, Json<TaskAccepted>), ApiError> {
    request.validate()?;

    let task_id = state
        .task_queue
        .submit(GENERATE_WORLD, to_payload(&request)?);
    info!(%task_id, "world generation queued");

    Ok((StatusCode::ACCEPTED, Json(TaskAccepted::queued(task_id))))
}

/// POST /worlds/{world_id}/characters/generate
#[instrument(skip(state, body), fields(world_id = %world_id))]
async fn generate_characters(
    State(state): State<AppState>,
    Path(world_id): Path<Uuid>,
    Json(body): Json<GenerateCharactersBody>,
) -> Result<(StatusCode, Json<TaskAccepted>), ApiError> {
    let request = CharacterGenerationRequest {
        world_id,
        count: body.count,
        focus: body.focus,
    };
    request.validate()?;
    ensure_world_exists(&state, world_id).await?;

    let task_id = state
        .task_queue
        .submit(GENERATE_CHARACTERS, to_payload(&request)?);
    info!(%task_id, count = request.count, "character generation queued");

    Ok((StatusCode::ACCEPTED, Json(TaskAccepted::queued(task_id))))
}

/// Returns the router for world generation.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/worlds/generate", post(generate_world))
        .route(
            "/worlds/{world_id}/characters/generate",
            post(generate_characters),
        )
}
