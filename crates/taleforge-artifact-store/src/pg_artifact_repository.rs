//! `PostgreSQL` implementation of the `ArtifactRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use taleforge_core::error::DomainError;
use taleforge_core::repository::{ArtifactKind, ArtifactRepository, StoredArtifact};

fn infrastructure(context: &str, err: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {err}"))
}

fn to_artifact(row: &PgRow) -> Result<StoredArtifact, DomainError> {
    let decode = |e: sqlx::Error| infrastructure("artifact row decoding failed", &e);
    let kind: String = row.try_get("kind").map_err(decode)?;
    Ok(StoredArtifact {
        artifact_id: row.try_get("artifact_id").map_err(decode)?,
        kind: kind.parse()?,
        title: row.try_get("title").map_err(decode)?,
        body: row.try_get("body").map_err(decode)?,
        source_task_id: row.try_get("source_task_id").map_err(decode)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(decode)?,
    })
}

/// PostgreSQL-backed artifact repository.
#[derive(Debug, Clone)]
pub struct PgArtifactRepository {
    pool: PgPool,
}

impl PgArtifactRepository {
    /// Creates a new `PgArtifactRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtifactRepository for PgArtifactRepository {
    async fn save(&self, artifact: &StoredArtifact) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO generated_artifacts \
             (artifact_id, kind, title, body, source_task_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(artifact.artifact_id)
        .bind(artifact.kind.as_str())
        .bind(&artifact.title)
        .bind(&artifact.body)
        .bind(artifact.source_task_id)
        .bind(artifact.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| infrastructure("artifact insert failed", &e))?;

        debug!(artifact_id = %artifact.artifact_id, kind = %artifact.kind, "artifact saved");
        Ok(())
    }

    async fn load(&self, artifact_id: Uuid) -> Result<Option<StoredArtifact>, DomainError> {
        let row = sqlx::query(
            "SELECT artifact_id, kind, title, body, source_task_id, created_at \
             FROM generated_artifacts WHERE artifact_id = $1",
        )
        .bind(artifact_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| infrastructure("artifact query failed", &e))?;

        row.as_ref().map(to_artifact).transpose()
    }

    async fn list_by_kind(&self, kind: ArtifactKind) -> Result<Vec<StoredArtifact>, DomainError> {
        let rows = sqlx::query(
            "SELECT artifact_id, kind, title, body, source_task_id, created_at \
             FROM generated_artifacts WHERE kind = $1 ORDER BY created_at, artifact_id",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infrastructure("artifact query failed", &e))?;

        rows.iter().map(to_artifact).collect()
    }
}
