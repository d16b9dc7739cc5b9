//! Artifact repository abstraction.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// The kind of generated content an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// A generated world view.
    World,
    /// A character belonging to a world.
    Character,
    /// A chapter-level detailed plot.
    DetailedPlot,
}

impl ArtifactKind {
    /// Returns the storage name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Character => "character",
            Self::DetailedPlot => "detailed_plot",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "world" => Ok(Self::World),
            "character" => Ok(Self::Character),
            "detailed_plot" => Ok(Self::DetailedPlot),
            other => Err(DomainError::Infrastructure(format!(
                "unknown artifact kind: {other}"
            ))),
        }
    }
}

/// Stored representation of a generated artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArtifact {
    /// Unique artifact identifier.
    pub artifact_id: Uuid,
    /// What the artifact contains.
    pub kind: ArtifactKind,
    /// Human-readable title.
    pub title: String,
    /// Generated content.
    pub body: serde_json::Value,
    /// Task that produced the artifact, if any.
    pub source_task_id: Option<Uuid>,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
}

/// Repository trait for persisting generated artifacts.
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Persist a new artifact.
    async fn save(&self, artifact: &StoredArtifact) -> Result<(), DomainError>;

    /// Load an artifact by id, returning `None` if it does not exist.
    async fn load(&self, artifact_id: Uuid) -> Result<Option<StoredArtifact>, DomainError>;

    /// Load all artifacts of a kind, oldest first.
    async fn list_by_kind(&self, kind: ArtifactKind) -> Result<Vec<StoredArtifact>, DomainError>;
}
