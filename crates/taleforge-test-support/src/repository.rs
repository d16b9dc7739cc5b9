//! Test repositories — in-memory `ArtifactRepository` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use taleforge_core::error::DomainError;
use taleforge_core::repository::{ArtifactKind, ArtifactRepository, StoredArtifact};
use uuid::Uuid;

/// An artifact repository backed by a `Vec`, preserving insertion order.
#[derive(Debug, Default)]
pub struct InMemoryArtifactRepository {
    artifacts: Mutex<Vec<StoredArtifact>>,
}

impl InMemoryArtifactRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with `artifacts`.
    #[must_use]
    pub fn with_artifacts(artifacts: Vec<StoredArtifact>) -> Self {
        Self {
            artifacts: Mutex::new(artifacts),
        }
    }

    /// Returns a snapshot of every stored artifact.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn artifacts(&self) -> Vec<StoredArtifact> {
        self.artifacts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactRepository for InMemoryArtifactRepository {
    async fn save(&self, artifact: &StoredArtifact) -> Result<(), DomainError> {
        let mut artifacts = self.artifacts.lock().unwrap();
        if artifacts
            .iter()
            .any(|existing| existing.artifact_id == artifact.artifact_id)
        {
            return Err(DomainError::Infrastructure(format!(
                "duplicate artifact id: {}",
                artifact.artifact_id
            )));
        }
        artifacts.push(artifact.clone());
        Ok(())
    }

    async fn load(&self, artifact_id: Uuid) -> Result<Option<StoredArtifact>, DomainError> {
        Ok(self
            .artifacts
            .lock()
            .unwrap()
            .iter()
            .find(|artifact| artifact.artifact_id == artifact_id)
            .cloned())
    }

    async fn list_by_kind(&self, kind: ArtifactKind) -> Result<Vec<StoredArtifact>, DomainError> {
        Ok(self
            .artifacts
            .lock()
            .unwrap()
            .iter()
            .filter(|artifact| artifact.kind == kind)
            .cloned()
            .collect())
    }
}

/// An artifact repository that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingArtifactRepository;

#[async_trait]
impl ArtifactRepository for FailingArtifactRepository {
    async fn save(&self, _artifact: &StoredArtifact) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn load(&self, _artifact_id: Uuid) -> Result<Option<StoredArtifact>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_by_kind(&self, _kind: ArtifactKind) -> Result<Vec<StoredArtifact>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
