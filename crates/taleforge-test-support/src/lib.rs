//! Shared test doubles and utilities for the Taleforge backend.

mod clock;
mod llm;
mod repository;

pub use clock::FixedClock;
pub use llm::{FailingLlmClient, ScriptedLlmClient};
pub use repository::{FailingArtifactRepository, InMemoryArtifactRepository};
