//! Generation request payloads.
//!
//! The HTTP layer validates these before submitting; handlers validate again
//! because tasks can also be submitted through the generic task endpoint.

use serde::{Deserialize, Serialize};
use taleforge_core::error::DomainError;
use uuid::Uuid;

/// Most characters a single task may request.
pub const MAX_CHARACTERS_PER_TASK: u8 = 10;

fn require(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Payload of a `generate_world` task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldGenerationRequest {
    /// The seed idea the world grows from.
    pub core_concept: String,
    /// Free-form description of the desired world.
    pub description: String,
    /// Extra constraints for the model.
    #[serde(default)]
    pub additional_requirements: Option<String>,
}

impl WorldGenerationRequest {
    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the core concept is blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        require(&self.core_concept, "core concept")
    }
}

/// Payload of a `generate_characters` task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterGenerationRequest {
    /// The world the characters belong to.
    pub world_id: Uuid,
    /// How many characters to create.
    pub count: u8,
    /// Optional direction, e.g. "rival sects" or "a wandering healer".
    #[serde(default)]
    pub focus: Option<String>,
}

impl CharacterGenerationRequest {
    /// Checks the requested count.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless `count` is within
    /// `1..=MAX_CHARACTERS_PER_TASK`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if (1..=MAX_CHARACTERS_PER_TASK).contains(&self.count) {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "count must be between 1 and {MAX_CHARACTERS_PER_TASK}"
            )))
        }
    }
}

/// Payload of a `generate_detailed_plot` task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedPlotRequest {
    /// The world the chapter is set in.
    pub world_id: Uuid,
    /// Chapter title.
    pub title: String,
    /// Outline of what happens in the chapter.
    pub chapter_summary: String,
    /// Extra constraints for the model.
    #[serde(default)]
    pub additional_requirements: Option<String>,
}

impl DetailedPlotRequest {
    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the title or summary is blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        require(&self.title, "title")?;
        require(&self.chapter_summary, "chapter summary")
    }
}
