//! Taleforge — generation handlers.
//!
//! Task handlers that prompt the language model for worlds, characters and
//! detailed plots, persist the results as artifacts, and report progress
//! back to the task queue.

pub mod application;
pub mod domain;

use std::sync::Arc;

use taleforge_core::clock::Clock;
use taleforge_core::llm::LlmClient;
use taleforge_core::repository::ArtifactRepository;
use taleforge_task_queue::TaskQueue;

use crate::application::handlers::{
    GenerateCharactersHandler, GenerateDetailedPlotHandler, GenerateWorldHandler,
};

/// Task type for world generation.
pub const GENERATE_WORLD: &str = "generate_world";

/// Task type for character generation.
pub const GENERATE_CHARACTERS: &str = "generate_characters";

/// Task type for detailed plot generation.
pub const GENERATE_DETAILED_PLOT: &str = "generate_detailed_plot";

/// Collaborators shared by every generation handler.
#[derive(Clone)]
pub struct GenerationDeps {
    /// Language-model client.
    pub llm: Arc<dyn LlmClient>,
    /// Artifact persistence.
    pub repository: Arc<dyn ArtifactRepository>,
    /// Timestamp source for artifacts.
    pub clock: Arc<dyn Clock>,
}

/// Registers all generation handlers on `queue`.
pub fn register_generation_handlers(queue: &TaskQueue, deps: &GenerationDeps) {
    queue.register_handler(GENERATE_WORLD, GenerateWorldHandler::new(deps.clone()));
    queue.register_handler(
        GENERATE_CHARACTERS,
        GenerateCharactersHandler::new(deps.clone()),
    );
    queue.register_handler(
        GENERATE_DETAILED_PLOT,
        GenerateDetailedPlotHandler::new(deps.clone()),
    );
}
