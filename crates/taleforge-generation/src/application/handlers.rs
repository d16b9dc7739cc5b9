//! Task handlers for the generation task types.
//!
//! Each handler follows the same shape: parse and validate the payload,
//! build a prompt, call the model, parse the reply, persist artifacts and
//! return a JSON summary for the task's `result`.

use async_trait::async_trait;
use serde_json::{Value, json};
use taleforge_core::error::DomainError;
use taleforge_core::repository::{ArtifactKind, StoredArtifact};
use taleforge_task_queue::{HandlerError, TaskContext, TaskHandler, parse_payload};
use tracing::{info, instrument};
use uuid::Uuid;

use super::parsing::{extract_list, extract_object};
use super::prompts::{character_prompt, detailed_plot_prompt, world_prompt};
use crate::GenerationDeps;
use crate::domain::requests::{
    CharacterGenerationRequest, DetailedPlotRequest, WorldGenerationRequest,
};

/// Progress once the prompt is ready.
pub const PROMPT_BUILT_PROGRESS: u8 = 30;
/// Progress once the model has replied.
pub const MODEL_REPLIED_PROGRESS: u8 = 70;
/// Progress once artifacts are persisted.
pub const PERSISTED_PROGRESS: u8 = 90;

impl GenerationDeps {
    fn artifact(
        &self,
        context: &TaskContext,
        kind: ArtifactKind,
        title: String,
        body: Value,
    ) -> StoredArtifact {
        StoredArtifact {
            artifact_id: Uuid::new_v4(),
            kind,
            title,
            body,
            source_task_id: Some(context.task_id),
            created_at: self.clock.now(),
        }
    }

    /// Loads a world artifact. Artifacts of another kind count as missing.
    async fn load_world(&self, world_id: Uuid) -> Result<StoredArtifact, DomainError> {
        self.repository
            .load(world_id)
            .await?
            .filter(|artifact| artifact.kind == ArtifactKind::World)
            .ok_or(DomainError::ArtifactNotFound(world_id))
    }
}

fn title_from(value: &Value, fallback: impl Into<String>) -> String {
    value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| fallback.into(), str::to_owned)
}

/// Handles `generate_world`.
pub struct GenerateWorldHandler {
    deps: GenerationDeps,
}

impl GenerateWorldHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(deps: GenerationDeps) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl TaskHandler for GenerateWorldHandler {
    #[instrument(skip(self, context, payload), fields(task_id = %context.task_id))]
    async fn handle(&self, context: TaskContext, payload: Value) -> Result<Value, HandlerError> {
        let request: WorldGenerationRequest = parse_payload(payload)?;
        request.validate()?;

        let prompt = world_prompt(&request);
        context.progress.report(PROMPT_BUILT_PROGRESS);

        let reply = self.deps.llm.generate(&prompt).await?;
        let world = extract_object(&reply)?;
        context.progress.report(MODEL_REPLIED_PROGRESS);

        let title = title_from(&world, request.core_concept.clone());
        let artifact = self
            .deps
            .artifact(&context, ArtifactKind::World, title, world.clone());
        self.deps.repository.save(&artifact).await?;
        context.progress.report(PERSISTED_PROGRESS);

        info!(world_id = %artifact.artifact_id, title = %artifact.title, "world generated");
        Ok(json!({ "world_id": artifact.artifact_id, "world": world }))
    }
}

/// Handles `generate_characters`.
pub struct GenerateCharactersHandler {
    deps: GenerationDeps,
}

impl GenerateCharactersHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(deps: GenerationDeps) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl TaskHandler for GenerateCharactersHandler {
    #[instrument(skip(self, context, payload), fields(task_id = %context.task_id))]
    async fn handle(&self, context: TaskContext, payload: Value) -> Result<Value, HandlerError> {
        let request: CharacterGenerationRequest = parse_payload(payload)?;
        request.validate()?;
        let world = self.deps.load_world(request.world_id).await?;

        let prompt = character_prompt(&world, &request);
        context.progress.report(PROMPT_BUILT_PROGRESS);

        let reply = self.deps.llm.generate(&prompt).await?;
        let mut characters = extract_list(&reply, "characters")?;
        characters.retain(Value::is_object);
        characters.truncate(usize::from(request.count));
        if characters.is_empty() {
            return Err(HandlerError::InvalidModelOutput(
                "the model reply contained no character objects".into(),
            ));
        }
        context.progress.report(MODEL_REPLIED_PROGRESS);

        let mut character_ids = Vec::with_capacity(characters.len());
        for (index, character) in characters.iter().enumerate() {
            let title = title_from(character, format!("Character {}", index + 1));
            let artifact =
                self.deps
                    .artifact(&context, ArtifactKind::Character, title, character.clone());
            self.deps.repository.save(&artifact).await?;
            character_ids.push(artifact.artifact_id);
        }
        context.progress.report(PERSISTED_PROGRESS);

        info!(
            world_id = %request.world_id,
            count = character_ids.len(),
            "characters generated"
        );
        Ok(json!({
            "world_id": request.world_id,
            "character_ids": character_ids,
            "characters": characters,
        }))
    }
}

/// Handles `generate_detailed_plot`.
pub struct GenerateDetailedPlotHandler {
    deps: GenerationDeps,
}

impl GenerateDetailedPlotHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(deps: GenerationDeps) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl TaskHandler for GenerateDetailedPlotHandler {
    #[instrument(skip(self, context, payload), fields(task_id = %context.task_id))]
    async fn handle(&self, context: TaskContext, payload: Value) -> Result<Value, HandlerError> {
        let request: DetailedPlotRequest = parse_payload(payload)?;
        request.validate()?;
        let world = self.deps.load_world(request.world_id).await?;

        let prompt = detailed_plot_prompt(&world, &request);
        context.progress.report(PROMPT_BUILT_PROGRESS);

        let reply = self.deps.llm.generate(&prompt).await?;
        let content = reply.trim();
        if content.is_empty() {
            return Err(HandlerError::InvalidModelOutput(
                "the model returned an empty chapter".into(),
            ));
        }
        // Counted in characters so CJK prose measures sensibly.
        let word_count = content.chars().count();
        context.progress.report(MODEL_REPLIED_PROGRESS);

        let artifact = self.deps.artifact(
            &context,
            ArtifactKind::DetailedPlot,
            request.title.clone(),
            json!({
                "world_id": request.world_id,
                "chapter_summary": request.chapter_summary,
                "content": content,
                "word_count": word_count,
            }),
        );
        self.deps.repository.save(&artifact).await?;
        context.progress.report(PERSISTED_PROGRESS);

        info!(detailed_plot_id = %artifact.artifact_id, word_count, "detailed plot generated");
        Ok(json!({
            "detailed_plot_id": artifact.artifact_id,
            "title": request.title,
            "word_count": word_count,
        }))
    }
}
