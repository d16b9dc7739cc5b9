//! End-to-end generation through the task queue.

mod common;

use serde_json::json;
use taleforge_core::repository::ArtifactKind;
use taleforge_generation::{GENERATE_CHARACTERS, GENERATE_DETAILED_PLOT, GENERATE_WORLD};
use taleforge_task_queue::TaskStatus;
use uuid::Uuid;

use common::{start_harness, wait_for_terminal};

#[tokio::test]
async fn test_world_then_characters_then_plot() {
    // Arrange
    let harness = start_harness([
        "{\"name\": \"Saltreach\", \"description\": \"tidal isles\"}",
        "[{\"name\": \"Ilsa\"}]",
        "The tide turned at midnight.",
    ]);

    // Act
    let world_task = harness.queue.submit(
        GENERATE_WORLD,
        json!({"core_concept": "tides that rewrite memory", "description": "isles"}),
    );
    let world_state = wait_for_terminal(&harness.queue, world_task).await;
    let world_id: Uuid =
        serde_json::from_value(world_state.result.clone().unwrap()["world_id"].clone()).unwrap();

    let characters_task = harness.queue.submit(
        GENERATE_CHARACTERS,
        json!({"world_id": world_id, "count": 1, "focus": "a tide-warden"}),
    );
    let characters_state = wait_for_terminal(&harness.queue, characters_task).await;

    let plot_task = harness.queue.submit(
        GENERATE_DETAILED_PLOT,
        json!({
            "world_id": world_id,
            "title": "The Salt Vigil",
            "chapter_summary": "Ilsa keeps watch.",
        }),
    );
    let plot_state = wait_for_terminal(&harness.queue, plot_task).await;
    harness.queue.stop().await;

    // Assert
    assert_eq!(world_state.status, TaskStatus::Completed);
    assert_eq!(world_state.progress, 100);
    assert_eq!(characters_state.status, TaskStatus::Completed);
    assert_eq!(plot_state.status, TaskStatus::Completed);
    assert_eq!(plot_state.result.unwrap()["word_count"], 28);

    let kinds: Vec<ArtifactKind> = harness
        .repository
        .artifacts()
        .iter()
        .map(|artifact| artifact.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ArtifactKind::World,
            ArtifactKind::Character,
            ArtifactKind::DetailedPlot
        ]
    );
    assert!(harness.llm.prompts()[1].user.contains("- Name: Saltreach"));
}

#[tokio::test]
async fn test_characters_for_missing_world_fail_the_task() {
    let harness = start_harness(Vec::<String>::new());
    let world_id = Uuid::new_v4();

    let task_id = harness.queue.submit(
        GENERATE_CHARACTERS,
        json!({"world_id": world_id, "count": 2}),
    );
    let state = wait_for_terminal(&harness.queue, task_id).await;
    harness.queue.stop().await;

    assert_eq!(state.status, TaskStatus::Failed);
    assert_eq!(
        state.error.as_deref(),
        Some(format!("artifact not found: {world_id}").as_str())
    );
    assert!(state.result.is_none());
}

#[tokio::test]
async fn test_unparseable_world_reply_fails_and_queue_keeps_working() {
    // Arrange
    let harness = start_harness([
        "Sorry, I can only describe worlds in prose.",
        "{\"name\": \"Saltreach\"}",
    ]);
    let payload = json!({"core_concept": "tides", "description": "isles"});

    // Act
    let first = harness.queue.submit(GENERATE_WORLD, payload.clone());
    let second = harness.queue.submit(GENERATE_WORLD, payload);
    let first_state = wait_for_terminal(&harness.queue, first).await;
    let second_state = wait_for_terminal(&harness.queue, second).await;
    harness.queue.stop().await;

    // Assert
    assert_eq!(first_state.status, TaskStatus::Failed);
    assert!(
        first_state
            .error
            .unwrap()
            .starts_with("invalid model output:")
    );
    assert_eq!(first_state.progress, 30);
    assert_eq!(second_state.status, TaskStatus::Completed);
    assert_eq!(harness.repository.artifacts().len(), 1);
}

#[tokio::test]
async fn test_invalid_payload_fails_without_calling_model() {
    let harness = start_harness(Vec::<String>::new());

    let task_id = harness
        .queue
        .submit(GENERATE_WORLD, json!({"description": "no concept"}));
    let state = wait_for_terminal(&harness.queue, task_id).await;
    harness.queue.stop().await;

    assert_eq!(state.status, TaskStatus::Failed);
    assert!(state.error.unwrap().starts_with("invalid payload:"));
    assert!(harness.llm.prompts().is_empty());
}
