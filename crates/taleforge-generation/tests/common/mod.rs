//! Shared helpers for generation integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use taleforge_generation::{GenerationDeps, register_generation_handlers};
use taleforge_task_queue::{QueueConfig, TaskQueue, TaskState};
use taleforge_test_support::{FixedClock, InMemoryArtifactRepository, ScriptedLlmClient};
use uuid::Uuid;

/// A started queue with every generation handler registered.
pub struct Harness {
    pub queue: TaskQueue,
    pub llm: Arc<ScriptedLlmClient>,
    pub repository: Arc<InMemoryArtifactRepository>,
}

/// Builds and starts a queue whose model answers with `replies` in order.
pub fn start_harness<I, S>(replies: I) -> Harness
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let llm = Arc::new(ScriptedLlmClient::new(replies));
    let repository = Arc::new(InMemoryArtifactRepository::new());
    let clock = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let queue = TaskQueue::with_clock(
        QueueConfig::default().with_poll_interval(Duration::from_millis(10)),
        clock.clone(),
    );
    register_generation_handlers(
        &queue,
        &GenerationDeps {
            llm: llm.clone(),
            repository: repository.clone(),
            clock,
        },
    );
    queue.start();
    Harness {
        queue,
        llm,
        repository,
    }
}

/// Polls until the task is completed or failed, panicking after five seconds.
pub async fn wait_for_terminal(queue: &TaskQueue, task_id: Uuid) -> TaskState {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(state) = queue.get_state(task_id) {
                if state.status.is_terminal() {
                    return state;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("task did not reach a terminal state in time")
}
