//! Shared helpers for task queue integration tests.
#![allow(dead_code)]

use std::time::Duration;

use taleforge_task_queue::{QueueConfig, TaskQueue, TaskState};
use uuid::Uuid;

/// A queue whose idle worker re-checks the stop signal every 10ms.
pub fn fast_queue() -> TaskQueue {
    TaskQueue::new(QueueConfig::default().with_poll_interval(Duration::from_millis(10)))
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
