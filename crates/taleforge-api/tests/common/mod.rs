//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use http_body_util::BodyExt;
use taleforge_core::clock::Clock;
use taleforge_generation::{GenerationDeps, register_generation_handlers};
use taleforge_task_queue::{QueueConfig, TaskQueue};
use taleforge_test_support::{FixedClock, InMemoryArtifactRepository, ScriptedLlmClient};
use tower::ServiceExt;

use taleforge_api::build_router;
use taleforge_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// The running app plus the collaborators tests inspect.
pub struct TestApp {
    pub router: Router,
    pub queue: Arc<TaskQueue>,
    pub llm: Arc<ScriptedLlmClient>,
    pub repository: Arc<InMemoryArtifactRepository>,
}

/// Build the full app router over a started queue whose model answers with
/// `replies` in order. Uses the same wiring as `main.rs`.
pub fn build_test_app<I, S>(replies: I) -> TestApp
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let clock = fixed_clock();
    let llm = Arc::new(ScriptedLlmClient::new(replies));
    let repository = Arc::new(InMemoryArtifactRepository::new());
    let queue = Arc::new(TaskQueue::with_clock(
        QueueConfig::default().with_poll_interval(Duration::from_millis(10)),
        Arc::clone(&clock),
    ));
    register_generation_handlers(
        &queue,
        &GenerationDeps {
            llm: llm.clone(),
            repository: repository.clone(),
            clock,
        },
    );
    queue.start();

    let router = build_router(AppState::new(Arc::clone(&queue), repository.clone()));
    TestApp {
        router,
        queue,
        llm,
        repository,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Polls `GET /api/v1/tasks/{task_id}` until the task is completed or
/// failed, panicking after five seconds.
pub async fn poll_until_finished(app: &Router, task_id: &str) -> serde_json::Value {
    let uri = format!("/api/v1/tasks/{task_id}");
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let (status, json) = get_json(app.clone(), &uri).await;
            assert_eq!(status, StatusCode::OK);
            if json["status"] == "completed" || json["status"] == "failed" {
                return json;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("task did not finish in time")
}
