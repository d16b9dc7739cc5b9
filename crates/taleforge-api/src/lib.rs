//! Taleforge — HTTP API.
//!
//! Exposes task submission and polling, the generation endpoints and
//! artifact lookup over the background task queue.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::tasks::router())
        .merge(routes::worlds::router())
        .merge(routes::plots::router())
        .merge(routes::artifacts::router());

    // TODO: Replace CorsLayer::permissive() with configured origins once a
    // frontend is deployed separately.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
