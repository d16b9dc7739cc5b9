//! Taleforge API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use taleforge_api::config::AppConfig;
use taleforge_api::error::AppError;
use taleforge_api::state::AppState;
use taleforge_api::{build_router, telemetry};
use taleforge_artifact_store::PgArtifactRepository;
use taleforge_core::clock::SystemClock;
use taleforge_core::repository::ArtifactRepository;
use taleforge_generation::{GenerationDeps, register_generation_handlers};
use taleforge_llm::OpenAiCompatibleClient;
use taleforge_task_queue::TaskQueue;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let tracer_provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    info!("Starting Taleforge API server");

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    let artifact_repository: Arc<dyn ArtifactRepository> =
        Arc::new(PgArtifactRepository::new(pool));
    let llm = OpenAiCompatibleClient::new(config.llm.clone())
        .map_err(|e| AppError::Config(e.to_string()))?;
    info!(model = %config.llm.model, base_url = %config.llm.base_url, "llm client ready");

    // Handlers go in before the worker starts.
    let task_queue = Arc::new(TaskQueue::new(config.queue.clone()));
    register_generation_handlers(
        &task_queue,
        &GenerationDeps {
            llm: Arc::new(llm),
            repository: Arc::clone(&artifact_repository),
            clock: Arc::new(SystemClock),
        },
    );
    task_queue.start();

    let app = build_router(AppState::new(Arc::clone(&task_queue), artifact_repository));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, waiting for the task worker");
    task_queue.stop().await;

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            error!(error = %e, "failed to flush spans");
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}
