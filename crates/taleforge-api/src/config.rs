//! Server configuration read from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use taleforge_llm::LlmSettings;
use taleforge_task_queue::QueueConfig;

use crate::error::AppError;

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Pool size.
    pub database_max_connections: u32,
    /// Language-model client settings.
    pub llm: LlmSettings,
    /// Task queue tuning.
    pub queue: QueueConfig,
    /// OTLP collector endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns a variable's
    /// value or `None` if it is unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let mut llm = LlmSettings::new(env.required("LLM_API_KEY")?);
        if let Some(base_url) = env.get("LLM_BASE_URL") {
            llm.base_url = base_url;
        }
        if let Some(model) = env.get("LLM_MODEL") {
            llm.model = model;
        }
        llm.temperature = env.parse_or("LLM_TEMPERATURE", llm.temperature)?;
        llm.max_tokens = env.parse_or("LLM_MAX_TOKENS", llm.max_tokens)?;
        llm.timeout = Duration::from_secs(env.parse_or("LLM_TIMEOUT_SECS", llm.timeout.as_secs())?);

        let mut queue = QueueConfig::default().with_poll_interval(Duration::from_millis(
            env.parse_or("TASK_POLL_INTERVAL_MS", 1000)?,
        ));
        if let Some(secs) = env.parse_opt::<u64>("TASK_RETENTION_SECS")? {
            queue = queue.with_retention(Duration::from_secs(secs));
        }

        Ok(Self {
            host: env.get("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: env.parse_or("PORT", 3000)?,
            database_url: env.required("DATABASE_URL")?,
            database_max_connections: env.parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            llm,
            queue,
            otlp_endpoint: env.get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Unset and blank values both count as missing.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, AppError> {
        self.get(key)
            .ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
    }

    fn parse_opt<T>(&self, key: &str) -> Result<Option<T>, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|e| AppError::Config(format!("{key} is invalid: {e}")))
            })
            .transpose()
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse_opt(key)?.unwrap_or(default))
    }
}
