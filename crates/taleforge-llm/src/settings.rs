//! Connection and sampling settings for the chat completions client.

use std::time::Duration;

/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default completion length.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
/// Generation requests can take minutes for long chapters.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Settings for [`crate::OpenAiCompatibleClient`].
#[derive(Clone, PartialEq)]
pub struct LlmSettings {
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Temperature used when a prompt does not override it.
    pub temperature: f32,
    /// Completion length used when a prompt does not override it.
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl LlmSettings {
    /// Creates settings for `api_key` with every other field defaulted.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Returns the full chat completions URL.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// The API key stays out of logs.
impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}
