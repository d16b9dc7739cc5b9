//! HTTP client for OpenAI-compatible chat completions endpoints.

use async_trait::async_trait;
use reqwest::Client;
use taleforge_core::llm::{LlmClient, LlmError, LlmPrompt};
use tracing::{debug, instrument, warn};

use crate::settings::LlmSettings;
use crate::wire::{ChatCompletionRequest, ChatCompletionResponse};

/// Calls `{base_url}/chat/completions` with a bearer key. One request per
/// prompt; there is no retry.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    settings: LlmSettings,
    url: String,
}

impl OpenAiCompatibleClient {
    /// Creates a client from `settings`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if the API key or base URL is
    /// blank, or the HTTP client cannot be built.
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        if settings.api_key.trim().is_empty() {
            return Err(LlmError::Configuration("api key must not be empty".into()));
        }
        if settings.base_url.trim().is_empty() {
            return Err(LlmError::Configuration("base url must not be empty".into()));
        }
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("http client: {e}")))?;
        let url = settings.completions_url();
        Ok(Self {
            client,
            settings,
            url,
        })
    }

    /// The settings this client was built with.
    #[must_use]
    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    #[instrument(skip(self, prompt), fields(model = %self.settings.model))]
    async fn generate(&self, prompt: &LlmPrompt) -> Result<String, LlmError> {
        let request = ChatCompletionRequest::from_prompt(&self.settings, prompt);
        debug!(
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Transport(format!("request timed out: {e}"))
                } else {
                    LlmError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(format!("reading response body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "chat completion request rejected");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
        let content = parsed.into_content().ok_or(LlmError::EmptyResponse)?;
        debug!(chars = content.chars().count(), "chat completion received");
        Ok(content)
    }
}
