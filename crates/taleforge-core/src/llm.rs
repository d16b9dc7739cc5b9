//! Language-model invocation abstraction.
//!
//! Generation handlers only see this trait: a prompt goes in, text or a
//! failure comes out. The HTTP implementation lives in `taleforge-llm`.

use async_trait::async_trait;
use thiserror::Error;

/// A single prompt sent to the language model.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmPrompt {
    /// Optional system instruction.
    pub system: Option<String>,
    /// The user message.
    pub user: String,
    /// Sampling temperature override.
    pub temperature: Option<f32>,
    /// Completion length override.
    pub max_tokens: Option<u32>,
}

impl LlmPrompt {
    /// Creates a prompt with only a user message.
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the system instruction.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Overrides the completion length.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Failures raised by a language-model client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The client is missing required settings.
    #[error("llm configuration error: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response.
    #[error("llm transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("llm provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the provider.
        body: String,
    },

    /// The provider answered without any generated text.
    #[error("llm provider returned an empty response")]
    EmptyResponse,

    /// The provider's response could not be decoded.
    #[error("llm response could not be decoded: {0}")]
    MalformedResponse(String),
}

/// A capability that turns a prompt into generated text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates text for `prompt`.
    async fn generate(&self, prompt: &LlmPrompt) -> Result<String, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_builder_sets_overrides() {
        let prompt = LlmPrompt::new("describe a city")
            .with_system("you are a worldbuilder")
            .with_temperature(0.2)
            .with_max_tokens(256);

        assert_eq!(prompt.user, "describe a city");
        assert_eq!(prompt.system.as_deref(), Some("you are a worldbuilder"));
        assert_eq!(prompt.temperature, Some(0.2));
        assert_eq!(prompt.max_tokens, Some(256));
    }

    #[test]
    fn test_status_error_message_includes_body() {
        let err = LlmError::Status {
            status: 429,
            body: "rate limited".into(),
        };

        assert_eq!(
            err.to_string(),
            "llm provider returned status 429: rate limited"
        );
    }
}
