//! Chat completions request and response bodies.

use serde::{Deserialize, Serialize};
use taleforge_core::llm::LlmPrompt;

use crate::settings::LlmSettings;

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Merges `prompt` with the settings' defaults.
    pub fn from_prompt(settings: &'a LlmSettings, prompt: &'a LlmPrompt) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &prompt.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });
        Self {
            model: &settings.model,
            messages,
            temperature: prompt.temperature.unwrap_or(settings.temperature),
            max_tokens: prompt.max_tokens.unwrap_or(settings.max_tokens),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// The first choice's text, if it has any.
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_settings_defaults_and_prompt_overrides() {
        let settings = LlmSettings::new("key");
        let prompt = LlmPrompt::new("describe a city")
            .with_system("you are a worldbuilder")
            .with_max_tokens(256);

        let body = serde_json::to_value(ChatCompletionRequest::from_prompt(&settings, &prompt))
            .unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "you are a worldbuilder"},
                    {"role": "user", "content": "describe a city"}
                ],
                "temperature": settings.temperature,
                "max_tokens": 256
            })
        );
    }

    #[test]
    fn test_response_without_content_yields_none() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();

        assert!(response.into_content().is_none());
    }
}
