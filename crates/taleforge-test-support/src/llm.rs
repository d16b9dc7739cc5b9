//! Test language-model clients.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use taleforge_core::llm::{LlmClient, LlmError, LlmPrompt};

/// An LLM client that replies with queued responses in order and records
/// every prompt it receives.
///
/// Once the script runs out, further calls fail with
/// `LlmError::EmptyResponse`.
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<LlmPrompt>>,
}

impl ScriptedLlmClient {
    /// Creates a client that answers with `replies`, one per call.
    #[must_use]
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of the prompts received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn prompts(&self) -> Vec<LlmPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn generate(&self, prompt: &LlmPrompt) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyResponse)
    }
}

/// An LLM client that always fails with a transport error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingLlmClient;

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn generate(&self, _prompt: &LlmPrompt) -> Result<String, LlmError> {
        Err(LlmError::Transport("connection refused".into()))
    }
}
