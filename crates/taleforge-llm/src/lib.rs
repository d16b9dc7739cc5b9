//! Taleforge — language-model client.
//!
//! An `LlmClient` implementation for providers that speak the OpenAI chat
//! completions protocol.

mod client;
mod settings;
mod wire;

pub use client::OpenAiCompatibleClient;
pub use settings::LlmSettings;
