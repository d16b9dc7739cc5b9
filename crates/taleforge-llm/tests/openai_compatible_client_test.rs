//! Client behavior against a mocked chat completions endpoint.

use mockito::{Matcher, Server};
use serde_json::json;
use taleforge_core::llm::{LlmClient, LlmError, LlmPrompt};
use taleforge_llm::{LlmSettings, OpenAiCompatibleClient};

fn client_for(server: &Server) -> OpenAiCompatibleClient {
    let mut settings = LlmSettings::new("test-key");
    settings.base_url = server.url();
    settings.model = "story-model".into();
    OpenAiCompatibleClient::new(settings).unwrap()
}

#[tokio::test]
async fn test_generate_returns_first_choice_content() {
    // Arrange
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "story-model",
            "messages": [{"role": "user", "content": "describe a city"}],
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{"message": {"role": "assistant", "content": "A city of bells."}}]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let client = client_for(&server);

    // Act
    let reply = client.generate(&LlmPrompt::new("describe a city")).await;

    // Assert
    mock.assert_async().await;
    assert_eq!(reply.unwrap(), "A city of bells.");
}

#[tokio::test]
async fn test_generate_maps_error_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;
    let client = client_for(&server);

    let err = client
        .generate(&LlmPrompt::new("describe a city"))
        .await
        .unwrap_err();

    match err {
        LlmError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "slow down");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_without_choices_is_empty_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": []}).to_string())
        .create_async()
        .await;
    let client = client_for(&server);

    let err = client
        .generate(&LlmPrompt::new("describe a city"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn test_generate_rejects_non_json_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;
    let client = client_for(&server);

    let err = client
        .generate(&LlmPrompt::new("describe a city"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_generate_reports_unreachable_provider_as_transport_error() {
    let mut settings = LlmSettings::new("test-key");
    settings.base_url = "http://127.0.0.1:9".into();
    let client = OpenAiCompatibleClient::new(settings).unwrap();

    let err = client
        .generate(&LlmPrompt::new("describe a city"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Transport(_)));
}
