use super::*;
use crate::config::OpenAiConfig;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(api_base: &str) -> OpenAiConfig {
    OpenAiConfig {
        api_base: api_base.to_string(),
        api_key_env: "URSA_TEST_MISSING_KEY".to_string(),
        chat_model: "test-chat".to_string(),
        ..OpenAiConfig::default()
    }
}

#[test]
fn client_configuration() {
    let config = test_config("https://api.example.com/v1");
    let client = CompletionClient::new(&config).expect("should create client");

    assert_eq!(client.model, "test-chat");
    assert_eq!(client.retry_attempts, DEFAULT_RETRY_ATTEMPTS);
    assert!(client.api_key.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn complete_returns_first_choice_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "test-chat"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Hello from the model"}}
            ]
        })))
        .mount(&server)
        .await;

    let config = test_config(&format!("{}/v1", server.uri()));
    let client = CompletionClient::new(&config).expect("should create client");

    let reply = tokio::task::spawn_blocking(move || {
        client.complete(&[
            ChatMessage::system("You are a test assistant"),
            ChatMessage::user("hello"),
        ])
    })
    .await
    .expect("task should not panic")
    .expect("should complete");

    assert_eq!(reply, "Hello from the model");
}

#[tokio::test(flavor = "multi_thread")]
async fn complete_sends_message_roles_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "persona"},
                {"role": "user", "content": "first"},
                {"role": "assistant", "content": "reply"},
                {"role": "user", "content": "second"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&format!("{}/v1", server.uri()));
    let client = CompletionClient::new(&config).expect("should create client");

    let reply = tokio::task::spawn_blocking(move || {
        client.complete(&[
            ChatMessage::system("persona"),
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ])
    })
    .await
    .expect("task should not panic")
    .expect("should complete");

    assert_eq!(reply, "ok");
}

#[tokio::test(flavor = "multi_thread")]
async fn complete_fails_on_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let config = test_config(&format!("{}/v1", server.uri()));
    let client = CompletionClient::new(&config).expect("should create client");

    let result = tokio::task::spawn_blocking(move || client.complete(&[ChatMessage::user("hi")]))
        .await
        .expect("task should not panic");
    assert!(matches!(result, Err(UrsaError::Completion(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn complete_does_not_retry_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&format!("{}/v1", server.uri()));
    let client = CompletionClient::new(&config)
        .expect("should create client")
        .with_retry_attempts(3);

    let result = tokio::task::spawn_blocking(move || client.complete(&[ChatMessage::user("hi")]))
        .await
        .expect("task should not panic");
    assert!(matches!(result, Err(UrsaError::Completion(_))));
}
