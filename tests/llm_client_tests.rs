//! Completion client tests against a mocked chat-completion endpoint

use indigoctl::IndigoError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::completion_client;

#[tokio::test]
async fn complete_sends_fixed_sampling_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "temperature": 0.9,
            "max_tokens": 1643,
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Hi there"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = completion_client(&server).complete("Hello").await.unwrap();
    assert_eq!(reply, "Hi there");
}

#[tokio::test]
async fn complete_returns_the_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"content": "first"}},
                {"message": {"content": "second"}}
            ]
        })))
        .mount(&server)
        .await;

    let reply = completion_client(&server).complete("pick one").await.unwrap();
    assert_eq!(reply, "first");
}

#[tokio::test]
async fn complete_sends_the_bearer_token_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = indigoctl::llm::CompletionClient::new(indigoctl::config::LlmConfig {
        endpoint: server.uri(),
        model: "gpt-3.5-turbo".to_string(),
        api_key: Some("sk-test".to_string()),
        timeout: std::time::Duration::from_secs(5),
    })
    .unwrap();
    client.complete("hello").await.unwrap();
}

#[tokio::test]
async fn api_failures_become_completion_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model exploded"))
        .mount(&server)
        .await;

    let err = completion_client(&server).complete("Hello").await.unwrap_err();
    assert!(matches!(err, IndigoError::Completion(_)));
    assert!(err.to_string().contains("model exploded"));
}

#[tokio::test]
async fn empty_choices_become_completion_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = completion_client(&server).complete("Hello").await.unwrap_err();
    assert!(matches!(err, IndigoError::Completion(_)));
}
