//! HTTP-level tests for both provider backends against a local mock server.

use mockito::Matcher;
use notetag::provider::{
    CompletionClient, GenerationRequest, ProviderClient, ProviderClientBuilder, ProviderConfig,
};
use notetag::{ProviderError, ProviderKind, Settings};
use serde_json::json;

fn settings() -> Settings {
    Settings {
        openai_api_key: "sk-test".to_string(),
        claude_api_key: "sk-ant-test".to_string(),
        min_tags: 2,
        max_tags: 4,
        custom_prompt: "Tag it.".to_string(),
        ..Settings::default()
    }
}

fn client_for(server: &mockito::ServerGuard) -> ProviderClient {
    ProviderClientBuilder::new()
        .openai_base_url(server.url())
        .claude_base_url(server.url())
        .build()
        .expect("Failed to create client")
}

fn call(client: &ProviderClient, kind: ProviderKind, body: &str) -> Result<String, ProviderError> {
    let config = ProviderConfig::for_provider(&settings(), kind);
    let request = GenerationRequest::new(body, &config);
    client.complete(&config, &request)
}

const INSTRUCTION: &str = "Tag it. Generate between 2 and 4 tags. Return only the tags as a comma-separated list, no other text.";
const CLAUDE_INSTRUCTION: &str = "Tag it. Generate between 2 and 4 tags for this content. Return only the tags as a comma-separated list, no other text.";

#[test]
fn openai_request_shape_and_reply() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "system", "content": INSTRUCTION},
                {"role": "user", "content": "Notes about Rust lifetimes"}
            ],
            "max_tokens": 100,
            "temperature": 0.3
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  rust, lifetimes \n"}}]}"#)
        .create();

    let reply = call(&client_for(&server), ProviderKind::OpenAi, "Notes about Rust lifetimes");

    mock.assert();
    assert_eq!(reply.unwrap(), "rust, lifetimes");
}

#[test]
fn claude_request_shape_and_reply() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-ant-test")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-3-haiku-20240307",
            "max_tokens": 100,
            "messages": [
                {"role": "user", "content": format!("{CLAUDE_INSTRUCTION}\n\nContent: Garden plans")}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":[{"type":"text","text":"gardening, plans"}]}"#)
        .create();

    let reply = call(&client_for(&server), ProviderKind::Claude, "Garden plans");

    mock.assert();
    assert_eq!(reply.unwrap(), "gardening, plans");
}

#[test]
fn body_is_truncated_before_sending() {
    let mut server = mockito::Server::new();
    let long_body = "a".repeat(5000);
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {"role": "system", "content": INSTRUCTION},
                {"role": "user", "content": "a".repeat(4000)}
            ]
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"a"}}]}"#)
        .create();

    call(&client_for(&server), ProviderKind::OpenAi, &long_body).unwrap();
    mock.assert();
}

#[test]
fn non_success_status_maps_to_http_error() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(401)
        .with_body(r#"{"error":{"type":"authentication_error"}}"#)
        .create();

    let err = call(&client_for(&server), ProviderKind::Claude, "x").unwrap_err();

    mock.assert();
    assert!(matches!(
        err,
        ProviderError::Http {
            provider: ProviderKind::Claude,
            status: 401
        }
    ));
    assert_eq!(err.to_string(), "Claude API error: status 401");
}

#[test]
fn non_json_body_maps_to_malformed_response() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create();

    let err = call(&client_for(&server), ProviderKind::OpenAi, "x").unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse { .. }));
    assert!(err.to_string().contains("OpenAI"));
}

#[test]
fn missing_fields_map_to_api_error() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(r#"{"content":[]}"#)
        .create();

    let err = call(&client_for(&server), ProviderKind::Claude, "x").unwrap_err();
    assert!(matches!(err, ProviderError::Api { .. }));
}

#[test]
fn missing_key_sends_no_request() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create();

    let client = client_for(&server);
    for kind in [ProviderKind::OpenAi, ProviderKind::Claude] {
        let config = ProviderConfig::for_provider(&Settings::default(), kind);
        let request = GenerationRequest::new("body", &config);
        let err = client.complete(&config, &request).unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(err.to_string(), format!("{kind} API key not configured"));
    }

    mock.assert();
}

#[test]
fn connection_refused_maps_to_network_error() {
    let client = ProviderClientBuilder::new()
        .openai_base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let err = call(&client, ProviderKind::OpenAi, "x").unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Network {
            provider: ProviderKind::OpenAi,
            ..
        }
    ));
    assert!(err.to_string().starts_with("OpenAI network error"));
}
