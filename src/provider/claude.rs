use serde::{Deserialize, Serialize};

use super::client::{ProviderError, read_success_body};
use super::request::{GenerationRequest, MAX_RESPONSE_TOKENS};
use crate::models::ProviderKind;

const PROVIDER: ProviderKind = ProviderKind::Claude;
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [UserMessage; 1],
}

#[derive(Serialize)]
struct UserMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Folds the instruction and the note content into the single user turn.
fn user_content(request: &GenerationRequest) -> String {
    format!(
        "{}\n\nContent: {}",
        request.instruction(),
        request.content()
    )
}

/// Sends one messages request with a single user turn.
pub(super) fn complete(
    http: &reqwest::blocking::Client,
    base_url: &str,
    api_key: &str,
    model: &str,
    request: &GenerationRequest,
) -> Result<String, ProviderError> {
    let body = MessagesRequest {
        model,
        max_tokens: MAX_RESPONSE_TOKENS,
        messages: [UserMessage {
            role: "user",
            content: user_content(request),
        }],
    };

    let response = http
        .post(format!("{base_url}{MESSAGES_PATH}"))
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&body)
        .send()
        .map_err(|e| ProviderError::transport(PROVIDER, e))?;

    let text = read_success_body(PROVIDER, response)?;
    extract_reply(&text)
}

/// Pulls `content[0].text` out of a response body.
fn extract_reply(text: &str) -> Result<String, ProviderError> {
    let parsed: MessagesResponse =
        serde_json::from_str(text).map_err(|source| ProviderError::MalformedResponse {
            provider: PROVIDER,
            source,
        })?;

    parsed
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or_else(|| ProviderError::Api {
            provider: PROVIDER,
            message: "response contained no text content".to_string(),
        })
}
