use serde::{Deserialize, Serialize};

use super::client::{ProviderError, read_success_body};
use super::request::{GenerationRequest, MAX_RESPONSE_TOKENS};
use crate::models::ProviderKind;

const PROVIDER: ProviderKind = ProviderKind::OpenAi;
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const TEMPERATURE: f64 = 0.3;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Sends one chat completion: the instruction as the system message, the
/// note content as the user message.
pub(super) fn complete(
    http: &reqwest::blocking::Client,
    base_url: &str,
    api_key: &str,
    model: &str,
    request: &GenerationRequest,
) -> Result<String, ProviderError> {
    let body = ChatRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: request.instruction(),
            },
            ChatMessage {
                role: "user",
                content: request.content(),
            },
        ],
        max_tokens: MAX_RESPONSE_TOKENS,
        temperature: TEMPERATURE,
    };

    let response = http
        .post(format!("{base_url}{CHAT_COMPLETIONS_PATH}"))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .map_err(|e| ProviderError::transport(PROVIDER, e))?;

    let text = read_success_body(PROVIDER, response)?;
    extract_reply(&text)
}

/// Pulls `choices[0].message.content` out of a response body.
fn extract_reply(text: &str) -> Result<String, ProviderError> {
    let parsed: ChatResponse =
        serde_json::from_str(text).map_err(|source| ProviderError::MalformedResponse {
            provider: PROVIDER,
            source,
        })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::Api {
            provider: PROVIDER,
            message: "response contained no message content".to_string(),
        })
}
