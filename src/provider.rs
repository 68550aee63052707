//! Chat-completion providers used to generate tags.
//!
//! Two backends are supported, selected by [`ProviderKind`](crate::ProviderKind):
//! an OpenAI-style chat completions endpoint and a Claude-style messages
//! endpoint. Each backend has exactly one request translation and one
//! response extraction; [`ProviderClient`] dispatches between them.
//!
//! Calls are blocking, made once, and bounded by the configured timeout.
mod claude;
mod client;
mod openai;
mod request;

pub use client::{CompletionClient, ProviderClient, ProviderClientBuilder, ProviderError};
pub use request::{
    CLAUDE_MODEL, GenerationRequest, MAX_CONTENT_CHARS, MAX_RESPONSE_TOKENS, OPENAI_MODEL,
    ProviderConfig, build_instruction,
};
