/// Provider HTTP client implementation.
///
/// This module provides `ProviderClient` for making synchronous chat-completion
/// requests, along with error types and the builder used to configure it.
use std::time::Duration;

use thiserror::Error;

use super::request::{GenerationRequest, ProviderConfig};
use super::{claude, openai};
use crate::models::ProviderKind;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CLAUDE_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when calling a provider.
///
/// Every variant that comes from a call names the provider in its message.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API key is configured for the selected provider.
    #[error("{provider} API key not configured")]
    MissingApiKey { provider: ProviderKind },

    /// The provider answered with a non-success status.
    #[error("{provider} API error: status {status}")]
    Http { provider: ProviderKind, status: u16 },

    /// Connection failures, DNS resolution, and other transport errors.
    #[error("{provider} network error: {source}")]
    Network {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("{provider} request timed out")]
    Timeout {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected JSON.
    #[error("{provider} returned a malformed response: {source}")]
    MalformedResponse {
        provider: ProviderKind,
        #[source]
        source: serde_json::Error,
    },

    /// The response was valid JSON but lacked the generated text.
    #[error("{provider} API error: {message}")]
    Api {
        provider: ProviderKind,
        message: String,
    },

    /// Invalid base URL configuration.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ProviderError {
    /// Returns true for errors caused by configuration rather than the call itself.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::MissingApiKey { .. } | Self::InvalidUrl(_))
    }

    /// Returns true when the provider answered but its reply could not be read.
    pub fn is_response_error(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. } | Self::Api { .. })
    }

    /// Maps a transport error, separating timeouts from other failures.
    pub(crate) fn transport(provider: ProviderKind, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { provider, source }
        } else {
            Self::Network { provider, source }
        }
    }
}

/// Builder for constructing `ProviderClient` instances.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use notetag::provider::ProviderClientBuilder;
///
/// let client = ProviderClientBuilder::new()
///     .openai_base_url("http://localhost:8080")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.openai_base_url(), "http://localhost:8080");
/// ```
#[derive(Debug, Default)]
pub struct ProviderClientBuilder {
    openai_base_url: Option<String>,
    claude_base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ProviderClientBuilder {
    /// Creates a new `ProviderClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for OpenAI requests (e.g. "https://api.openai.com").
    pub fn openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = Some(url.into());
        self
    }

    /// Sets the base URL for Claude requests (e.g. "https://api.anthropic.com").
    pub fn claude_base_url(mut self, url: impl Into<String>) -> Self {
        self.claude_base_url = Some(url.into());
        self
    }

    /// Sets the total per-request timeout. Defaults to 60 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `ProviderClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If a base URL was not set on the builder, `OPENAI_BASE_URL` and
    /// `ANTHROPIC_BASE_URL` are checked before falling back to the public
    /// endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidUrl`] if a base URL does not parse, or
    /// [`ProviderError::ClientBuild`] if the HTTP client cannot be created.
    pub fn build(self) -> Result<ProviderClient, ProviderError> {
        let openai_base_url =
            resolve_base_url(self.openai_base_url, "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)?;
        let claude_base_url = resolve_base_url(
            self.claude_base_url,
            "ANTHROPIC_BASE_URL",
            DEFAULT_CLAUDE_BASE_URL,
        )?;

        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ProviderError::ClientBuild)?;

        Ok(ProviderClient {
            http,
            openai_base_url,
            claude_base_url,
        })
    }
}

fn resolve_base_url(
    explicit: Option<String>,
    env_var: &str,
    default: &str,
) -> Result<String, ProviderError> {
    let url = explicit
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| default.to_string());

    reqwest::Url::parse(&url).map_err(|e| ProviderError::InvalidUrl(format!("{url}: {e}")))?;

    Ok(url.trim_end_matches('/').to_string())
}

/// Trait for chat-completion operations.
///
/// This trait enables mocking in unit tests and keeps the tagging workflow
/// independent of the HTTP transport.
pub trait CompletionClient: Send + Sync {
    /// Sends `request` to the provider selected by `config` and returns the
    /// trimmed reply text.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] naming the provider and the cause.
    fn complete(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
    ) -> Result<String, ProviderError>;
}

/// Synchronous HTTP client for both provider backends.
///
/// It should be constructed using `ProviderClientBuilder`.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::blocking::Client,
    openai_base_url: String,
    claude_base_url: String,
}

impl ProviderClient {
    /// Returns the base URL used for OpenAI requests.
    pub fn openai_base_url(&self) -> &str {
        &self.openai_base_url
    }

    /// Returns the base URL used for Claude requests.
    pub fn claude_base_url(&self) -> &str {
        &self.claude_base_url
    }
}

impl CompletionClient for ProviderClient {
    fn complete(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
    ) -> Result<String, ProviderError> {
        let provider = config.kind();
        let api_key = config
            .api_key()
            .ok_or(ProviderError::MissingApiKey { provider })?;

        tracing::debug!(
            %provider,
            model = config.model(),
            content_chars = request.content().chars().count(),
            "sending completion request"
        );

        let reply = match provider {
            ProviderKind::OpenAi => openai::complete(
                &self.http,
                &self.openai_base_url,
                api_key,
                config.model(),
                request,
            ),
            ProviderKind::Claude => claude::complete(
                &self.http,
                &self.claude_base_url,
                api_key,
                config.model(),
                request,
            ),
        };

        if let Err(e) = &reply {
            tracing::warn!(%provider, error = %e, "completion request failed");
        }
        reply.map(|text| text.trim().to_string())
    }
}

/// Reads a response body, mapping non-success statuses to [`ProviderError::Http`].
pub(super) fn read_success_body(
    provider: ProviderKind,
    response: reqwest::blocking::Response,
) -> Result<String, ProviderError> {
    let status = response.status();
    let text = response
        .text()
        .map_err(|e| ProviderError::transport(provider, e))?;

    if !status.is_success() {
        tracing::error!("{provider} API error {status}: {text}");
        return Err(ProviderError::Http {
            provider,
            status: status.as_u16(),
        });
    }
    Ok(text)
}
