use std::fmt;

use crate::config::Settings;
use crate::models::ProviderKind;

/// Model used for OpenAI requests.
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Model used for Claude requests.
pub const CLAUDE_MODEL: &str = "claude-3-haiku-20240307";

/// Maximum number of characters of note body sent to a provider.
pub const MAX_CONTENT_CHARS: usize = 4000;

/// Token cap for a provider reply; a tag list is short.
pub const MAX_RESPONSE_TOKENS: u32 = 100;

/// Per-call provider settings derived from [`Settings`].
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    kind: ProviderKind,
    api_key: Option<String>,
    min_tags: u8,
    max_tags: u8,
    custom_prompt: String,
}

impl ProviderConfig {
    /// Builds the config for `kind` from `settings`, ignoring the default provider.
    pub fn for_provider(settings: &Settings, kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: settings.api_key(kind).map(str::to_string),
            min_tags: settings.min_tags,
            max_tags: settings.max_tags,
            custom_prompt: settings.custom_prompt.clone(),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Returns the API key, or `None` when it is not configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the fixed model identifier for this provider.
    pub fn model(&self) -> &'static str {
        match self.kind {
            ProviderKind::OpenAi => OPENAI_MODEL,
            ProviderKind::Claude => CLAUDE_MODEL,
        }
    }

    pub fn min_tags(&self) -> u8 {
        self.min_tags
    }

    pub fn max_tags(&self) -> u8 {
        self.max_tags
    }

    pub fn custom_prompt(&self) -> &str {
        &self.custom_prompt
    }
}

impl From<&Settings> for ProviderConfig {
    fn from(settings: &Settings) -> Self {
        Self::for_provider(settings, settings.default_provider)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("min_tags", &self.min_tags)
            .field("max_tags", &self.max_tags)
            .field("custom_prompt", &self.custom_prompt)
            .finish()
    }
}

/// Builds the instruction sent ahead of the note content.
///
/// Claude receives the note in the same message as the instruction, so its
/// wording refers to "this content".
///
/// # Examples
///
/// ```
/// use notetag::ProviderKind;
/// use notetag::provider::build_instruction;
///
/// assert_eq!(
///     build_instruction(ProviderKind::OpenAi, "Tag this.", 2, 5),
///     "Tag this. Generate between 2 and 5 tags. Return only the tags as a comma-separated list, no other text."
/// );
/// assert_eq!(
///     build_instruction(ProviderKind::Claude, "Tag this.", 2, 5),
///     "Tag this. Generate between 2 and 5 tags for this content. Return only the tags as a comma-separated list, no other text."
/// );
/// ```
pub fn build_instruction(
    kind: ProviderKind,
    custom_prompt: &str,
    min_tags: u8,
    max_tags: u8,
) -> String {
    let scope = match kind {
        ProviderKind::OpenAi => "",
        ProviderKind::Claude => " for this content",
    };
    format!(
        "{custom_prompt} Generate between {min_tags} and {max_tags} tags{scope}. \
         Return only the tags as a comma-separated list, no other text."
    )
}

/// The prompt for one generation call: instruction plus bounded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    instruction: String,
    content: String,
}

impl GenerationRequest {
    /// Builds a request for `body`, truncated to [`MAX_CONTENT_CHARS`] characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use notetag::provider::{GenerationRequest, ProviderConfig, MAX_CONTENT_CHARS};
    /// use notetag::Settings;
    ///
    /// let config = ProviderConfig::from(&Settings::default());
    /// let body = "é".repeat(MAX_CONTENT_CHARS + 10);
    /// let request = GenerationRequest::new(&body, &config);
    /// assert_eq!(request.content().chars().count(), MAX_CONTENT_CHARS);
    /// ```
    pub fn new(body: &str, config: &ProviderConfig) -> Self {
        Self {
            instruction: build_instruction(
                config.kind(),
                config.custom_prompt(),
                config.min_tags(),
                config.max_tags(),
            ),
            content: body.chars().take(MAX_CONTENT_CHARS).collect(),
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
