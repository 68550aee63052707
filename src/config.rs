//! Persisted settings for tag generation.
//!
//! Settings live in a TOML file (see [`crate::utils::get_config_path`]). A path
//! ending in `.json` is read as JSON instead, which accepts the camelCase keys
//! of an exported note-app plugin configuration. Missing keys fall back to
//! their defaults.
//!
//! Environment variables override the file after loading:
//!
//! - `OPENAI_API_KEY`
//! - `ANTHROPIC_API_KEY`
//! - `NOTETAG_PROVIDER` (`openai` or `claude`)
//!
//! Requests are never retried. A failing call is reported once and the next
//! document (if any) proceeds. `request_timeout_secs` bounds every call.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ProviderKind;

/// Default style instruction sent ahead of the tag-count sentence.
pub const DEFAULT_CUSTOM_PROMPT: &str = "Generate relevant tags for this note content. Focus on main topics, themes, and categories. Return tags as a comma-separated list.";

/// Inclusive bounds for `min_tags` and `max_tags`.
pub const TAG_COUNT_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

const REDACTED: &str = "********";

/// Errors raised while loading, validating, or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("Failed to write settings file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// User-facing configuration for tag generation.
///
/// Passed explicitly to the tagger and provider client; nothing reads global
/// state. Reload by calling [`Settings::load`] again.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend used when no provider is given on the command line.
    #[serde(alias = "defaultProvider")]
    pub default_provider: ProviderKind,
    #[serde(alias = "openaiApiKey")]
    pub openai_api_key: String,
    #[serde(alias = "claudeApiKey")]
    pub claude_api_key: String,
    /// Lower bound requested in the prompt. Not enforced on the reply.
    #[serde(alias = "minTags")]
    pub min_tags: u8,
    /// Upper bound requested in the prompt and enforced on the reply.
    #[serde(alias = "maxTags")]
    pub max_tags: u8,
    #[serde(alias = "customPrompt")]
    pub custom_prompt: String,
    /// Write tags without an interactive preview.
    #[serde(alias = "autoApplyTags")]
    pub auto_apply_tags: bool,
    /// Drop generated tags the note already carries.
    #[serde(alias = "excludeExistingTags")]
    pub exclude_existing_tags: bool,
    /// Run batches without asking for confirmation first.
    #[serde(alias = "batchProcessing")]
    pub batch_processing: bool,
    /// Per-request timeout for provider calls.
    #[serde(alias = "requestTimeoutSecs")]
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_provider: ProviderKind::OpenAi,
            openai_api_key: String::new(),
            claude_api_key: String::new(),
            min_tags: 2,
            max_tags: 5,
            custom_prompt: DEFAULT_CUSTOM_PROMPT.to_string(),
            auto_apply_tags: false,
            exclude_existing_tags: true,
            batch_processing: false,
            request_timeout_secs: 60,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("default_provider", &self.default_provider)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("claude_api_key", &redact(&self.claude_api_key))
            .field("min_tags", &self.min_tags)
            .field("max_tags", &self.max_tags)
            .field("custom_prompt", &self.custom_prompt)
            .field("auto_apply_tags", &self.auto_apply_tags)
            .field("exclude_existing_tags", &self.exclude_existing_tags)
            .field("batch_processing", &self.batch_processing)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Settings {
    /// Loads settings from `path`, applies environment overrides, and validates.
    ///
    /// A missing file yields the defaults (still subject to overrides).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, if an
    /// override is malformed, or if the resulting settings are out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::parse(path, &content)?
        } else {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            Self::default()
        };

        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings text, choosing JSON or TOML by the path's extension.
    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed: Result<Self, String> = if is_json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            toml::from_str(content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parses TOML settings text without touching the environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use notetag::{ProviderKind, Settings};
    ///
    /// let settings = Settings::from_toml_str("default_provider = \"claude\"\nmax_tags = 3").unwrap();
    /// assert_eq!(settings.default_provider, ProviderKind::Claude);
    /// assert_eq!(settings.max_tags, 3);
    /// assert_eq!(settings.min_tags, 2);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid settings TOML or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings = Self::parse(Path::new("settings.toml"), content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.trim().is_empty()
        {
            self.openai_api_key = key;
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
            && !key.trim().is_empty()
        {
            self.claude_api_key = key;
        }
        if let Ok(provider) = std::env::var("NOTETAG_PROVIDER") {
            self.default_provider = provider.parse().map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    /// Checks tag-count bounds and the request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("min_tags", self.min_tags), ("max_tags", self.max_tags)] {
            if !TAG_COUNT_RANGE.contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between {} and {}, got {value}",
                    TAG_COUNT_RANGE.start(),
                    TAG_COUNT_RANGE.end()
                )));
            }
        }
        if self.min_tags > self.max_tags {
            return Err(ConfigError::Invalid(format!(
                "min_tags ({}) must not exceed max_tags ({})",
                self.min_tags, self.max_tags
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the configured API key for `provider`, or `None` when blank.
    pub fn api_key(&self, provider: ProviderKind) -> Option<&str> {
        let key = match provider {
            ProviderKind::OpenAi => &self.openai_api_key,
            ProviderKind::Claude => &self.claude_api_key,
        };
        let key = key.trim();
        (!key.is_empty()).then_some(key)
    }

    /// Returns a copy using `provider` instead of the configured default.
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.default_provider = provider;
        self
    }

    /// Returns a copy with API keys masked, suitable for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.openai_api_key = redact(&self.openai_api_key).to_string();
        copy.claude_api_key = redact(&self.claude_api_key).to_string();
        copy
    }

    /// Serializes the settings as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Writes the settings to `path` as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, content).map_err(write_err)
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.trim().is_empty() { "" } else { REDACTED }
}
