use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chat-completion backend used to generate tags.
///
/// Serialized as `"openai"` / `"claude"` in settings files; displayed with the
/// vendor's spelling in user-facing messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions API.
    #[default]
    OpenAi,
    /// Anthropic messages API.
    Claude,
}

impl ProviderKind {
    /// Returns the settings-file identifier for this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "OpenAI"),
            Self::Claude => write!(f, "Claude"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "claude" | "anthropic" => Ok(Self::Claude),
            other => Err(format!(
                "unknown provider '{other}' (expected 'openai' or 'claude')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_lowercase_identifiers() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::OpenAi).unwrap(),
            r#""openai""#
        );
        assert_eq!(
            serde_json::to_string(&ProviderKind::Claude).unwrap(),
            r#""claude""#
        );

        let parsed: ProviderKind = serde_json::from_str(r#""claude""#).unwrap();
        assert_eq!(parsed, ProviderKind::Claude);
    }

    #[test]
    fn deserialization_fails_on_unknown_variant() {
        let result: Result<ProviderKind, _> = serde_json::from_str(r#""gemini""#);
        assert!(result.is_err());
    }

    #[test]
    fn display_uses_vendor_spelling() {
        assert_eq!(ProviderKind::OpenAi.to_string(), "OpenAI");
        assert_eq!(ProviderKind::Claude.to_string(), "Claude");
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!(" claude ".parse::<ProviderKind>(), Ok(ProviderKind::Claude));
        assert_eq!("anthropic".parse::<ProviderKind>(), Ok(ProviderKind::Claude));
        assert!("ollama".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn default_is_openai() {
        assert_eq!(ProviderKind::default(), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::default().as_str(), "openai");
    }
}
