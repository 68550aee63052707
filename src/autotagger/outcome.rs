use std::fmt;
use std::path::{Path, PathBuf};

/// A step of the per-document tagging workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggingStage {
    Reading,
    Prompting,
    Parsing,
    Filtering,
    Confirming,
    Merging,
}

impl fmt::Display for TaggingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reading => "reading",
            Self::Prompting => "prompting",
            Self::Parsing => "parsing",
            Self::Filtering => "filtering",
            Self::Confirming => "confirming",
            Self::Merging => "merging",
        };
        f.write_str(name)
    }
}

/// Tags generated for a document, awaiting confirmation before they are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagProposal {
    path: PathBuf,
    tags: Vec<String>,
    excerpt: String,
}

impl TagProposal {
    pub fn new(path: impl Into<PathBuf>, tags: Vec<String>, excerpt: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tags,
            excerpt: excerpt.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Proposed tags in generation order, without duplicates.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The part of the note body that was sent to the provider.
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }
}

/// Result of tagging one document.
///
/// The `Display` text is the user-facing notice for the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// Tags were merged into the document and written.
    Applied { path: PathBuf, tags: Vec<String> },
    /// Tags are waiting for confirmation; nothing was written.
    Proposed(TagProposal),
    /// The provider reply held no usable tags.
    NoTagsGenerated,
    /// Every generated tag was already on the document.
    NoNewTags,
    /// The user confirmed none of the proposed tags.
    Declined,
    /// The workflow stopped at `stage`; the document was not changed.
    Failed { stage: TaggingStage, message: String },
}

impl TagOutcome {
    pub(crate) fn failed(stage: TaggingStage, message: impl Into<String>) -> Self {
        Self::Failed {
            stage,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Number of tags written to the document.
    pub fn tags_added(&self) -> usize {
        match self {
            Self::Applied { tags, .. } => tags.len(),
            _ => 0,
        }
    }
}

impl fmt::Display for TagOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied { tags, .. } => {
                write!(f, "Added {} tags: {}", tags.len(), tags.join(", "))
            }
            Self::Proposed(proposal) => write!(
                f,
                "Proposed {} tags: {}",
                proposal.tags().len(),
                proposal.tags().join(", ")
            ),
            Self::NoTagsGenerated => f.write_str("No tags generated"),
            Self::NoNewTags => f.write_str("No new tags to add"),
            Self::Declined => f.write_str("No tags selected"),
            Self::Failed { stage, message } => {
                write!(f, "Error generating tags ({stage}): {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_notice_lists_tags() {
        let outcome = TagOutcome::Applied {
            path: PathBuf::from("a.md"),
            tags: vec!["rust".to_string(), "cli".to_string()],
        };
        assert_eq!(outcome.to_string(), "Added 2 tags: rust, cli");
        assert_eq!(outcome.tags_added(), 2);
        assert!(!outcome.is_failure());
    }

    #[test]
    fn empty_outcomes_have_fixed_notices() {
        assert_eq!(TagOutcome::NoTagsGenerated.to_string(), "No tags generated");
        assert_eq!(TagOutcome::NoNewTags.to_string(), "No new tags to add");
        assert_eq!(TagOutcome::Declined.to_string(), "No tags selected");
    }

    #[test]
    fn failure_notice_keeps_message_verbatim() {
        let outcome = TagOutcome::failed(TaggingStage::Prompting, "OpenAI API key not configured");
        assert!(outcome.is_failure());
        assert_eq!(outcome.tags_added(), 0);
        assert_eq!(
            outcome.to_string(),
            "Error generating tags (prompting): OpenAI API key not configured"
        );
    }
}
