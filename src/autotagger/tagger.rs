//! Auto-tagger that turns note content into frontmatter tags.
//!
//! This module provides the `AutoTagger` struct, which drives one document
//! through reading, prompting, parsing, filtering, and merging.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::frontmatter::{extract_existing_tags, merge_tags};
use crate::models::{Document, TagSet};
use crate::provider::{
    CompletionClient, GenerationRequest, MAX_CONTENT_CHARS, ProviderConfig, ProviderError,
};
use crate::store::DocumentStore;
use crate::utils::is_markdown_file;

use super::normalizer::TagNormalizer;
use super::outcome::{TagOutcome, TagProposal, TaggingStage};

/// Builder for constructing `AutoTagger` instances.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use notetag::autotagger::AutoTaggerBuilder;
/// use notetag::provider::ProviderClientBuilder;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ProviderClientBuilder::new().build()?;
///
/// let tagger = AutoTaggerBuilder::new()
///     .client(Arc::new(client))
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct AutoTaggerBuilder {
    client: Option<Arc<dyn CompletionClient>>,
}

impl AutoTaggerBuilder {
    /// Creates a new `AutoTaggerBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the completion client used for tag generation.
    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the `AutoTagger` with the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if `client()` was not called before `build()`.
    #[must_use]
    pub fn build(self) -> AutoTagger {
        AutoTagger {
            client: self.client.expect("client must be set via client() method"),
        }
    }
}

/// Generates tags for notes and merges them into their frontmatter.
///
/// Settings are passed per call; the tagger holds only the client.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use std::sync::Arc;
/// use notetag::autotagger::{AutoTagger, TagOutcome};
/// use notetag::provider::{CompletionClient, GenerationRequest, ProviderConfig, ProviderError};
/// use notetag::store::MemoryDocumentStore;
/// use notetag::Settings;
///
/// struct Canned;
///
/// impl CompletionClient for Canned {
///     fn complete(&self, _: &ProviderConfig, _: &GenerationRequest) -> Result<String, ProviderError> {
///         Ok("intro, notes".to_string())
///     }
/// }
///
/// let store = MemoryDocumentStore::new().with_document("a.md", "# Title\nHello world");
/// let settings = Settings { auto_apply_tags: true, ..Settings::default() };
///
/// let tagger = AutoTagger::new(Arc::new(Canned));
/// let outcome = tagger.tag_document(&store, Path::new("a.md"), &settings);
///
/// assert_eq!(outcome.to_string(), "Added 2 tags: intro, notes");
/// assert_eq!(
///     store.get("a.md").unwrap(),
///     "---\ntags: [\"intro\", \"notes\"]\n---\n\n# Title\nHello world"
/// );
/// ```
pub struct AutoTagger {
    client: Arc<dyn CompletionClient>,
}

impl AutoTagger {
    /// Creates a new `AutoTagger` with the specified completion client.
    ///
    /// Prefer using `AutoTaggerBuilder` for more ergonomic construction.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Generates tags for a note body with the given provider config.
    ///
    /// The body is truncated before sending, and the reply is parsed into at
    /// most `max_tags` lowercase tags.
    ///
    /// # Errors
    ///
    /// Returns the `ProviderError` from the client unchanged.
    pub fn generate(
        &self,
        body: &str,
        config: &ProviderConfig,
    ) -> Result<Vec<String>, ProviderError> {
        let request = GenerationRequest::new(body, config);
        let reply = self.client.complete(config, &request)?;
        Ok(TagNormalizer::parse_model_reply(&reply, config.max_tags()))
    }

    /// Runs the tagging workflow for one document.
    ///
    /// With `auto_apply_tags` set the tags are written immediately; otherwise
    /// a [`TagOutcome::Proposed`] is returned for [`AutoTagger::apply_selection`].
    /// Failures never modify the document.
    pub fn tag_document(
        &self,
        store: &dyn DocumentStore,
        path: &Path,
        settings: &Settings,
    ) -> TagOutcome {
        tracing::debug!(path = %path.display(), stage = %TaggingStage::Reading, "tagging document");
        if !is_markdown_file(path) {
            return TagOutcome::failed(
                TaggingStage::Reading,
                format!("Not a markdown file: {}", path.display()),
            );
        }
        let doc = match store.read(path) {
            Ok(text) => Document::parse(text),
            Err(e) => return TagOutcome::failed(TaggingStage::Reading, format!("{e:#}")),
        };

        tracing::debug!(path = %path.display(), stage = %TaggingStage::Prompting);
        let config = ProviderConfig::from(settings);
        let generated = match self.generate(doc.body(), &config) {
            Ok(tags) => tags,
            Err(e) => {
                let stage = if e.is_response_error() {
                    TaggingStage::Parsing
                } else {
                    TaggingStage::Prompting
                };
                tracing::warn!(path = %path.display(), %stage, error = %e, "tag generation failed");
                return TagOutcome::failed(stage, e.to_string());
            }
        };

        tracing::debug!(path = %path.display(), stage = %TaggingStage::Parsing, count = generated.len());
        if generated.is_empty() {
            return TagOutcome::NoTagsGenerated;
        }

        tracing::debug!(path = %path.display(), stage = %TaggingStage::Filtering);
        let existing = extract_existing_tags(&doc);
        let candidates = filter_new_tags(generated, &existing, settings.exclude_existing_tags);
        if candidates.is_empty() {
            return TagOutcome::NoNewTags;
        }

        if settings.auto_apply_tags {
            self.merge_into(store, path, candidates.as_slice())
        } else {
            let excerpt: String = doc.body().chars().take(MAX_CONTENT_CHARS).collect();
            TagOutcome::Proposed(TagProposal::new(path, candidates.into_vec(), excerpt))
        }
    }

    /// Writes the confirmed subset of a proposal to its document.
    ///
    /// Tags not in the proposal are ignored and proposal order is kept. An
    /// empty selection writes nothing and yields [`TagOutcome::Declined`].
    /// The document is re-read before merging.
    pub fn apply_selection(
        &self,
        store: &dyn DocumentStore,
        proposal: &TagProposal,
        selected: &[String],
    ) -> TagOutcome {
        let chosen: Vec<String> = proposal
            .tags()
            .iter()
            .filter(|tag| selected.contains(tag))
            .cloned()
            .collect();

        if chosen.is_empty() {
            return TagOutcome::Declined;
        }
        self.merge_into(store, proposal.path(), &chosen)
    }

    fn merge_into(&self, store: &dyn DocumentStore, path: &Path, tags: &[String]) -> TagOutcome {
        tracing::debug!(path = %path.display(), stage = %TaggingStage::Merging, count = tags.len());
        let doc = match store.read(path) {
            Ok(text) => Document::parse(text),
            Err(e) => return TagOutcome::failed(TaggingStage::Reading, format!("{e:#}")),
        };

        let existing = extract_existing_tags(&doc);
        let merged = merge_tags(&doc, tags.iter().cloned());
        if merged == doc {
            return TagOutcome::NoNewTags;
        }

        if let Err(e) = store.write(path, merged.text()) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write tags");
            return TagOutcome::failed(TaggingStage::Merging, format!("{e:#}"));
        }

        let added: TagSet = tags
            .iter()
            .filter(|tag| !existing.contains(tag))
            .cloned()
            .collect();
        TagOutcome::Applied {
            path: path.to_path_buf(),
            tags: added.into_vec(),
        }
    }
}

/// Collects generated tags into a set, optionally dropping ones already present.
///
/// Existing tags are compared lowercased, since generated tags always are.
fn filter_new_tags(generated: Vec<String>, existing: &TagSet, exclude_existing: bool) -> TagSet {
    let existing_lower: HashSet<String> = if exclude_existing {
        existing.iter().map(str::to_lowercase).collect()
    } else {
        HashSet::new()
    };

    generated
        .into_iter()
        .filter(|tag| !existing_lower.contains(tag))
        .collect()
}
