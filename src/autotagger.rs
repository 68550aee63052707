//! Tag generation and the per-document tagging workflow.
//!
//! [`AutoTagger`] reads a note, sends its body (never its frontmatter) to a
//! [`CompletionClient`](crate::provider::CompletionClient), parses the reply
//! with [`TagNormalizer`], drops tags the note already carries, and then
//! either writes the merged frontmatter or returns a [`TagProposal`] for
//! confirmation. [`AutoTagger::run_batch`] repeats this over many notes.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use notetag::autotagger::{AutoTaggerBuilder, TagOutcome};
//! use notetag::provider::ProviderClientBuilder;
//! use notetag::store::FsDocumentStore;
//! use notetag::Settings;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load(Path::new("config.toml"))?;
//! let client = ProviderClientBuilder::new().build()?;
//! let tagger = AutoTaggerBuilder::new().client(Arc::new(client)).build();
//! let store = FsDocumentStore::new("notes");
//!
//! match tagger.tag_document(&store, Path::new("idea.md"), &settings) {
//!     TagOutcome::Proposed(proposal) => {
//!         let all = proposal.tags().to_vec();
//!         println!("{}", tagger.apply_selection(&store, &proposal, &all));
//!     }
//!     other => println!("{other}"),
//! }
//! # Ok(())
//! # }
//! ```

mod batch;
mod normalizer;
mod outcome;
mod tagger;

pub use batch::BatchReport;
pub use normalizer::{MAX_TAG_LENGTH, TagNormalizer};
pub use outcome::{TagOutcome, TagProposal, TaggingStage};
pub use tagger::{AutoTagger, AutoTaggerBuilder};
