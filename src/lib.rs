pub mod autotagger;
pub mod config;
pub mod frontmatter;
pub mod models;
pub mod provider;
pub mod store;
pub mod tui;
pub mod utils;

pub use autotagger::{AutoTagger, AutoTaggerBuilder, BatchReport, TagOutcome, TagProposal};
pub use config::Settings;
pub use models::{Document, ProviderKind, TagSet};
pub use provider::{CompletionClient, ProviderClient, ProviderClientBuilder, ProviderError};
pub use store::{DocumentStore, FsDocumentStore, MemoryDocumentStore};
