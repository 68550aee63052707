use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::store::DocumentStore;

use super::outcome::{TagOutcome, TagProposal, TaggingStage};
use super::tagger::AutoTagger;

/// Documents between progress log lines.
const PROGRESS_INTERVAL: usize = 10;

/// Whether a progress line is due after `done` of `total` documents.
fn progress_due(done: usize, total: usize) -> bool {
    done % PROGRESS_INTERVAL == 0 && done < total
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Documents that went through the workflow without failing.
    pub processed: usize,
    /// Documents whose workflow failed.
    pub errors: usize,
    /// Documents that had tags written.
    pub updated: usize,
    /// Total tags written across all documents.
    pub tags_added: usize,
    /// Failed documents with their error notice.
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    fn record(&mut self, path: &Path, outcome: &TagOutcome) {
        if outcome.is_failure() {
            self.errors += 1;
            self.failures.push((path.to_path_buf(), outcome.to_string()));
            return;
        }
        self.processed += 1;
        if let TagOutcome::Applied { tags, .. } = outcome {
            self.updated += 1;
            self.tags_added += tags.len();
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Batch processing complete. Processed: {}, Errors: {}",
            self.processed, self.errors
        )
    }
}

impl AutoTagger {
    /// Tags each document in `paths`, one after another.
    ///
    /// Proposals are passed to `confirm`, which returns the tags to write. An
    /// error from `confirm` fails that document at the confirming stage.
    /// A failing document is recorded in the report and the batch moves on.
    pub fn run_batch<F>(
        &self,
        store: &dyn DocumentStore,
        paths: &[PathBuf],
        settings: &Settings,
        mut confirm: F,
    ) -> BatchReport
    where
        F: FnMut(&TagProposal) -> anyhow::Result<Vec<String>>,
    {
        let mut report = BatchReport::default();

        for (index, path) in paths.iter().enumerate() {
            tracing::debug!(path = %path.display(), index, total = paths.len(), "batch document");

            let outcome = match self.tag_document(store, path, settings) {
                TagOutcome::Proposed(proposal) => match confirm(&proposal) {
                    Ok(selected) => self.apply_selection(store, &proposal, &selected),
                    Err(e) => TagOutcome::failed(TaggingStage::Confirming, format!("{e:#}")),
                },
                other => other,
            };

            if outcome.is_failure() {
                tracing::warn!(path = %path.display(), %outcome, "batch document failed");
            }
            report.record(path, &outcome);

            if progress_due(index + 1, paths.len()) {
                tracing::info!("Processed {}/{} files...", index + 1, paths.len());
            }
        }

        tracing::info!(
            processed = report.processed,
            errors = report.errors,
            updated = report.updated,
            "batch finished"
        );
        report
    }
}
