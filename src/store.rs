use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::model::{ManualVerdict, ResultsDocument};
use crate::util::{now_utc_string, write_json_pretty};

pub const DEFAULT_RESULTS_FILE: &str = "checklist-results.json";

/// Whole-document JSON persistence for the checklist results. Callers that
/// write concurrently must serialize themselves; see `server::AppState`.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    path: PathBuf,
}

impl ResultsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted document, or an empty one when it is missing or unreadable.
    pub fn load(&self) -> ResultsDocument {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "results file unavailable");
                return ResultsDocument::default();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(document) => document,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "results file unreadable, starting empty");
                ResultsDocument::default()
            }
        }
    }

    pub fn save(&self, document: &mut ResultsDocument) -> Result<()> {
        document.last_run = Some(now_utc_string());
        write_json_pretty(&self.path, document)
            .with_context(|| format!("failed to save results to {}", self.path.display()))
    }

    pub fn set_manual_verdict(&self, key: &str, verdict: ManualVerdict) -> Result<()> {
        let mut document = self.load();
        document.manual.insert(key.to_string(), verdict);
        self.save(&mut document)
    }

    /// Writes and returns a fresh document. `lastRun` stays empty so the
    /// dashboard shows the checklist as never run.
    pub fn reset(&self) -> Result<ResultsDocument> {
        let document = ResultsDocument::default();
        write_json_pretty(&self.path, &document)
            .with_context(|| format!("failed to reset results at {}", self.path.display()))?;
        Ok(document)
    }
}
