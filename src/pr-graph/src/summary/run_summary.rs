//! Run summary types.

use crate::launcher::LaunchOutcome;
use crate::pull_requests::ChangeRequest;
use std::path::PathBuf;

/// Summary of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Repository name shown in the page title.
    pub repository: String,

    /// Number of open pull requests drawn.
    pub change_requests: usize,

    /// How many of those are drafts.
    pub drafts: usize,

    /// Absolute path of the written page.
    pub output_path: PathBuf,

    /// `file://` URL of the written page.
    pub url: String,

    /// Whether a browser was started.
    pub browser_opened: bool,
}

impl RunSummary {
    /// Creates a summary from the drawn pull requests and the launch result.
    #[must_use]
    pub fn new(
        repository: impl Into<String>,
        change_requests: &[ChangeRequest],
        outcome: LaunchOutcome,
    ) -> Self {
        Self {
            repository: repository.into(),
            change_requests: change_requests.len(),
            drafts: change_requests.iter().filter(|cr| cr.is_draft).count(),
            output_path: outcome.path,
            url: outcome.url,
            browser_opened: outcome.opened,
        }
    }

    /// Returns true if the repository had no open pull requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.change_requests == 0
    }
}
