//! Open pull request snapshot.

use serde::{Deserialize, Serialize};

/// One open pull request, reduced to what the graph needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRequest {
    /// Pull request number.
    pub number: u64,

    /// Branch the changes come from (the head).
    pub source_branch: String,

    /// Branch the changes merge into (the base).
    pub target_branch: String,

    /// Pull request title.
    pub title: String,

    /// Whether the pull request is a draft.
    pub is_draft: bool,

    /// Web URL of the pull request.
    pub url: String,
}

/// Pull request as returned by `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestPayload {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    draft: Option<bool>,
    html_url: String,
    head: BranchRef,
    base: BranchRef,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    name: String,
}

impl From<PullRequestPayload> for ChangeRequest {
    fn from(payload: PullRequestPayload) -> Self {
        Self {
            number: payload.number,
            source_branch: payload.head.name,
            target_branch: payload.base.name,
            title: payload.title.unwrap_or_default(),
            is_draft: payload.draft.unwrap_or(false),
            url: payload.html_url,
        }
    }
}
