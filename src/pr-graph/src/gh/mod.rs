//! Pull requests and repository name via the GitHub CLI (`gh`).
//!
//! This path skips remote resolution, authentication and the REST call:
//! `gh` already knows the repository and holds its own credential.

use crate::command::run_command;
use crate::pull_requests::ChangeRequest;
use crate::remote::ResolutionError;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const GH: &str = "gh";

/// Fields requested from `gh pr list`.
const PR_FIELDS: &str = "number,baseRefName,headRefName,title,isDraft,url";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhPullRequest {
    number: u64,
    base_ref_name: String,
    head_ref_name: String,
    title: String,
    #[serde(default)]
    is_draft: bool,
    url: String,
}

impl From<GhPullRequest> for ChangeRequest {
    fn from(pr: GhPullRequest) -> Self {
        Self {
            number: pr.number,
            source_branch: pr.head_ref_name,
            target_branch: pr.base_ref_name,
            title: pr.title,
            is_draft: pr.is_draft,
            url: pr.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GhRepository {
    name: String,
}

/// Lists open pull requests with `gh pr list`, run in `working_dir` (or the
/// current directory).
///
/// # Errors
///
/// Returns [`ResolutionError`] if `gh` fails or prints unexpected JSON.
pub async fn list_pull_requests(
    working_dir: Option<&Path>,
) -> Result<Vec<ChangeRequest>, ResolutionError> {
    let stdout = run_command(GH, &["pr", "list", "--json", PR_FIELDS], working_dir).await?;
    let change_requests = parse_pull_request_list(&stdout)?;
    info!(count = change_requests.len(), "Found pull requests via gh");
    Ok(change_requests)
}

/// Reads the repository's name with `gh repo view`, run in `working_dir`
/// (or the current directory).
///
/// # Errors
///
/// Returns [`ResolutionError`] if `gh` fails or prints unexpected JSON.
pub async fn repository_name(working_dir: Option<&Path>) -> Result<String, ResolutionError> {
    let stdout = run_command(GH, &["repo", "view", "--json", "name"], working_dir).await?;
    parse_repository_name(&stdout)
}

/// Parses the JSON printed by `gh pr list --json ...`.
///
/// # Errors
///
/// Returns [`ResolutionError::InvalidJson`] for any other shape.
pub fn parse_pull_request_list(json: &[u8]) -> Result<Vec<ChangeRequest>, ResolutionError> {
    let pulls: Vec<GhPullRequest> = serde_json::from_slice(json).map_err(invalid_json)?;
    Ok(pulls.into_iter().map(ChangeRequest::from).collect())
}

/// Parses the JSON printed by `gh repo view --json name`.
///
/// # Errors
///
/// Returns [`ResolutionError::InvalidJson`] for any other shape.
pub fn parse_repository_name(json: &[u8]) -> Result<String, ResolutionError> {
    let repository: GhRepository = serde_json::from_slice(json).map_err(invalid_json)?;
    Ok(repository.name)
}

fn invalid_json(source: serde_json::Error) -> ResolutionError {
    ResolutionError::InvalidJson {
        program: GH.to_string(),
        source,
    }
}
