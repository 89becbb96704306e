//! Listing of open pull requests.
//!
//! One page of `GET /repos/{owner}/{repo}/pulls?state=open` is read; the
//! platform's ordering and `state` filter are kept as-is.

mod change_request;
mod error;

pub use change_request::ChangeRequest;
pub use error::ApiError;

use crate::remote::RemoteDescriptor;
use change_request::PullRequestPayload;
use http::StatusCode;
use octocrab::Octocrab;
use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};

/// Page size requested when none is configured.
pub const DEFAULT_PER_PAGE: u8 = 100;

#[derive(Serialize)]
struct ListParams {
    state: &'static str,
    per_page: u8,
}

/// Fetches the open pull requests of `remote`.
///
/// # Arguments
///
/// * `octocrab` - Client authenticated with the bearer token
/// * `remote` - Repository to list
/// * `per_page` - Page size cap (at most 100 on GitHub)
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] on HTTP 404 and [`ApiError::Failed`] on any
/// other non-success status.
pub async fn fetch_open_pull_requests(
    octocrab: &Octocrab,
    remote: &RemoteDescriptor,
    per_page: u8,
) -> Result<Vec<ChangeRequest>, ApiError> {
    let span = info_span!("fetch_pull_requests", repo = %remote);

    async {
        info!("Fetching open pull requests");
        let route = format!("/repos/{}/{}/pulls", remote.owner, remote.repo_name);
        let params = ListParams {
            state: "open",
            per_page,
        };

        let payloads: Vec<PullRequestPayload> = octocrab
            .get(&route, Some(&params))
            .await
            .map_err(|e| map_api_error(remote, e))?;

        let change_requests: Vec<ChangeRequest> =
            payloads.into_iter().map(ChangeRequest::from).collect();
        info!(count = change_requests.len(), "Found pull requests");
        for change_request in &change_requests {
            debug!(
                number = change_request.number,
                head = %change_request.source_branch,
                base = %change_request.target_branch,
                "Pull request"
            );
        }
        Ok(change_requests)
    }
    .instrument(span)
    .await
}

fn map_api_error(remote: &RemoteDescriptor, error: octocrab::Error) -> ApiError {
    match error {
        octocrab::Error::GitHub { source, .. } if source.status_code == StatusCode::NOT_FOUND => {
            ApiError::NotFound {
                owner: remote.owner.clone(),
                repo: remote.repo_name.clone(),
            }
        }
        octocrab::Error::GitHub { source, .. } => ApiError::Failed {
            status: source.status_code.as_u16(),
            reason: source
                .status_code
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: source.message,
        },
        other => ApiError::Transport(other),
    }
}
