//! Pull request listing error types.

use thiserror::Error;

/// Errors that can occur while listing pull requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The repository does not exist or the token cannot see it.
    #[error("Repository not found: {owner}/{repo} (check the remote URL and the token's scope)")]
    NotFound { owner: String, repo: String },

    /// Any other non-success response.
    #[error("GitHub API failed: {status} {reason}: {message}")]
    Failed {
        status: u16,
        reason: String,
        message: String,
    },

    /// The request never produced an HTTP response, or its body was unreadable.
    #[error("GitHub API error: {0}")]
    Transport(#[source] octocrab::Error),
}
