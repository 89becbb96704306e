//! Octocrab client construction.

use http::header::ACCEPT;
use http::Uri;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use thiserror::Error;

/// Media type selecting GitHub's structured JSON representation.
pub const GITHUB_JSON: &str = "application/vnd.github+json";

/// Errors that can occur while building an API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured API base is not a valid URI.
    #[error("Invalid API base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    /// Octocrab refused to build the client.
    #[error("Failed to build GitHub client: {0}")]
    Build(#[from] octocrab::Error),
}

/// Builds an Octocrab client that sends `token` as a bearer credential to
/// `api_base`.
///
/// Every request is sent exactly once; octocrab's built-in retry is off.
///
/// # Errors
///
/// Returns [`ClientError`] if the base URL cannot be parsed or the client
/// cannot be constructed.
pub fn build_client(api_base: &str, token: &str) -> Result<Octocrab, ClientError> {
    let base_uri: Uri = api_base
        .parse()
        .map_err(|e| ClientError::InvalidBaseUrl {
            url: api_base.to_string(),
            source: e,
        })?;

    Ok(Octocrab::builder()
        .base_uri(base_uri)?
        .personal_token(token.to_string())
        .add_header(ACCEPT, GITHUB_JSON.to_string())
        .add_retry_config(RetryConfig::None)
        .build()?)
}
