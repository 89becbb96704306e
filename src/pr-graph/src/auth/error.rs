//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while obtaining a credential.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The device-authorization endpoint answered with a non-success status.
    #[error("Device code request failed with status {status}")]
    DeviceCodeRequestFailed { status: u16 },

    /// The token endpoint answered with a non-success status.
    #[error("Token request failed with status {status}")]
    TokenRequestFailed { status: u16 },

    /// The platform ended the flow with an error other than a pending signal.
    #[error("Device flow error: {error}{}", .description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Rejected {
        error: String,
        description: Option<String>,
    },

    /// The operator did not finish authorizing before the device code expired.
    #[error("Authorization timed out after {expires_in} seconds, please run again")]
    TimedOut { expires_in: u64 },

    /// A response body could not be understood.
    #[error("Malformed {endpoint} response: {message}")]
    MalformedResponse {
        endpoint: &'static str,
        message: String,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
