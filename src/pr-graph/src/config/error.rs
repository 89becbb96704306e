//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings in '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// No OAuth client id is configured.
    #[error("No OAuth client id configured (set --client-id, PR_GRAPH_CLIENT_ID or client-id in the settings file)")]
    MissingClientId,

    /// The platform has no per-user configuration directory.
    #[error("Cannot determine the user configuration directory (set PR_GRAPH_CONFIG_DIR)")]
    NoConfigDirectory,

    /// A value is not one of the accepted choices.
    #[error("Invalid {field} '{value}', expected one of: {expected}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A value is out of range.
    #[error("Invalid {field}: {message}")]
    ValidationError {
        field: &'static str,
        message: String,
    },
}
