//! Repository resolution error types.

use crate::command::CommandError;
use thiserror::Error;

/// Errors that can occur while determining which repository to graph.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The `git` or `gh` invocation failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The remote exists but has no URL.
    #[error("Remote '{remote}' has no configured URL")]
    MissingRemote { remote: String },

    /// The remote URL is neither `user@host:owner/repo` nor `scheme://host/owner/repo`.
    #[error("Unrecognized repository URL: {url}")]
    UnrecognizedUrl { url: String },

    /// A command printed output that is not valid UTF-8.
    #[error("'{program}' printed output that is not valid UTF-8")]
    InvalidUtf8 { program: String },

    /// The repository CLI printed JSON of an unexpected shape.
    #[error("Failed to parse '{program}' output: {source}")]
    InvalidJson {
        program: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ResolutionError {
    /// Returns the exit code of the failed upstream command, if there was one.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Command(e) => e.exit_code(),
            _ => None,
        }
    }
}
