//! Output file error types.

use thiserror::Error;

/// Errors that can occur while writing the generated page.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Failed to create the output directory or write the page.
    #[error("Failed to write '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The written file could not be expressed as a `file://` URL.
    #[error("Cannot build a file URL for '{path}'")]
    FileUrl { path: String },
}
