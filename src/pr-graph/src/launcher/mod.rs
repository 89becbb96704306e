//! Writes the generated page and opens it in a browser.

mod error;

pub use error::LaunchError;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Default output location, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "dist/index.html";

/// Capability to open a URL with the platform's default application.
pub trait BrowserOpener: Send + Sync {
    /// Opens `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if no handler could be launched.
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs with the system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        webbrowser::open(url)
    }
}

/// Where the page ended up and whether a browser was started for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// Absolute path of the written page.
    pub path: PathBuf,
    /// `file://` URL of the written page.
    pub url: String,
    /// Whether the opener reported success.
    pub opened: bool,
}

/// Writes documents to a fixed path and hands them to a [`BrowserOpener`].
pub struct Launcher {
    output_path: PathBuf,
    opener: Option<Arc<dyn BrowserOpener>>,
}

impl Launcher {
    /// Creates a launcher. With no opener the page is only written.
    pub fn new(output_path: impl Into<PathBuf>, opener: Option<Arc<dyn BrowserOpener>>) -> Self {
        Self {
            output_path: output_path.into(),
            opener,
        }
    }

    /// Returns the configured output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes `document`, replacing any earlier output, then tries to open it.
    ///
    /// Failing to open a browser is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] if the page cannot be written.
    pub fn launch(&self, document: &str) -> Result<LaunchOutcome, LaunchError> {
        let path = write_document(&self.output_path, document)?;
        let url = Url::from_file_path(&path)
            .map_err(|()| LaunchError::FileUrl {
                path: path.display().to_string(),
            })?
            .to_string();
        info!(path = %path.display(), "Wrote pull request graph");

        let opened = match &self.opener {
            Some(opener) => match opener.open(&url) {
                Ok(()) => {
                    info!(url = %url, "Opened browser");
                    true
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to open browser, open the file manually");
                    false
                }
            },
            None => false,
        };

        Ok(LaunchOutcome { path, url, opened })
    }
}

/// Writes `document` to `path`, creating parent directories, and returns the
/// absolute path written.
///
/// # Errors
///
/// Returns [`LaunchError::IoError`] on any filesystem failure.
pub fn write_document(path: &Path, document: &str) -> Result<PathBuf, LaunchError> {
    let io_error = |source: std::io::Error| LaunchError::IoError {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, document).map_err(io_error)?;
    path.canonicalize().map_err(io_error)
}
