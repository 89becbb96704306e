//! On-disk credential cache.
//!
//! The cache is a single JSON document:
//! ```json
//! { "access_token": "gho_...", "created_at": "2026-01-01T00:00:00Z" }
//! ```
//! Problems reading or writing it are logged and otherwise ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A bearer token together with the time it was obtained.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The bearer token.
    #[serde(rename = "access_token")]
    pub token: String,

    /// When the token was issued to this tool.
    #[serde(rename = "created_at")]
    pub obtained_at: DateTime<Utc>,
}

impl Credential {
    /// Wraps a freshly issued token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            obtained_at: Utc::now(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Credential cache stored at a fixed path.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Creates a cache backed by `path`. Nothing is touched until used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached credential.
    ///
    /// A missing, unreadable or malformed file yields `None`.
    pub fn load(&self) -> Option<Credential> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "No cached credential found");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read credential cache");
                return None;
            }
        };

        match serde_json::from_str::<Credential>(&contents) {
            Ok(credential) if credential.token.trim().is_empty() => {
                warn!(path = %self.path.display(), "Cached credential is empty");
                None
            }
            Ok(credential) => {
                debug!(
                    path = %self.path.display(),
                    obtained_at = %credential.obtained_at,
                    "Loaded cached credential"
                );
                Some(credential)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring malformed credential cache");
                None
            }
        }
    }

    /// Writes `credential` to the cache, creating parent directories.
    ///
    /// Returns whether the write succeeded. Failures are logged, not raised.
    pub fn persist(&self, credential: &Credential) -> bool {
        match self.try_persist(credential) {
            Ok(()) => {
                info!(path = %self.path.display(), "Saved credential");
                true
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to save credential");
                false
            }
        }
    }

    fn try_persist(&self, credential: &Credential) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(credential)?;
        std::fs::write(&self.path, json)?;
        restrict_permissions(&self.path)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
