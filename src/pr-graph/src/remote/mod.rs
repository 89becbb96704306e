//! Repository identity resolution from the local git configuration.
//!
//! Two remote URL shapes are understood:
//! ```text
//! git@github.com:owner/repo.git
//! https://github.com/owner/repo.git
//! ```

mod descriptor;
mod error;

pub use descriptor::RemoteDescriptor;
pub use error::ResolutionError;

use crate::command::run_command;
use std::path::Path;
use tracing::{debug, info};

/// Name of the remote read when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";

/// Reads the URL of `remote` from git and parses it.
///
/// git runs in `working_dir`, or the current directory when `None`.
///
/// # Errors
///
/// Returns [`ResolutionError`] if git cannot be run, the remote does not
/// exist, or its URL has an unrecognized shape.
pub async fn resolve_remote(
    remote: &str,
    working_dir: Option<&Path>,
) -> Result<RemoteDescriptor, ResolutionError> {
    let stdout = run_command("git", &["remote", "get-url", remote], working_dir).await?;
    let descriptor = descriptor_from_output(remote, stdout)?;
    info!(repository = %descriptor, "Resolved repository");
    Ok(descriptor)
}

/// Turns the output of `git remote get-url` into a descriptor.
fn descriptor_from_output(
    remote: &str,
    stdout: Vec<u8>,
) -> Result<RemoteDescriptor, ResolutionError> {
    let url = String::from_utf8(stdout).map_err(|_| ResolutionError::InvalidUtf8 {
        program: "git".to_string(),
    })?;

    if url.trim().is_empty() {
        return Err(ResolutionError::MissingRemote {
            remote: remote.to_string(),
        });
    }

    debug!(remote, url = %url, "Read remote URL");
    parse_remote_url(&url)
}

/// Extracts the owner and repository name from a remote URL.
///
/// A trailing `.git` is ignored. Repository names may not contain `/`.
///
/// # Errors
///
/// Returns [`ResolutionError::UnrecognizedUrl`] for any other URL shape.
pub fn parse_remote_url(url: &str) -> Result<RemoteDescriptor, ResolutionError> {
    let trimmed = url.trim();
    let cleaned = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let path = match cleaned.split_once("://") {
        Some((scheme, rest)) => url_path(scheme, rest),
        None => scp_path(cleaned),
    };

    path.and_then(split_owner_repo)
        .ok_or_else(|| ResolutionError::UnrecognizedUrl {
            url: url.to_string(),
        })
}

/// Path portion of `scheme://host/owner/repo`.
fn url_path<'a>(scheme: &str, rest: &'a str) -> Option<&'a str> {
    let valid_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return None;
    }

    let (host, path) = rest.split_once('/')?;
    (!host.is_empty()).then_some(path)
}

/// Path portion of `user@host:owner/repo`.
fn scp_path(url: &str) -> Option<&str> {
    let (user, rest) = url.split_once('@')?;
    if user.is_empty() || user.contains('/') {
        return None;
    }

    let (host, path) = rest.split_once(':')?;
    (!host.is_empty() && !host.contains('/')).then_some(path)
}

fn split_owner_repo(path: &str) -> Option<RemoteDescriptor> {
    let (owner, repo) = path.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some(RemoteDescriptor::new(owner, repo))
}
