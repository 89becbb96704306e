//! Repository identity.

use serde::Serialize;
use std::fmt;

/// Owner and name of the repository whose pull requests are graphed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteDescriptor {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name, without any `.git` suffix.
    pub repo_name: String,
}

impl RemoteDescriptor {
    /// Creates a descriptor from its two parts.
    pub fn new(owner: impl Into<String>, repo_name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo_name: repo_name.into(),
        }
    }
}

impl fmt::Display for RemoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo_name)
    }
}
