//! Child process error types.

use thiserror::Error;

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started at all.
    #[error("Failed to execute '{program}': {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited with a non-zero status.
    #[error("'{command}' failed{}: {stderr}", exit_suffix(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl CommandError {
    /// Returns the exit code reported by the failed command, if any.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Unavailable { .. } => None,
            Self::Failed { code, .. } => *code,
        }
    }
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" with exit code {c}"))
        .unwrap_or_default()
}
