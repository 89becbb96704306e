//! Runner error types.

/// Errors that can end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings could not be loaded or resolved.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The repository or the `gh` output could not be read.
    #[error(transparent)]
    Resolution(#[from] crate::remote::ResolutionError),

    /// No credential could be obtained.
    #[error(transparent)]
    Auth(#[from] crate::auth::AuthError),

    /// The API client could not be built.
    #[error(transparent)]
    Client(#[from] crate::client::ClientError),

    /// The pull request listing failed.
    #[error(transparent)]
    Api(#[from] crate::pull_requests::ApiError),

    /// The page could not be rendered.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// The page could not be written.
    #[error(transparent)]
    Launch(#[from] crate::launcher::LaunchError),
}

impl RunnerError {
    /// Process exit status for this error.
    ///
    /// A failed external command propagates its own non-zero status; everything
    /// else exits with 1.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Resolution(e) => e
                .exit_code()
                .and_then(|code| u8::try_from(code).ok())
                .filter(|code| *code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}
