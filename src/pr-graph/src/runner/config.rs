//! Runner configuration.

use crate::config::{
    default_cache_path, ConfigError, Settings, Source, DEFAULT_API_BASE, DEFAULT_CLIENT_ID,
    DEFAULT_DEVICE_CODE_URL, DEFAULT_SCOPE, DEFAULT_TOKEN_URL,
};
use crate::diagram::DiagramOptions;
use crate::launcher::DEFAULT_OUTPUT_PATH;
use crate::pull_requests::DEFAULT_PER_PAGE;
use crate::remote::DEFAULT_REMOTE;
use std::path::{Path, PathBuf};

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Where pull requests come from.
    source: Source,
    /// git remote naming the repository.
    remote: String,
    /// OAuth app client id.
    client_id: String,
    /// OAuth scope for the device flow.
    scope: String,
    /// REST API base URL.
    api_base: String,
    /// Device-authorization endpoint.
    device_code_url: String,
    /// Token endpoint.
    token_url: String,
    /// Credential cache file.
    cache_path: PathBuf,
    /// Generated page location.
    output_path: PathBuf,
    /// Graph shape.
    diagram: DiagramOptions,
    /// Zoom and pan support in the page.
    zoom: bool,
    /// Whether to open the page once written.
    open_browser: bool,
    /// Page size for the pull request listing.
    per_page: u8,
    /// Directory git and gh run in; the current directory when unset.
    working_dir: Option<PathBuf>,
}

impl RunnerConfig {
    /// Resolves merged settings against the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the client id is blank, the page size is
    /// out of range, or no cache location can be determined for the API source.
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let source = settings.source.unwrap_or_default();

        let client_id = settings
            .client_id
            .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string())
            .trim()
            .to_string();
        if source == Source::Api && client_id.is_empty() {
            return Err(ConfigError::MissingClientId);
        }

        let per_page = settings.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if !(1..=100).contains(&per_page) {
            return Err(ConfigError::ValidationError {
                field: "per-page",
                message: format!("{per_page} is not between 1 and 100"),
            });
        }

        let cache_path = match (settings.cache_path, source) {
            (Some(path), _) => path,
            (None, Source::Api) => default_cache_path()?,
            // Unused without the device flow.
            (None, Source::GhCli) => default_cache_path().unwrap_or_default(),
        };

        Ok(Self {
            source,
            remote: settings
                .remote
                .unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            client_id,
            scope: settings.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            api_base: settings
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            device_code_url: settings
                .device_code_url
                .unwrap_or_else(|| DEFAULT_DEVICE_CODE_URL.to_string()),
            token_url: settings
                .token_url
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            cache_path,
            output_path: settings
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            diagram: DiagramOptions {
                direction: settings.direction.unwrap_or_default(),
                labels: settings.labels.unwrap_or_default(),
            },
            zoom: settings.zoom.unwrap_or(true),
            open_browser: settings.open.unwrap_or(true),
            per_page,
            working_dir: None,
        })
    }

    /// Sets the directory the repository commands run in.
    #[must_use]
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(working_dir.into());
        self
    }

    /// Returns the pull request source.
    pub fn source(&self) -> Source {
        self.source
    }

    /// Returns the git remote name.
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Returns the OAuth client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns the REST API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the device-authorization endpoint.
    pub fn device_code_url(&self) -> &str {
        &self.device_code_url
    }

    /// Returns the token endpoint.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Returns the credential cache path.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Returns the output page path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns the diagram options.
    pub fn diagram(&self) -> DiagramOptions {
        self.diagram
    }

    /// Returns whether zoom support is enabled.
    pub fn zoom(&self) -> bool {
        self.zoom
    }

    /// Returns whether the page is opened after writing.
    pub fn open_browser(&self) -> bool {
        self.open_browser
    }

    /// Returns the listing page size.
    pub fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Returns the directory repository commands run in, if overridden.
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}
