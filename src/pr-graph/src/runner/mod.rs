//! Orchestrates one graph generation run.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::auth::{Clock, CredentialProvider, DeviceFlow, SystemClock, TokenCache};
use crate::client::build_client;
use crate::config::Source;
use crate::diagram::build_diagram;
use crate::gh;
use crate::launcher::{BrowserOpener, Launcher, SystemBrowser};
use crate::pull_requests::{fetch_open_pull_requests, ChangeRequest};
use crate::remote::{resolve_remote, RemoteDescriptor};
use crate::summary::RunSummary;
use crate::templates::{document_title, DocumentRenderer, RenderOptions};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs the pipeline: repository, credential, pull requests, diagram, page.
pub struct Runner {
    config: RunnerConfig,
    renderer: DocumentRenderer,
    opener: Arc<dyn BrowserOpener>,
    clock: Arc<dyn Clock>,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Template`] if the page template fails to compile.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let renderer = DocumentRenderer::new(RenderOptions {
            zoom: config.zoom(),
            ..RenderOptions::default()
        })?;
        Ok(Self {
            config,
            renderer,
            opener: Arc::new(SystemBrowser),
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the browser opener.
    #[must_use]
    pub fn with_opener(mut self, opener: Arc<dyn BrowserOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Replaces the clock driving device flow polling.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration this runner was built with.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Executes a full run with the configured source.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] from whichever stage fails first.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        match self.config.source() {
            Source::Api => {
                let remote =
                    resolve_remote(self.config.remote(), self.config.working_dir()).await?;
                self.run_for_remote(&remote).await
            }
            Source::GhCli => {
                let repository = gh::repository_name(self.config.working_dir()).await?;
                let change_requests = gh::list_pull_requests(self.config.working_dir()).await?;
                self.publish(&repository, &change_requests)
            }
        }
    }

    /// Executes the API pipeline for an already resolved repository.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] from whichever stage fails first.
    pub async fn run_for_remote(
        &self,
        remote: &RemoteDescriptor,
    ) -> Result<RunSummary, RunnerError> {
        info!(repository = %remote, "Generating pull request graph");

        let credential = self.credential_provider()?.obtain().await?;
        let octocrab = build_client(self.config.api_base(), &credential.token)?;
        let change_requests =
            fetch_open_pull_requests(&octocrab, remote, self.config.per_page()).await?;

        self.publish(&remote.repo_name, &change_requests)
    }

    fn credential_provider(&self) -> Result<CredentialProvider, RunnerError> {
        let device_flow = DeviceFlow::new(
            self.config.device_code_url(),
            self.config.token_url(),
            Arc::clone(&self.clock),
        )?;
        Ok(CredentialProvider::new(
            TokenCache::new(self.config.cache_path()),
            device_flow,
            self.config.api_base(),
            self.config.client_id(),
            self.config.scope(),
        ))
    }

    fn publish(
        &self,
        repository: &str,
        change_requests: &[ChangeRequest],
    ) -> Result<RunSummary, RunnerError> {
        let diagram = build_diagram(change_requests, &self.config.diagram());
        debug!(%diagram, "Built diagram");

        let document = self
            .renderer
            .render_document(&document_title(repository), &diagram)?;

        let opener = self
            .config
            .open_browser()
            .then(|| Arc::clone(&self.opener));
        let outcome = Launcher::new(self.config.output_path(), opener).launch(&document)?;

        Ok(RunSummary::new(repository, change_requests, outcome))
    }
}
