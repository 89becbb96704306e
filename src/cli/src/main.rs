//! CLI for pr-graph.
//!
//! Draws the open pull requests of the current repository as a branch graph
//! and opens it in the browser.

use clap::Parser;
use pr_graph::config::{default_settings_path, Settings, Source};
use pr_graph::{Direction, LabelStyle, RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// pr-graph - Render open pull requests as an interactive branch graph.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where to read pull requests from: `api` or `gh`.
    #[arg(long)]
    source: Option<Source>,

    /// git remote naming the repository.
    #[arg(long)]
    remote: Option<String>,

    /// OAuth app client id used for the device flow.
    #[arg(long, env = "PR_GRAPH_CLIENT_ID")]
    client_id: Option<String>,

    /// OAuth scope requested by the device flow.
    #[arg(long)]
    scope: Option<String>,

    /// REST API base URL (for GitHub Enterprise).
    #[arg(long, env = "PR_GRAPH_API_BASE")]
    api_base: Option<String>,

    /// Credential cache file.
    #[arg(long)]
    cache_path: Option<PathBuf>,

    /// Output page path.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Graph direction: `lr` or `rl`.
    #[arg(long)]
    direction: Option<Direction>,

    /// Edge labels: `number` or `status`.
    #[arg(long)]
    labels: Option<LabelStyle>,

    /// Render a static diagram without zoom and pan.
    #[arg(long)]
    no_zoom: bool,

    /// Write the page without opening a browser.
    #[arg(long)]
    no_open: bool,

    /// Path to the settings file.
    #[arg(long, env = "PR_GRAPH_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    /// Command line layer of the settings.
    fn to_settings(&self) -> Settings {
        Settings {
            source: self.source,
            remote: self.remote.clone(),
            client_id: self.client_id.clone(),
            scope: self.scope.clone(),
            api_base: self.api_base.clone(),
            cache_path: self.cache_path.clone(),
            output: self.output.clone(),
            direction: self.direction,
            labels: self.labels,
            zoom: self.no_zoom.then_some(false),
            open: self.no_open.then_some(false),
            ..Settings::default()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // Both ring and aws-lc-rs are linked; rustls needs one chosen process-wide.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to generate pull request graph");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Logs go to stderr in compact form; `RUST_LOG` overrides the default
/// `info` level.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let file_settings = load_settings_file(args.config.clone())?;
    let settings = args.to_settings().merge(file_settings);

    let runner = Runner::new(RunnerConfig::from_settings(settings)?)?;
    runner.run().await
}

/// Loads the settings file. An explicitly named file must exist; the
/// default one is optional.
fn load_settings_file(explicit: Option<PathBuf>) -> Result<Settings, RunnerError> {
    if let Some(path) = explicit {
        return Ok(Settings::load_required(&path)?);
    }

    match default_settings_path() {
        Ok(path) => Ok(Settings::load(&path)?.unwrap_or_default()),
        Err(e) => {
            debug!(error = %e, "No configuration directory, using defaults");
            Ok(Settings::default())
        }
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Repository: {}", summary.repository);
    println!(
        "  Open pull requests: {} ({} draft)",
        summary.change_requests, summary.drafts
    );
    println!("  Output: {}", summary.output_path.display());
    if summary.browser_opened {
        println!("  Opened: {}", summary.url);
    } else {
        println!("  Open manually: {}", summary.url);
    }
}
