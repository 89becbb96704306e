#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod auth;
pub mod client;
pub mod command;
pub mod config;
pub mod diagram;
pub mod gh;
pub mod launcher;
pub mod pull_requests;
pub mod remote;
pub mod runner;
pub mod summary;
pub mod templates;

pub use auth::{AuthError, Clock, Credential, CredentialProvider, DeviceFlow, TokenCache};
pub use client::{build_client, ClientError};
pub use command::CommandError;
pub use config::{ConfigError, Settings, Source};
pub use diagram::{build_diagram, sanitize_label, DiagramOptions, Direction, LabelStyle};
pub use launcher::{BrowserOpener, LaunchError, LaunchOutcome, Launcher};
pub use pull_requests::{fetch_open_pull_requests, ApiError, ChangeRequest};
pub use remote::{parse_remote_url, resolve_remote, RemoteDescriptor, ResolutionError};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::RunSummary;
pub use templates::{document_title, DocumentRenderer, RenderOptions, TemplateError};
