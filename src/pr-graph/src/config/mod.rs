//! Configuration loading.
//!
//! Settings are layered: command line, then environment, then the optional
//! `config.toml` in the configuration directory, then the defaults below.

mod error;
mod paths;
mod settings;

pub use error::ConfigError;
pub use paths::{config_dir, default_cache_path, default_settings_path, CONFIG_DIR_ENV};
pub use settings::{Settings, Source};

/// Client id of the published OAuth app used for the device flow.
pub const DEFAULT_CLIENT_ID: &str = "Iv23lisQN8lbBUcUl7yL";

/// OAuth scope requested by default; `repo` is needed for private repositories.
pub const DEFAULT_SCOPE: &str = "repo";

/// REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Device-authorization endpoint.
pub const DEFAULT_DEVICE_CODE_URL: &str = "https://github.com/login/device/code";

/// Token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
