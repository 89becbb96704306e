//! Well-known file locations.

use super::ConfigError;
use std::path::PathBuf;

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "PR_GRAPH_CONFIG_DIR";

const APP_DIR: &str = "pr-graph";

/// Returns the directory holding the settings file and credential cache.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDirectory`] if neither the override nor a
/// platform configuration directory is available.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Default credential cache path, `<config dir>/token.json`.
///
/// # Errors
///
/// See [`config_dir`].
pub fn default_cache_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("token.json"))
}

/// Default settings file path, `<config dir>/config.toml`.
///
/// # Errors
///
/// See [`config_dir`].
pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}
