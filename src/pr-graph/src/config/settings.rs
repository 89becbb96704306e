//! Layered user settings.

use super::ConfigError;
use crate::diagram::{Direction, LabelStyle};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Where the pull request list comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Source {
    /// git remote + OAuth device flow + REST API.
    #[default]
    Api,
    /// The `gh` command line tool.
    GhCli,
}

impl FromStr for Source {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "gh" => Ok(Self::GhCli),
            _ => Err(ConfigError::InvalidChoice {
                field: "source",
                value: s.to_string(),
                expected: "api, gh",
            }),
        }
    }
}

impl TryFrom<String> for Source {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Api => "api",
            Self::GhCli => "gh",
        })
    }
}

/// One layer of settings. Unset fields defer to lower layers.
///
/// Parsed from `config.toml` with kebab-case keys, for example:
/// ```toml
/// client-id = "Iv1.0123456789abcdef"
/// output = "dist/index.html"
/// labels = "status"
/// zoom = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Pull request source.
    pub source: Option<Source>,
    /// git remote to read the repository from.
    pub remote: Option<String>,
    /// OAuth app client id.
    pub client_id: Option<String>,
    /// OAuth scope requested by the device flow.
    pub scope: Option<String>,
    /// REST API base URL.
    pub api_base: Option<String>,
    /// Device-authorization endpoint.
    pub device_code_url: Option<String>,
    /// Token endpoint.
    pub token_url: Option<String>,
    /// Credential cache file.
    pub cache_path: Option<PathBuf>,
    /// Generated page location.
    pub output: Option<PathBuf>,
    /// Graph direction.
    pub direction: Option<Direction>,
    /// Edge label style.
    pub labels: Option<LabelStyle>,
    /// Zoom and pan support.
    pub zoom: Option<bool>,
    /// Whether to open the page in a browser.
    pub open: Option<bool>,
    /// Page size for the pull request listing.
    pub per_page: Option<u8>,
}

impl Settings {
    /// Loads settings from a TOML file. A missing file yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file");
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;
        debug!(path = %path.display(), "Loaded settings file");
        Ok(Some(settings))
    }

    /// Loads settings from a file the user asked for explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file does not exist or cannot
    /// be read, and [`ConfigError::TomlError`] if it cannot be parsed.
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        Self::load(path)?.ok_or_else(|| ConfigError::IoError {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "settings file not found"),
        })
    }

    /// Combines two layers; values set in `self` win over `fallback`.
    #[must_use]
    pub fn merge(self, fallback: Self) -> Self {
        Self {
            source: self.source.or(fallback.source),
            remote: self.remote.or(fallback.remote),
            client_id: self.client_id.or(fallback.client_id),
            scope: self.scope.or(fallback.scope),
            api_base: self.api_base.or(fallback.api_base),
            device_code_url: self.device_code_url.or(fallback.device_code_url),
            token_url: self.token_url.or(fallback.token_url),
            cache_path: self.cache_path.or(fallback.cache_path),
            output: self.output.or(fallback.output),
            direction: self.direction.or(fallback.direction),
            labels: self.labels.or(fallback.labels),
            zoom: self.zoom.or(fallback.zoom),
            open: self.open.or(fallback.open),
            per_page: self.per_page.or(fallback.per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn can_load_settings_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
source = "gh"
client-id = "Iv1.file"
api-base = "https://ghe.example.com/api/v3"
output = "out/graph.html"
direction = "rl"
labels = "status"
zoom = false
per-page = 50
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap().unwrap();

        assert_eq!(settings.source, Some(Source::GhCli));
        assert_eq!(settings.client_id.as_deref(), Some("Iv1.file"));
        assert_eq!(
            settings.api_base.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
        assert_eq!(settings.output, Some(PathBuf::from("out/graph.html")));
        assert_eq!(settings.direction, Some(Direction::RightToLeft));
        assert_eq!(settings.labels, Some(LabelStyle::Status));
        assert_eq!(settings.zoom, Some(false));
        assert_eq!(settings.per_page, Some(50));
        assert_eq!(settings.remote, None);
    }

    #[test]
    fn load_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(Settings::load(&temp.path().join("absent.toml")).unwrap(), None);
    }

    #[test]
    fn load_required_rejects_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");

        match Settings::load_required(&path) {
            Err(ConfigError::IoError { path: reported, source }) => {
                assert_eq!(reported, path.display().to_string());
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected IoError, got {other:?}"),
        }
    }

    #[test]
    fn load_required_reads_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "open = false\n").unwrap();

        assert_eq!(Settings::load_required(&path).unwrap().open, Some(false));
    }

    #[test]
    fn load_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "direction = \"diagonal\"\n").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(ConfigError::TomlError { .. })
        ));
    }

    #[test]
    fn merge_prefers_first_layer() {
        let cli = Settings {
            client_id: Some("Iv1.cli".to_string()),
            zoom: Some(false),
            ..Settings::default()
        };
        let file = Settings {
            client_id: Some("Iv1.file".to_string()),
            scope: Some("read:org repo".to_string()),
            zoom: Some(true),
            ..Settings::default()
        };

        let merged = cli.merge(file);

        assert_eq!(merged.client_id.as_deref(), Some("Iv1.cli"));
        assert_eq!(merged.scope.as_deref(), Some("read:org repo"));
        assert_eq!(merged.zoom, Some(false));
        assert_eq!(merged.output, None);
    }

    #[test]
    fn can_parse_source() {
        assert_eq!("API".parse::<Source>().unwrap(), Source::Api);
        assert_eq!("gh".parse::<Source>().unwrap(), Source::GhCli);
        assert!("svn".parse::<Source>().is_err());
    }
}
