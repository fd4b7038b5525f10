//! src/config.rs
//! ============================================================================
//! # Config: Server Configuration Loader
//!
//! Settings are read once at startup and handed to the router and the
//! statistics reporter as plain values. The listing core never sees `Config`.
//!
//! ## Discovery order
//! 1. `$FILE_EXPLORER_CONFIG`, if set
//! 2. `./server.config.toml`
//! 3. `./server.config.json`
//! 4. `config.toml` in the platform config dir (via
//!    [`directories`](https://docs.rs/directories))
//! 5. built-in defaults
//!
//! `.json` files are parsed with `serde_json` and may use the flat legacy
//! layout (`port`, `apacheURL`, `apachePostURL`); anything else is TOML.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::error::AppError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FILE_EXPLORER_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "server.config.toml";

/// Legacy JSON config looked up after [`LOCAL_CONFIG_FILE`].
pub const LEGACY_CONFIG_FILE: &str = "server.config.json";

/// Language of the labels in formatted listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,

    Ru,
}

/// HTTP listener and static asset settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Directory served at `/` and `/dist/`
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: PathBuf::from("./dist"),
        }
    }
}

/// Statistics collector settings. An empty `base_url` disables reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatsConfig {
    pub base_url: String,

    pub post_path: String,

    /// Request timeout for one report
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            post_path: String::new(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl StatsConfig {
    /// Full collector URL, or `None` when reporting is disabled.
    #[must_use]
    pub fn endpoint(&self) -> Option<String> {
        let base: &str = self.base_url.trim();

        if base.is_empty() {
            return None;
        }

        Some(format!("{base}{}", self.post_path.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub locale: Locale,
}

/// Log sink settings consumed by [`crate::logging::Logger`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,

    pub file_prefix: String,

    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./logs"),
            file_prefix: "explorer".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Flat JSON layout of older deployments.
#[derive(Debug, Deserialize)]
struct LegacyJsonConfig {
    port: PortValue,

    #[serde(rename = "apacheURL", default)]
    apache_url: String,

    #[serde(rename = "apachePostURL", default)]
    apache_post_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    fn into_port(self) -> Result<u16, AppError> {
        match self {
            Self::Number(port) => Ok(port),

            Self::Text(text) => text
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::invalid_input("port", e.to_string())),
        }
    }
}

impl Config {
    /// Discovers and loads the config file, falling back to defaults.
    ///
    /// Returns the path that was read, if any.
    pub async fn load() -> Result<(Self, Option<PathBuf>), AppError> {
        let Some(path) = Self::discover() else {
            info!("No config file found, using default configuration");

            return Ok((Self::default(), None));
        };

        let cfg: Self = Self::load_from(&path).await?;

        Ok((cfg, Some(path)))
    }

    /// Loads config from an explicit file.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        info!("Loading config from {}", path.display());

        let text: String = TokioFs::read_to_string(path)
            .await
            .map_err(|source| AppError::ConfigIo {
                path: path.to_path_buf(),
                source,
            })?;

        let is_json: bool = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(text)?)
    }

    /// Accepts either the nested layout or the legacy flat one.
    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        let value: serde_json::Value = serde_json::from_str(text)?;

        let is_nested: bool = ["server", "stats", "display", "logging"]
            .iter()
            .any(|key| value.get(key).is_some());

        if is_nested {
            return Ok(serde_json::from_value(value)?);
        }

        let legacy: LegacyJsonConfig = serde_json::from_value(value)?;

        Ok(Self {
            server: ServerConfig {
                port: legacy.port.into_port()?,
                ..ServerConfig::default()
            },
            stats: StatsConfig {
                base_url: legacy.apache_url,
                post_path: legacy.apache_post_url,
                ..StatsConfig::default()
            },
            ..Self::default()
        })
    }

    fn discover() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(explicit));
        }

        Self::discover_local(Path::new("."))
            .or_else(|| Self::config_path().filter(|path| path.is_file()))
    }

    /// First of the working-directory config files present in `dir`.
    fn discover_local(dir: &Path) -> Option<PathBuf> {
        [LOCAL_CONFIG_FILE, LEGACY_CONFIG_FILE]
            .into_iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Returns the platform config file path using `directories::ProjectDirs`.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "example", "FileExplorer")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_sections_fill_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [server]
            port = 9001

            [stats]
            base_url = "http://localhost:80"
            post_path = "/statPost.php"
            timeout = "2s"

            [display]
            locale = "ru"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.stats.timeout, Duration::from_secs(2));
        assert_eq!(cfg.display.locale, Locale::Ru);
        assert_eq!(cfg.logging, LoggingConfig::default());
        assert_eq!(
            cfg.stats.endpoint().as_deref(),
            Some("http://localhost:80/statPost.php")
        );
    }

    #[test]
    fn test_legacy_json_layout() {
        let cfg = Config::from_json_str(
            r#"{"port": "8085", "apacheURL": "http://localhost", "apachePostURL": "/statPost.php"}"#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 8085);
        assert_eq!(cfg.stats.base_url, "http://localhost");
        assert_eq!(cfg.stats.post_path, "/statPost.php");
    }

    #[test]
    fn test_legacy_json_rejects_bad_port() {
        let err = Config::from_json_str(r#"{"port": "http"}"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[test]
    fn test_nested_json_layout() {
        let cfg = Config::from_json_str(r#"{"server": {"port": 7000}}"#).unwrap();
        assert_eq!(cfg.server.port, 7000);
        assert!(cfg.stats.endpoint().is_none());
    }

    #[tokio::test]
    async fn test_load_from_missing_file() {
        let err = Config::load_from(Path::new("/definitely/not/here.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigIo { .. }));
    }

    #[tokio::test]
    async fn test_load_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("server.config.json");
        tokio::fs::write(&path, r#"{"port": 8181}"#).await.unwrap();

        let cfg = Config::load_from(&path).await.unwrap();
        assert_eq!(cfg.server.port, 8181);
    }

    #[tokio::test]
    async fn test_discovers_legacy_json_in_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        tokio::fs::write(
            dir.path().join(LEGACY_CONFIG_FILE),
            r#"{"port":"9999","apacheURL":"http://localhost","apachePostURL":"/statPost.php"}"#,
        )
        .await
        .unwrap();

        let path = Config::discover_local(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(LEGACY_CONFIG_FILE));

        let cfg = Config::load_from(&path).await.unwrap();
        assert_eq!(cfg.server.port, 9999);
        assert_eq!(
            cfg.stats.endpoint().as_deref(),
            Some("http://localhost/statPost.php")
        );
    }

    #[test]
    fn test_toml_wins_over_legacy_json() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(LEGACY_CONFIG_FILE), r#"{"port": 1}"#).unwrap();
        std::fs::write(dir.path().join(LOCAL_CONFIG_FILE), "[server]\nport = 2\n").unwrap();

        assert_eq!(
            Config::discover_local(dir.path()),
            Some(dir.path().join(LOCAL_CONFIG_FILE))
        );
    }

    #[test]
    fn test_empty_working_dir_discovers_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(Config::discover_local(dir.path()).is_none());
    }
}
