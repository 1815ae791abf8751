use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::{Result, ScreeningError};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_LOG_FILTER: &str = "aq_screen=info,tower_http=info";

/// Main configuration structure loaded from aq_screen.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Listen address of the HTTP service
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
        }
    }
}

/// Locations of the trained classifier and the categorical encoders
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub model_path: PathBuf,
    pub encoders_path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("best_model.json"),
            encoders_path: PathBuf::from("encoders.json"),
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_filter: String,
    /// Config file that was looked for but not found; defaults were used.
    /// Reported by the binaries once tracing is up.
    pub missing_config_file: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            missing_config_file: None,
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            log_filter: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            missing_config_file: None,
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses AQ_SCREEN_CONFIG environment variable or defaults to "aq_screen.toml"
    pub fn load() -> Result<Self> {
        if let Ok(env_path) = std::env::var("AQ_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::dotenv();
        }

        let config_path =
            std::env::var("AQ_SCREEN_CONFIG").unwrap_or_else(|_| "aq_screen.toml".to_string());

        let mut config = Self::from_file(Path::new(&config_path))?;
        let missing_config_file = config.runtime.missing_config_file.take();

        config.apply_env_overrides()?;
        config.runtime = RuntimeConfig {
            missing_config_file,
            ..RuntimeConfig::load_from_env()
        };

        Ok(config)
    }

    /// Read a TOML config file. A missing file yields defaults and is
    /// recorded in `runtime.missing_config_file`.
    pub fn from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(_) => {
                let mut config = Self::default();
                config.runtime.missing_config_file = Some(path.to_path_buf());
                Ok(config)
            }
        }
    }

    /// Warn about start-up fallbacks; call after tracing is initialised
    pub fn log_fallbacks(&self) {
        if let Some(path) = &self.runtime.missing_config_file {
            tracing::warn!("Config file {} not found, using defaults", path.display());
        }
    }

    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply env-first overrides (PORT, AQ_HOST, AQ_MODEL_PATH, AQ_ENCODERS_PATH)
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = parse_port(&port)?;
            tracing::debug!("PORT env override applied");
        }
        if let Ok(host) = std::env::var("AQ_HOST") {
            self.server.host = host.trim().parse().map_err(|e| ScreeningError::Config {
                message: format!("AQ_HOST '{host}' is not an IP address: {e}"),
            })?;
        }
        if let Ok(path) = std::env::var("AQ_MODEL_PATH") {
            self.artifacts.model_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("AQ_ENCODERS_PATH") {
            self.artifacts.encoders_path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim().parse::<u16>().map_err(|e| ScreeningError::Config {
        message: format!("PORT '{raw}' is not a valid port number: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bind_all_interfaces_on_5000() {
        let config = Config::default();
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:5000");
        assert_eq!(config.artifacts.model_path, PathBuf::from("best_model.json"));
        assert_eq!(config.artifacts.encoders_path, PathBuf::from("encoders.json"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [artifacts]
            model_path = "models/forest.json"
            encoders_path = "models/encoders.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.artifacts.model_path,
            PathBuf::from("models/forest.json")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("[server]\nport = \"abc\"").unwrap_err();
        assert!(matches!(err, ScreeningError::Config { .. }));
    }

    #[test]
    fn test_missing_file_is_recorded_for_later_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.runtime.missing_config_file, Some(path));
        assert_eq!(config.server.port, 5000);

        let present = dir.path().join("aq_screen.toml");
        std::fs::write(&present, "[server]\nport = 8081\n").unwrap();
        let config = Config::from_file(&present).unwrap();
        assert!(config.runtime.missing_config_file.is_none());
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert_eq!(parse_port(" 5001 ").unwrap(), 5001);
        assert!(parse_port("http").is_err());
        assert!(parse_port("70000").is_err());
    }
}
