//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::APP_CONFIG_DIR;
use crate::session::SessionLimits;

/// Locations of the trained model artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Fitted scaler artifact
    pub scaler: PathBuf,
    /// Fitted classifier artifact
    pub model: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            scaler: PathBuf::from("artifacts/scaler.json"),
            model: PathBuf::from("artifacts/wine_model.json"),
        }
    }
}

/// Web server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// Session lifetime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds of inactivity before a session and its wine list are dropped
    pub idle_timeout_secs: u64,
    /// Maximum number of concurrent sessions
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let limits = SessionLimits::default();
        Self {
            idle_timeout_secs: limits.idle_timeout.as_secs(),
            max_sessions: limits.max_sessions,
        }
    }
}

impl SessionConfig {
    /// Converts to the limits used by the session store.
    pub fn limits(&self) -> SessionLimits {
        SessionLimits {
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            max_sessions: self.max_sessions,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/WineQualityChecker/config.toml`
/// - macOS: `~/Library/Application Support/WineQualityChecker/config.toml`
/// - Windows: `%APPDATA%\WineQualityChecker\config.toml`
///
/// Missing sections and keys fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model artifact paths
    pub paths: PathConfig,
    /// Web server settings
    pub server: ServerConfig,
    /// Session settings
    pub session: SessionConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_CONFIG_DIR);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from a specific file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a specific file, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, content).context(format!(
            "Failed to write config file: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Artifact paths are checked when the model is loaded, not here.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be between 1 and 65535");
        }

        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host cannot be empty");
        }

        if self.session.idle_timeout_secs == 0 {
            anyhow::bail!("session.idle_timeout_secs must be at least 1");
        }

        if self.session.max_sessions == 0 {
            anyhow::bail!("session.max_sessions must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.paths.scaler, PathBuf::from("artifacts/scaler.json"));
        assert_eq!(config.paths.model, PathBuf::from("artifacts/wine_model.json"));
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.session.max_sessions, 1024);
    }

    #[test]
    fn test_config_validate() {
        assert!(Config::new().validate().is_ok());

        let mut config = Config::new();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.session.max_sessions = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.session.idle_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.server.port = 9000;
        config.paths.model = PathBuf::from("/opt/models/wine.json");
        config.session.idle_timeout_secs = 120;

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.paths, PathConfig::default());
    }

    #[test]
    fn test_config_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[session]\nmax_sessions = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_session_limits() {
        let limits = SessionConfig {
            idle_timeout_secs: 30,
            max_sessions: 5,
        }
        .limits();
        assert_eq!(limits.idle_timeout, Duration::from_secs(30));
        assert_eq!(limits.max_sessions, 5);
    }
}
