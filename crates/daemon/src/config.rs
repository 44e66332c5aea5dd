//! Configuration management for the Dockhand daemon.
//!
//! This module provides TOML-based configuration file loading and saving.
//! The default configuration path is `~/.config/dockhand/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("server.port must not be 0")]
    InvalidPort,

    #[error("session.max_sessions must be between 1 and 1000, got {0}")]
    InvalidMaxSessions(usize),

    #[error("session terminal size must be non-zero, got {0}x{1}")]
    InvalidTerminalSize(u16, u16),

    #[error("session.shell must not be empty")]
    EmptyShell,

    #[error("engine.binary must not be empty when set")]
    EmptyEngineBinary,

    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for the Dockhand daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// General daemon configuration.
    pub daemon: DaemonConfig,

    /// HTTP/WebSocket server configuration.
    pub server: ServerConfig,

    /// Container engine configuration.
    pub engine: EngineConfig,

    /// Session management configuration.
    pub session: SessionConfig,
}

/// General daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DaemonConfig {
    /// Directory for storing daemon data (logs, state).
    pub data_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Also write logs to a daily-rolling file under `data_dir/logs`.
    pub log_to_file: bool,
}

/// HTTP/WebSocket server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the server on.
    pub bind_addr: String,

    /// Port to listen on.
    pub port: u16,
}

/// Container engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine CLI binary. When unset, `docker` then `podman` are probed on
    /// the PATH.
    pub binary: Option<String>,
}

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Shell launched inside the container for interactive sessions.
    pub shell: String,

    /// Initial terminal columns for interactive sessions.
    pub cols: u16,

    /// Initial terminal rows for interactive sessions.
    pub rows: u16,

    /// Maximum number of concurrent sessions.
    pub max_sessions: usize,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
            cols: 80,
            rows: 24,
            max_sessions: 10,
        }
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dockhand")
        .join("config.toml")
}

/// Returns the default data directory path.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dockhand")
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - DOCKHAND_LOG_LEVEL: Override log level (trace, debug, info, warn, error)
    /// - DOCKHAND_PORT: Override the listen port
    /// - DOCKHAND_ENGINE: Override the engine binary
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("DOCKHAND_LOG_LEVEL") {
            if !level.is_empty() {
                tracing::info!("Overriding log_level from environment: {}", level);
                self.daemon.log_level = level;
            }
        }

        if let Ok(port) = std::env::var("DOCKHAND_PORT") {
            match port.parse::<u16>() {
                Ok(port) if port != 0 => {
                    tracing::info!("Overriding server port from environment: {}", port);
                    self.server.port = port;
                }
                _ => {
                    tracing::warn!("Ignoring invalid DOCKHAND_PORT value: {}", port);
                }
            }
        }

        if let Ok(binary) = std::env::var("DOCKHAND_ENGINE") {
            if !binary.is_empty() {
                tracing::info!("Overriding engine binary from environment: {}", binary);
                self.engine.binary = Some(binary);
            }
        }
    }

    /// Validate the configuration values.
    ///
    /// Returns an error if any configuration value is outside the valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if self.session.max_sessions < 1 || self.session.max_sessions > 1000 {
            return Err(ConfigError::InvalidMaxSessions(self.session.max_sessions));
        }

        if self.session.cols == 0 || self.session.rows == 0 {
            return Err(ConfigError::InvalidTerminalSize(
                self.session.cols,
                self.session.rows,
            ));
        }

        if self.session.shell.trim().is_empty() {
            return Err(ConfigError::EmptyShell);
        }

        if let Some(binary) = &self.engine.binary {
            if binary.trim().is_empty() {
                return Err(ConfigError::EmptyEngineBinary);
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.daemon.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.daemon.log_level.clone()));
        }

        Ok(())
    }

    /// Loads configuration from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Loads configuration from the default path, falling back to defaults
    /// when no file exists.
    pub fn load_or_default() -> Result<Self> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to the given path, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory: {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.session.shell, "bash");
        assert_eq!(config.session.cols, 80);
        assert_eq!(config.session.rows, 24);
        assert!(config.engine.binary.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPort));
    }

    #[test]
    fn test_validate_rejects_max_sessions_out_of_range() {
        let mut config = Config::default();
        config.session.max_sessions = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMaxSessions(0))
        );

        config.session.max_sessions = 1001;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMaxSessions(1001))
        );
    }

    #[test]
    fn test_validate_rejects_zero_terminal_size() {
        let mut config = Config::default();
        config.session.cols = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTerminalSize(0, 24))
        );
    }

    #[test]
    fn test_validate_rejects_empty_shell() {
        let mut config = Config::default();
        config.session.shell = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyShell));
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut config = Config::default();
        config.daemon.log_level = "verbose".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel("verbose".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_empty_engine_binary() {
        let mut config = Config::default();
        config.engine.binary = Some(String::new());
        assert_eq!(config.validate(), Err(ConfigError::EmptyEngineBinary));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.port = 8088;
        config.engine.binary = Some("podman".to_string());
        config.session.max_sessions = 42;

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.session.shell, "bash");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server = not toml {").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
