//! Configuration module for COBBS.

use serde::Deserialize;
use std::path::Path;

use crate::{CobbsError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/community.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Upload handling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory where uploaded files are stored.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    /// Allowed file extensions (compared case-insensitively).
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Maximum upload size in megabytes. No limit when absent.
    #[serde(default)]
    pub max_upload_size_mb: Option<u64>,
}

fn default_upload_dir() -> String {
    "data/uploads".to_string()
}

fn default_allowed_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "webp", "pdf"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            allowed_extensions: default_allowed_extensions(),
            max_upload_size_mb: None,
        }
    }
}

impl UploadsConfig {
    /// Maximum upload size in bytes, if configured.
    pub fn max_upload_size_bytes(&self) -> Option<u64> {
        self.max_upload_size_mb.map(|mb| mb * 1024 * 1024)
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session time-to-live in seconds.
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
    /// Secret used by the cookie layer. Generated at startup when absent.
    #[serde(default)]
    pub secret: Option<String>,
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
            secret: None,
        }
    }
}

impl SessionConfig {
    /// Return the configured secret, generating a random one when absent.
    pub fn resolve_secret(&self) -> String {
        match &self.secret {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => {
                let generated = format!(
                    "{}{}",
                    uuid::Uuid::new_v4().simple(),
                    uuid::Uuid::new_v4().simple()
                );
                tracing::warn!("No session secret configured; generated a random one");
                generated
            }
        }
    }
}

/// Board information configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Name of the community board.
    #[serde(default = "default_board_name")]
    pub name: String,
    /// Description of the community board.
    #[serde(default = "default_board_description")]
    pub description: String,
}

fn default_board_name() -> String {
    "COBBS - Community Board".to_string()
}

fn default_board_description() -> String {
    "Lost & found, complaints and help requests".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: default_board_name(),
            description: default_board_description(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/cobbs.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload handling configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Board information.
    #[serde(default)]
    pub board: BoardConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CobbsError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CobbsError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `COBBS_SESSION_SECRET`: Override the session secret
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("COBBS_SESSION_SECRET") {
            if !secret.is_empty() {
                self.session.secret = Some(secret);
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.uploads.allowed_extensions.is_empty() {
            return Err(CobbsError::Config(
                "uploads.allowed_extensions must not be empty".to_string(),
            ));
        }
        if self.uploads.max_upload_size_mb == Some(0) {
            return Err(CobbsError::Config(
                "uploads.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        if self.session.ttl_secs == 0 {
            return Err(CobbsError::Config(
                "session.ttl_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
