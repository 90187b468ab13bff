//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Portal backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Where the signed-in session is persisted between runs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    pub file: Option<String>,
}

impl SessionConfig {
    /// Configured session file, or the per-user default location
    pub fn path(&self) -> PathBuf {
        match &self.file {
            Some(file) => PathBuf::from(file),
            None => default_session_file(),
        }
    }
}

fn default_session_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("edumentor").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./edumentor_session.json"))
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("edumentor").join("config.toml")),
            Some(PathBuf::from("/etc/edumentor/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Gateway overrides
        if let Some(url) = lookup("EDUMENTOR_BACKEND_URL") {
            self.gateway.base_url = url;
        }
        if let Some(timeout) = lookup("EDUMENTOR_REQUEST_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.gateway.request_timeout_secs = secs;
            }
        }

        // Session overrides
        if let Some(file) = lookup("EDUMENTOR_SESSION_FILE") {
            self.session.file = Some(file);
        }

        // Logging overrides
        if let Some(level) = lookup("EDUMENTOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("EDUMENTOR_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Edu-Mentor Portal Configuration
#
# Environment variables override these settings:
# - EDUMENTOR_BACKEND_URL
# - EDUMENTOR_REQUEST_TIMEOUT
# - EDUMENTOR_SESSION_FILE
# - EDUMENTOR_LOG_LEVEL
# - EDUMENTOR_LOG_FORMAT

[gateway]
# Portal backend URL (the /api prefix is added per request)
base_url = "http://localhost:8000"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Where the signed-in session is kept between runs
# file = "~/.local/share/edumentor/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/edumentor/portal.log"
"#
    .to_string()
}
