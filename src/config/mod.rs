//! Configuration management for userbase
//!
//! This module handles loading, parsing, and validating application
//! configuration from YAML files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default token signing secret, used when no secret is configured.
///
/// Deployments must set `auth.secret_key` (or `USERBASE_SECRET_KEY` /
/// `SECRET_KEY`); the default exists only so the service can start in
/// development and is logged as a warning at startup.
pub const DEFAULT_SECRET_KEY: &str = "default_secret_key";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // First, expand environment variables in the YAML string
        let expanded = expand_env_vars(yaml);
        serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from environment variables with prefix USERBASE_
    ///
    /// The bare `PORT` and `SECRET_KEY` variables are honored as fallbacks
    /// so the service keeps the deployment interface of its predecessor.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Server config from env
        if let Ok(host) = std::env::var("USERBASE_SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("USERBASE_SERVER_PORT").or_else(|_| std::env::var("PORT")) {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid port number".to_string()))?;
        }

        // Auth config from env
        if let Ok(secret) =
            std::env::var("USERBASE_SECRET_KEY").or_else(|_| std::env::var("SECRET_KEY"))
        {
            config.auth.secret_key = secret;
        }
        if let Ok(ttl) = std::env::var("USERBASE_TOKEN_TTL_SECS") {
            config.auth.token_ttl_secs = ttl
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid token TTL".to_string()))?;
        }
        if let Ok(secure) = std::env::var("USERBASE_COOKIE_SECURE") {
            config.auth.cookie_secure = secure.parse().unwrap_or(false);
        }

        // Database config from env
        if let Ok(path) = std::env::var("USERBASE_DATABASE_PATH") {
            config.database.path = path;
        }

        // Logging config from env
        if let Ok(level) = std::env::var("USERBASE_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    /// Token signing secret
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Session token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Whether the session cookie carries the Secure flag
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            token_ttl_secs: default_token_ttl(),
            cookie_secure: false,
        }
    }
}

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

fn default_token_ttl() -> u64 {
    3600 // 1 hour
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "userbase.db".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Expand environment variables in a string
///
/// Supports `${VAR_NAME}` syntax
fn expand_env_vars(input: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .expect("Invalid regex pattern for environment variable expansion");

    re.replace_all(input, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
