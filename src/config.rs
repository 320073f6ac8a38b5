//! Service configuration, loaded from an optional TOML file.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:5000"
//!
//! [storage]
//! backend = "sqlite"
//! path = "products.db"
//! pool_size = 4
//!
//! [logging]
//! filter = "product_service=debug,info"
//! ```
//!
//! Every field has a default, so an empty file (or no file) is valid.
//! Command-line flags are applied on top with [`AppConfig::override_with`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DATABASE_PATH: &str = "products.db";
pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_STORE_BUFFER: usize = 32;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Errors that can occur during config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Where products live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Store actor holding products in memory; lost on exit.
    #[default]
    Memory,
    /// SQLite database file.
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// SQLite database file, ignored by the memory backend
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    /// SQLite connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Inbox size of the in-memory store actor
    #[serde(default = "default_store_buffer")]
    pub store_buffer: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_database_path(),
            pool_size: default_pool_size(),
            store_buffer: default_store_buffer(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

fn default_store_buffer() -> usize {
    DEFAULT_STORE_BUFFER
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl AppConfig {
    /// Reads the file at `path`, or returns the defaults when no path is given.
    /// A path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies command-line overrides. `None` keeps the file value.
    pub fn override_with(mut self, bind: Option<String>, backend: Option<StorageBackend>) -> Self {
        if let Some(bind) = bind {
            self.server.bind = bind;
        }
        if let Some(backend) = backend {
            self.storage.backend = backend;
        }
        self
    }
}
