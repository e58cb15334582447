// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub mock: MockConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Mock workspace configuration
///
/// `workdir` holds both the endpoint list and the responses directory.
#[derive(Debug, Deserialize, Clone)]
pub struct MockConfig {
    pub workdir: String,
    /// Endpoint list file name, relative to `workdir`
    pub endpoints: String,
    /// Responses directory name, relative to `workdir`
    pub responses_dir_name: String,
}

/// Which store backs fixtures and the last-request snapshot
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackendKind {
    FileStorage,
    Redis,
}

/// Storage configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    pub redis: RedisConfig,
}

/// Redis connection parameters
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
}

impl RedisConfig {
    /// Connection URL in the form understood by `redis::Client::open`
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Content-Type used when a fixture does not declare one
    pub default_content_type: String,
    pub server_name: String,
    pub max_body_size: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            default_content_type: "application/json".to_string(),
            server_name: "fixture-mock/0.1".to_string(),
            max_body_size: 10_485_760,
        }
    }
}

impl Config {
    /// Path of the JSON endpoint list
    pub fn endpoints_file(&self) -> PathBuf {
        Path::new(&self.mock.workdir).join(&self.mock.endpoints)
    }

    /// Root under which every storage key lives
    ///
    /// Redis keys are relative (`users/42/get.json`), so the root is empty there.
    pub fn responses_root(&self) -> String {
        match self.storage.backend {
            StorageBackendKind::FileStorage => Path::new(&self.mock.workdir)
                .join(&self.mock.responses_dir_name)
                .to_string_lossy()
                .into_owned(),
            StorageBackendKind::Redis => String::new(),
        }
    }
}
