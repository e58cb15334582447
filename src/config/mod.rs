// Configuration module entry point
// Manages application configuration, runtime state, and the endpoint list

mod endpoints;
mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use endpoints::load_endpoints;
pub use state::AppState;
pub use types::{Config, HttpConfig, RedisConfig, StorageBackendKind, StorageConfig};

/// Flat variables understood by earlier deployments of the mock, mapped to config keys
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("MOCK_PORT", "server.port"),
    ("MOCK_WORKDIR", "mock.workdir"),
    ("MOCK_ENDPOINTS", "mock.endpoints"),
    ("MOCK_RESPONSES_DIR_NAME", "mock.responses_dir_name"),
    ("RESPONSES_REPOSITORY", "storage.backend"),
    ("REDIS_HOST", "storage.redis.host"),
    ("REDIS_PORT", "storage.redis.port"),
    ("REDIS_DB", "storage.redis.db"),
];

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "mock.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_path, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::load_from`] with legacy variables read through `lookup`
    pub fn load_with_env(
        config_path: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("MOCK").prefix_separator("__").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("mock.workdir", ".")?
            .set_default("mock.endpoints", "endpoints.json")?
            .set_default("mock.responses_dir_name", "responses")?
            .set_default("storage.backend", "file_storage")?
            .set_default("storage.redis.host", "localhost")?
            .set_default("storage.redis.port", 6379)?
            .set_default("storage.redis.db", 0)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.default_content_type", "application/json")?
            .set_default("http.server_name", "fixture-mock/0.1")?
            .set_default("http.max_body_size", 10_485_760)?; // 10MB

        for (var, key) in LEGACY_ENV_KEYS {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::load_with_env("does-not-exist", no_env).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.mock.endpoints, "endpoints.json");
        assert_eq!(cfg.storage.backend, StorageBackendKind::FileStorage);
        assert_eq!(cfg.storage.redis.url(), "redis://localhost:6379/0");
        assert_eq!(cfg.http.default_content_type, "application/json");
        assert_eq!(cfg.responses_root(), "./responses");
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9090\n\n[mock]\nworkdir = \"/srv/mock\"\n",
        )
        .unwrap();

        let base = dir.path().join("mock");
        let cfg = Config::load_with_env(base.to_str().unwrap(), no_env).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.endpoints_file().to_str(), Some("/srv/mock/endpoints.json"));
        assert_eq!(cfg.responses_root(), "/srv/mock/responses");
    }

    #[test]
    fn test_legacy_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MOCK_PORT", "5000"),
            ("MOCK_WORKDIR", "/work"),
            ("MOCK_RESPONSES_DIR_NAME", "fixtures"),
            ("RESPONSES_REPOSITORY", "redis"),
            ("REDIS_HOST", "cache"),
            ("REDIS_DB", "3"),
        ]
        .into_iter()
        .collect();

        let cfg = Config::load_with_env("does-not-exist", |name| {
            env.get(name).map(ToString::to_string)
        })
        .unwrap();

        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.mock.workdir, "/work");
        assert_eq!(cfg.storage.backend, StorageBackendKind::Redis);
        assert_eq!(cfg.storage.redis.url(), "redis://cache:6379/3");
        // Redis keys are relative to the store, not the workdir
        assert_eq!(cfg.responses_root(), "");
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = Config::load_with_env("does-not-exist", |name| {
            (name == "RESPONSES_REPOSITORY").then(|| "memcached".to_string())
        });
        assert!(result.is_err());
    }
}
