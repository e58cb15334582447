//! Response storage module
//!
//! Key/value persistence behind fixtures and the last-request snapshot.
//! Two backends are provided:
//! - `FileStore`: one JSON file per key, the key being the file path
//! - `RedisStore`: one JSON blob per key in a Redis database
//!
//! The backend is chosen once at startup and shared by every request handler.

mod file_store;
mod key;
mod redis_store;

pub use file_store::FileStore;
pub use key::StorageKey;
pub use redis_store::RedisStore;

use crate::config::{StorageBackendKind, StorageConfig};
use serde_json::Value;
use std::sync::Arc;

/// Storage failure. A missing key is never an error, see [`ResponseStore::get`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {key}: {source}")]
    Io {
        key: StorageKey,
        source: std::io::Error,
    },
    #[error("invalid JSON at {key}: {source}")]
    Json {
        key: StorageKey,
        source: serde_json::Error,
    },
    #[error("redis error on {key}: {source}")]
    Redis {
        key: StorageKey,
        source: redis::RedisError,
    },
    #[error("cannot connect to redis: {0}")]
    Connect(redis::RedisError),
}

/// Blocking key/value store shared by all request handlers
///
/// Each call is independently thread-safe; there is no atomicity across calls.
pub trait ResponseStore: Send + Sync {
    /// Fetch the value at `key`, `Ok(None)` when nothing is stored there
    fn get(&self, key: &StorageKey) -> Result<Option<Value>, StorageError>;

    /// Store `value` at `key`, replacing any previous value
    fn set(&self, key: &StorageKey, value: &Value) -> Result<(), StorageError>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Build the configured backend
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn ResponseStore>, StorageError> {
    match config.backend {
        StorageBackendKind::FileStorage => Ok(Arc::new(FileStore::new())),
        StorageBackendKind::Redis => Ok(Arc::new(RedisStore::open(&config.redis)?)),
    }
}
