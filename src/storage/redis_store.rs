// Redis-backed store
// Values are stored as JSON bytes under the storage key

use super::{ResponseStore, StorageError, StorageKey};
use crate::config::RedisConfig;
use redis::Commands;
use serde_json::Value;

pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    /// Create the client; connections are opened lazily, one per call
    pub fn open(config: &RedisConfig) -> Result<Self, StorageError> {
        let client = redis::Client::open(config.url()).map_err(StorageError::Connect)?;
        Ok(Self { client })
    }

    fn connection(&self, key: &StorageKey) -> Result<redis::Connection, StorageError> {
        self.client
            .get_connection()
            .map_err(|source| StorageError::Redis {
                key: key.clone(),
                source,
            })
    }
}

impl ResponseStore for RedisStore {
    fn get(&self, key: &StorageKey) -> Result<Option<Value>, StorageError> {
        let mut conn = self.connection(key)?;
        let data: Option<Vec<u8>> =
            conn.get(key.as_str())
                .map_err(|source| StorageError::Redis {
                    key: key.clone(),
                    source,
                })?;
        data.map(|bytes| decode(key, &bytes)).transpose()
    }

    fn set(&self, key: &StorageKey, value: &Value) -> Result<(), StorageError> {
        let mut conn = self.connection(key)?;
        conn.set::<_, _, ()>(key.as_str(), encode(value))
            .map_err(|source| StorageError::Redis {
                key: key.clone(),
                source,
            })
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

fn encode(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

fn decode(key: &StorageKey, bytes: &[u8]) -> Result<Value, StorageError> {
    serde_json::from_slice(bytes).map_err(|source| StorageError::Json {
        key: key.clone(),
        source,
    })
}
