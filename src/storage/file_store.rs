// File-backed store
// Each key is a file path holding one JSON document

use super::{ResponseStore, StorageError, StorageKey};
use serde_json::Value;
use std::io::ErrorKind;

#[derive(Debug, Default)]
pub struct FileStore;

impl FileStore {
    pub const fn new() -> Self {
        Self
    }
}

impl ResponseStore for FileStore {
    fn get(&self, key: &StorageKey) -> Result<Option<Value>, StorageError> {
        let content = match std::fs::read(key.as_str()) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    key: key.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.clone(),
                source,
            })
    }

    fn set(&self, key: &StorageKey, value: &Value) -> Result<(), StorageError> {
        // Serializing a Value cannot fail
        let data = serde_json::to_vec(value).unwrap_or_default();
        // Parent directories are not created: a missing one is a write error
        std::fs::write(key.as_str(), data).map_err(|source| StorageError::Io {
            key: key.clone(),
            source,
        })
    }

    fn name(&self) -> &'static str {
        "file_storage"
    }
}
