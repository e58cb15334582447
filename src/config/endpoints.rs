// Endpoint list loading
// The endpoint list is a JSON array of path templates, read once at startup

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum EndpointsError {
    #[error("failed to read endpoint list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("endpoint list {} is not a JSON array of strings: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read the endpoint templates from `path`
pub fn load_endpoints(path: &Path) -> Result<Vec<String>, EndpointsError> {
    let content = std::fs::read_to_string(path).map_err(|source| EndpointsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| EndpointsError::Json {
        path: path.to_path_buf(),
        source,
    })
}
