// Storage key derivation
// Keys are path-like: `<root>/<endpoint path>/<method>.json`

use crate::mock::MockMethod;
use std::fmt;

const LAST_REQUEST_FILE: &str = "last_request.json";

/// Path-like identifier of a fixture slot or of the last-request slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Key of the fixture served for `method` on an already resolved endpoint path
    pub fn fixture(root: &str, endpoint_path: &str, method: MockMethod) -> Self {
        Self(join(&[root, endpoint_path, method.file_name()]))
    }

    /// Key of the single last-request slot
    pub fn last_request(root: &str) -> Self {
        Self(join(&[root, LAST_REQUEST_FILE]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Join path fragments with `/`, skipping empty ones and never doubling separators
fn join(parts: &[&str]) -> String {
    let mut out = String::new();
    for part in parts.iter().filter(|p| !p.is_empty()) {
        if out.is_empty() || out.ends_with('/') {
            out.push_str(part);
        } else {
            out.push('/');
            out.push_str(part.trim_start_matches('/'));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_key() {
        let key = StorageKey::fixture("/srv/responses", "items/42", MockMethod::Get);
        assert_eq!(key.as_str(), "/srv/responses/items/42/get.json");
    }

    #[test]
    fn test_fixture_key_is_deterministic() {
        let a = StorageKey::fixture("responses", "items/42", MockMethod::Delete);
        let b = StorageKey::fixture("responses", "items/42", MockMethod::Delete);
        assert_eq!(a, b);
        assert_ne!(a, StorageKey::fixture("responses", "items/42", MockMethod::Put));
    }

    #[test]
    fn test_empty_root() {
        // Redis keys have no root
        let key = StorageKey::fixture("", "users/7", MockMethod::Options);
        assert_eq!(key.as_str(), "users/7/options.json");
        assert_eq!(StorageKey::last_request("").as_str(), "last_request.json");
    }

    #[test]
    fn test_root_endpoint() {
        let key = StorageKey::fixture("responses", "", MockMethod::Post);
        assert_eq!(key.as_str(), "responses/post.json");
    }

    #[test]
    fn test_trailing_separator() {
        let key = StorageKey::last_request("responses/");
        assert_eq!(key.as_str(), "responses/last_request.json");
    }
}
