// Request capture
// Snapshot of the latest request, kept in a single storage slot

use super::MockMethod;
use crate::logger;
use crate::storage::{ResponseStore, StorageKey};
use hyper::header::{HeaderMap, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Serializable view of one inbound request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSnapshot {
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub args: BTreeMap<String, String>,
    /// Endpoint template the request was routed to
    pub endpoint: String,
    pub method: MockMethod,
}

impl RequestSnapshot {
    pub fn new(
        headers: &HeaderMap,
        query: Option<&str>,
        body: &[u8],
        endpoint: &str,
        method: MockMethod,
    ) -> Self {
        Self {
            headers: collapse_headers(headers),
            body: decode_body(headers, body),
            args: parse_args(query),
            endpoint: endpoint.to_string(),
            method,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Persist `snapshot` as the last request
///
/// Failures are logged and swallowed; they never affect the response.
/// Concurrent requests race on the slot and the last writer wins.
pub fn capture(store: &dyn ResponseStore, root: &str, snapshot: &RequestSnapshot) {
    let key = StorageKey::last_request(root);
    if let Err(e) = store.set(&key, &snapshot.to_value()) {
        logger::log_warning(&format!("Failed to save last request: {e}"));
    }
}

/// Repeated headers are joined with ", "
fn collapse_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    out
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

/// JSON bodies are kept structured, anything else as text; empty bodies are absent
fn decode_body(headers: &HeaderMap, body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    if is_json(headers) {
        if let Ok(value) = serde_json::from_slice(body) {
            return Some(value);
        }
        logger::log_warning("Request declared JSON but the body does not parse; keeping it as text");
    }
    Some(Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// First value wins for repeated names
fn parse_args(query: Option<&str>) -> BTreeMap<String, String> {
    let mut args = BTreeMap::new();
    for (name, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        args.entry(name.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    args
}
