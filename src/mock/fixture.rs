// Response fixtures
// A fixture is `{"body": .., "status_code": .., "headers": {..}}`, every key optional

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Methods a mock endpoint answers, each with its own fixture file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MockMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl MockMethod {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Get => "get.json",
            Self::Post => "post.json",
            Self::Put => "put.json",
            Self::Delete => "delete.json",
            Self::Options => "options.json",
        }
    }
}

impl TryFrom<&hyper::Method> for MockMethod {
    type Error = ();

    fn try_from(method: &hyper::Method) -> Result<Self, Self::Error> {
        match *method {
            hyper::Method::GET => Ok(Self::Get),
            hyper::Method::POST => Ok(Self::Post),
            hyper::Method::PUT => Ok(Self::Put),
            hyper::Method::DELETE => Ok(Self::Delete),
            hyper::Method::OPTIONS => Ok(Self::Options),
            _ => Err(()),
        }
    }
}

/// Response data served for one endpoint and method
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseFixture {
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default, deserialize_with = "header_map")]
    pub headers: BTreeMap<String, String>,
}

impl ResponseFixture {
    /// Interpret a stored value as a fixture
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Default answer to OPTIONS: an open CORS preflight
    pub fn preflight() -> Self {
        Self {
            body: None,
            status_code: Some(200),
            headers: [
                ("Access-Control-Allow-Origin", "*"),
                ("Access-Control-Allow-Methods", "POST, GET, PUT, DELETE, OPTIONS"),
                ("Access-Control-Allow-Headers", "*"),
                ("Access-Control-Max-Age", "86400"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        }
    }

    /// Default answer to every other method without a fixture
    pub fn method_not_allowed() -> Self {
        Self {
            body: Some(json!({"message": "Method not implemented"})),
            status_code: Some(405),
            headers: BTreeMap::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]),
        }
    }
}

/// Header values may be written as numbers or booleans in fixture files
fn header_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(s) => Ok((name, s)),
            Value::Number(n) => Ok((name, n.to_string())),
            Value::Bool(b) => Ok((name, b.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "header {name} must be a string, got {other}"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_file_names() {
        assert_eq!(MockMethod::Get.file_name(), "get.json");
        assert_eq!(MockMethod::Post.file_name(), "post.json");
        assert_eq!(MockMethod::Put.file_name(), "put.json");
        assert_eq!(MockMethod::Delete.file_name(), "delete.json");
        assert_eq!(MockMethod::Options.file_name(), "options.json");
    }

    #[test]
    fn test_method_from_hyper() {
        assert_eq!(MockMethod::try_from(&hyper::Method::PUT), Ok(MockMethod::Put));
        assert!(MockMethod::try_from(&hyper::Method::PATCH).is_err());
        assert!(MockMethod::try_from(&hyper::Method::HEAD).is_err());
    }

    #[test]
    fn test_full_fixture() {
        let fixture = ResponseFixture::from_value(json!({
            "body": {"name": "widget"},
            "status_code": 201,
            "headers": {"X-Count": 3, "X-Flag": true, "Content-Type": "application/json"}
        }))
        .unwrap();
        assert_eq!(fixture.body, Some(json!({"name": "widget"})));
        assert_eq!(fixture.status_code, Some(201));
        assert_eq!(fixture.headers["X-Count"], "3");
        assert_eq!(fixture.headers["X-Flag"], "true");
    }

    #[test]
    fn test_partial_fixture() {
        let fixture = ResponseFixture::from_value(json!({"headers": null})).unwrap();
        assert_eq!(fixture, ResponseFixture::default());
    }

    #[test]
    fn test_malformed_fixture() {
        assert!(ResponseFixture::from_value(json!(["not", "an", "object"])).is_err());
        assert!(ResponseFixture::from_value(json!({"status_code": "ok"})).is_err());
        assert!(ResponseFixture::from_value(json!({"headers": {"X": [1]}})).is_err());
    }

    #[test]
    fn test_defaults() {
        let preflight = ResponseFixture::preflight();
        assert_eq!(preflight.status_code, Some(200));
        assert!(preflight.body.is_none());
        assert_eq!(preflight.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(preflight.headers["Access-Control-Max-Age"], "86400");

        let not_allowed = ResponseFixture::method_not_allowed();
        assert_eq!(not_allowed.status_code, Some(405));
        assert_eq!(
            not_allowed.body,
            Some(json!({"message": "Method not implemented"}))
        );
    }
}
