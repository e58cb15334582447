//! HTTP response building module
//!
//! Provides builders for fixture responses and for the few responses the
//! server produces on its own.

use crate::config::HttpConfig;
use crate::mock::ResponseFixture;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE, SERVER};
use hyper::{Response, StatusCode};
use serde_json::Value;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Build the response for a resolved fixture
///
/// The body is always JSON text: an absent body is sent as `null`.
pub fn build_fixture_response(
    fixture: &ResponseFixture,
    http_config: &HttpConfig,
) -> Response<Full<Bytes>> {
    let payload = serde_json::to_vec(fixture.body.as_ref().unwrap_or(&Value::Null))
        .unwrap_or_else(|_| b"null".to_vec());

    let status = fixture
        .status_code
        .and_then(|code| {
            StatusCode::from_u16(code)
                .map_err(|e| {
                    crate::logger::log_warning(&format!("Invalid fixture status {code}: {e}"));
                })
                .ok()
        })
        .unwrap_or(StatusCode::OK);

    let mut response = Response::new(Full::new(Bytes::from(payload)));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in &fixture.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => crate::logger::log_warning(&format!("Skipping invalid fixture header {name}")),
        }
    }

    if !headers.contains_key(CONTENT_TYPE) {
        if let Ok(value) = HeaderValue::from_str(&http_config.default_content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
    }
    if let Ok(value) = HeaderValue::from_str(&http_config.server_name) {
        headers.entry(SERVER).or_insert(value);
    }

    response
}

/// Build 404 Not Found response for paths outside every endpoint template
pub fn build_404_response() -> Response<Full<Bytes>> {
    let body = r#"{"message": "Not found"}"#;
    Response::builder()
        .status(404)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Build 405 Method Not Allowed response for methods no endpoint answers
pub fn build_405_response() -> Response<Full<Bytes>> {
    let body = r#"{"message": "Method not allowed"}"#;
    Response::builder()
        .status(405)
        .header("Content-Type", "application/json")
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    let body = r#"{"message": "Payload too large"}"#;
    Response::builder()
        .status(413)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_fixture_response() {
        let fixture = ResponseFixture::from_value(json!({
            "body": {"name": "widget"},
            "status_code": 201,
            "headers": {"X-Mock": "yes"}
        }))
        .unwrap();

        let response = build_fixture_response(&fixture, &HttpConfig::default());
        assert_eq!(response.status(), 201);
        assert_eq!(response.headers()["x-mock"], "yes");
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(body_text(response).await, r#"{"name":"widget"}"#);
    }

    #[tokio::test]
    async fn test_absent_body_is_json_null() {
        let response = build_fixture_response(&ResponseFixture::preflight(), &HttpConfig::default());
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_text(response).await, "null");
    }

    #[test]
    fn test_status_defaults_to_ok() {
        let response = build_fixture_response(&ResponseFixture::default(), &HttpConfig::default());
        assert_eq!(response.status(), StatusCode::OK);

        let fixture = ResponseFixture {
            status_code: Some(42),
            ..ResponseFixture::default()
        };
        let response = build_fixture_response(&fixture, &HttpConfig::default());
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_fixture_content_type_wins() {
        let fixture = ResponseFixture {
            headers: [("Content-Type".to_string(), "text/plain".to_string())].into(),
            ..ResponseFixture::default()
        };
        let response = build_fixture_response(&fixture, &HttpConfig::default());
        assert_eq!(response.headers()["content-type"], "text/plain");
    }

    #[test]
    fn test_invalid_header_skipped() {
        let fixture = ResponseFixture {
            headers: [
                ("Bad Header".to_string(), "x".to_string()),
                ("X-Ok".to_string(), "1".to_string()),
            ]
            .into(),
            ..ResponseFixture::default()
        };
        let response = build_fixture_response(&fixture, &HttpConfig::default());
        assert_eq!(response.headers()["x-ok"], "1");
        assert!(!response.headers().contains_key("bad header"));
    }

    #[test]
    fn test_framework_responses() {
        assert_eq!(build_404_response().status(), 404);
        let not_allowed = build_405_response();
        assert_eq!(not_allowed.status(), 405);
        assert_eq!(not_allowed.headers()["allow"], ALLOWED_METHODS);
        assert_eq!(build_413_response().status(), 413);
    }
}
