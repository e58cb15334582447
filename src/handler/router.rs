//! Request dispatch module
//!
//! Entry point for HTTP request processing: endpoint matching, method and
//! size checks, then capture, fixture resolution and emission.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::mock::{self, FixtureSource, MockMethod, RequestSnapshot, Resolution};
use crate::storage::StorageKey;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Per-request state threaded through capture, resolution and emission
#[derive(Debug, Clone)]
pub struct MockContext {
    pub method: MockMethod,
    pub fixture_key: StorageKey,
    pub snapshot: RequestSnapshot,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let (response, fixture_source) = dispatch(req, &state, &mut entry).await;

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.fixture = fixture_source.map(FixtureSource::as_str);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch<B>(
    req: Request<B>,
    state: &Arc<AppState>,
    entry: &mut AccessLogEntry,
) -> (Response<Full<Bytes>>, Option<FixtureSource>)
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    // 1. Match an endpoint template
    let Some(route) = state.router.route(req.uri().path()) else {
        return (http::build_404_response(), None);
    };
    entry.endpoint = Some(route.template.as_str().to_string());

    // 2. Only the five mock methods are served
    let Ok(method) = MockMethod::try_from(req.method()) else {
        logger::log_warning(&format!("Method not allowed: {}", req.method()));
        return (http::build_405_response(), None);
    };

    // 3. Check body size
    let max_body_size = state.config.http.max_body_size;
    if exceeds_declared_size(&req, max_body_size) {
        return (http::build_413_response(), None);
    }

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // 4. Read the body, stopping once it outgrows the limit
    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!("Request body too large (max: {max_body_size})"));
            return (http::build_413_response(), None);
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Bytes::new()
        }
    };

    let ctx = MockContext {
        method,
        fixture_key: mock::fixture_key(&state.responses_root, route.template, &route.params, method),
        snapshot: RequestSnapshot::new(
            &parts.headers,
            parts.uri.query(),
            &body,
            route.template.as_str(),
            method,
        ),
    };
    logger::log_request_snapshot(&ctx.snapshot);

    // 5. Capture, then resolve
    let resolution = capture_and_resolve(state, ctx).await;
    logger::log_fixture_response(&resolution.fixture, resolution.source);

    // 6. Emit
    (
        http::build_fixture_response(&resolution.fixture, &state.config.http),
        Some(resolution.source),
    )
}

/// Store calls block, so both run on the blocking pool, capture first
async fn capture_and_resolve(state: &Arc<AppState>, ctx: MockContext) -> Resolution {
    let store = Arc::clone(&state.store);
    let root = state.responses_root.clone();
    let method = ctx.method;

    let task = tokio::task::spawn_blocking(move || {
        mock::capture(store.as_ref(), &root, &ctx.snapshot);
        mock::resolve(store.as_ref(), &ctx.fixture_key, ctx.method)
    });

    match task.await {
        Ok(resolution) => resolution,
        Err(e) => {
            logger::log_error(&format!("Fixture lookup task failed: {e}"));
            Resolution::default_for(method)
        }
    }
}

/// Validate Content-Length header against the configured maximum
fn exceeds_declared_size<B>(req: &Request<B>, max_body_size: u64) -> bool {
    let Some(content_length) = req.headers().get("content-length") else {
        return false;
    };
    match content_length.to_str().map(str::parse::<u64>) {
        Ok(Ok(size)) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            true
        }
        Ok(Ok(_)) => false,
        _ => {
            logger::log_warning("Invalid Content-Length header, skipping size check");
            false
        }
    }
}

fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
