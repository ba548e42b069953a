//! Request tracing middleware for observability.
//!
//! This module provides middleware for request tracking and metrics collection.

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Request ID header name for distributed tracing
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that adds request tracing with unique request ID.
///
/// This middleware:
/// - Reuses an incoming `x-request-id` or generates a new one
/// - Runs the request inside a span carrying the request metadata
/// - Logs completion with status and duration
/// - Records request count and duration metrics
/// - Echoes the request ID on the response
pub async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = route_label(&request);

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %route,
    );

    async move {
        tracing::debug!("Request started");
        let start = Instant::now();

        let mut response = next.run(request).await;

        let duration = start.elapsed();
        let status = response.status();

        tracing::info!(
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );

        record_request_metrics(method.as_ref(), &route, status.as_u16(), duration);

        response.headers_mut().insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_str(&request_id)
                .unwrap_or_else(|_| HeaderValue::from_static("unknown")),
        );
        response
    }
    .instrument(span)
    .await
}

/// Record metrics for HTTP requests
fn record_request_metrics(method: &str, route: &str, status: u16, duration: Duration) {
    let status_str = status.to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => route.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => route.to_string(),
        "status" => status_str
    )
    .record(duration.as_secs_f64());
}

/// Metrics label: the matched route template, or `unmatched` for fallback hits
fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

const UNMATCHED_ROUTE: &str = "unmatched";
