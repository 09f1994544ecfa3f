//! HTTP middleware: security headers, request logging, rate limiting

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::infrastructure::rate_limit::LimiterRegistry;
use crate::presentation::models::ApiResponse;

/// Security headers middleware
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "permissions-policy",
        HeaderValue::from_static("camera=(), microphone=(), geolocation=(self)"),
    );

    response
}

/// Request logging middleware with timing and request ID
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Processing request"
    );

    let response = next.run(request).await;
    let duration = start_time.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// Derive the rate-limit key for a request. Proxy headers win over the
/// socket peer; a request with neither shares the empty-string bucket.
pub fn client_key(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_default()
}

/// Rate limiting middleware. Admitted requests pass through untouched;
/// rejected ones are answered immediately with 429 and never reach the
/// router.
pub async fn rate_limit_middleware(
    State(registry): State<Arc<LimiterRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    let limiter = registry.get_or_create(&key);

    if limiter.allow() {
        return next.run(request).await;
    }

    let retry_after = registry.window().as_secs();
    tracing::warn!(client = %key, retry_after, "Rate limit exceeded");

    let body = ApiResponse::<()>::error(
        "RATE_LIMIT_EXCEEDED",
        "Too many requests. Please try again later.",
        Some(serde_json::json!({ "retry_after": retry_after })),
    );

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert("retry-after", value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_header(name: &str, value: &str) -> Request {
        Request::builder()
            .uri("/api/health")
            .header(name, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn forwarded_for_takes_first_element() {
        let request = request_with_header("x-forwarded-for", "203.0.113.9, 10.0.0.1");
        assert_eq!(client_key(&request), "203.0.113.9");
    }

    #[test]
    fn real_ip_is_second_choice() {
        let request = request_with_header("x-real-ip", "198.51.100.4");
        assert_eq!(client_key(&request), "198.51.100.4");
    }

    #[test]
    fn missing_everything_yields_shared_empty_key() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "");
    }

    #[test]
    fn connect_info_is_used_when_headers_absent() {
        let mut request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(client_key(&request), "127.0.0.1");
    }
}
