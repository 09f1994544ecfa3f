//! Shared helpers for integration tests: app construction over an
//! in-memory database, request builders, and response decoding.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use geoalbum::{create_app, Config};

/// Configuration suitable for tests: in-memory SQLite (single connection so
/// every request sees the same database), uploads under a temp dir, rate
/// limiting off unless a test turns it on.
pub fn test_config(uploads: &TempDir) -> Config {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.storage.upload_dir = uploads.path().to_path_buf();
    config.auth.jwt_secret = "integration-test-secret-0123456789abcdef".to_string();
    config.server.enable_docs = false;
    config.rate_limit.enabled = false;
    config
}

pub async fn build_app(config: Config) -> Router {
    create_app(config)
        .await
        .expect("failed to build application")
        .router
}

pub async fn test_app() -> (Router, TempDir) {
    let uploads = TempDir::new().expect("failed to create temp dir");
    let router = build_app(test_config(&uploads)).await;
    (router, uploads)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes()
        .to_vec()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Register a user and return their bearer token.
pub async fn register(router: &Router, username: &str) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "username": username, "password": "s3curePassw0rd!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["data"]["token"]
        .as_str()
        .expect("register response has no token")
        .to_string()
}

/// Create an album and return its id.
pub async fn create_album(router: &Router, token: &str, title: &str) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            Some(token),
            &json!({
                "title": title,
                "description": "integration test album",
                "latitude": 35.6586,
                "longitude": 139.7454
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["data"]["id"]
        .as_str()
        .expect("album response has no id")
        .to_string()
}

/// Build a single-file multipart upload request.
pub fn multipart_upload(
    uri: &str,
    token: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let boundary = "geoalbum-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}
