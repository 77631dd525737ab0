//! Shared helpers for API integration tests.
//!
//! Each test builds the full production router (same middleware stack as
//! `main.rs`) over a per-test database provided by `#[sqlx::test]`, then
//! drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use mast_api::config::ServerConfig;
use mast_api::router::build_app_router;
use mast_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://localhost:3000".to_string(),
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

/// Send a PATCH request with a JSON body.
pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

/// Send a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status and return the parsed body.
pub async fn assert_json(response: Response<Body>, expected: StatusCode) -> Value {
    let status = response.status();
    let body = body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {body}");
    body
}
