//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use short_architect::server::router;
use short_architect::{Config, GeminiClient};
use std::time::Duration;
use tower::ServiceExt;

pub const API_KEY: &str = "test-key";
pub const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

/// Router whose Gemini client points at `base_url`.
pub fn app(base_url: &str) -> Router {
    app_with_timeout(base_url, Duration::from_secs(200))
}

pub fn app_with_timeout(base_url: &str, timeout: Duration) -> Router {
    let config = Config::new(API_KEY, base_url).with_timeout(timeout);
    let client = GeminiClient::new(&config).expect("client");
    router(client)
}

/// Wraps model text the way `generateContent` returns it.
pub fn candidate_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ], "role": "model" }, "finishReason": "STOP" }
        ]
    })
    .to_string()
}

pub async fn post_short(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/short")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get_debug(app: Router) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri("/api/debug")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// A base URL nothing is listening on.
pub async fn closed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
