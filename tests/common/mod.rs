// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use sellpoint_bff::config::Config;
use sellpoint_bff::routes::create_router;
use sellpoint_bff::AppState;
use serde_json::Value;
use std::sync::Arc;

/// Test token accepted by the fake upstream.
#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test-token";

/// Create a test app whose upstream is unreachable.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_upstream(&Config::test_default().api_url)
}

/// Create a test app talking to `upstream_url` (usually a mockito server).
#[allow(dead_code)]
pub fn create_test_app_with_upstream(upstream_url: &str) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        api_url: upstream_url.to_string(),
        ..Config::test_default()
    };
    let state = Arc::new(AppState::new(config).expect("Failed to build test state"));
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN));
    with_body(builder, body)
}

#[allow(dead_code)]
pub fn anonymous(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    with_body(Request::builder().method(method).uri(uri), body)
}

fn with_body(builder: axum::http::request::Builder, body: Option<Value>) -> Request<Body> {
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
