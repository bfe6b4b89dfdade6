// Common test utilities

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chat_core::kernel::TestDependencies;
use chat_core::server::{build_app, AppOptions};
use serde_json::Value;
use tower::ServiceExt;

/// Router over the given mocks with default options.
pub fn test_app(deps: &TestDependencies) -> Router {
    test_app_with(deps, AppOptions::default())
}

pub fn test_app_with(deps: &TestDependencies, options: AppOptions) -> Router {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    build_app(deps.server_deps(), options)
}

/// Send a request and return `(status, parsed JSON body)`.
///
/// Empty bodies come back as `Value::Null`.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(payload) => request
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request build should succeed");

    let resp = app
        .oneshot(request)
        .await
        .expect("app should handle request");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("response body should be readable");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body must be JSON")
    };
    (status, json)
}

#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

#[allow(dead_code)]
pub async fn post(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(payload)).await
}
