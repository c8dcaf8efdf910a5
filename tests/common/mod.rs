//! Common test utilities

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use scolarite::api::{self, AppState};
use scolarite::store::MemoryStore;
use serde_json::Value;
use tower::util::ServiceExt;

/// Fresh app over an empty store seeded with the demo accounts
pub fn setup_app() -> (Router, AppState) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store, chrono::Duration::hours(1));
    state
        .auth
        .seed_demo_accounts()
        .expect("Failed to seed demo accounts");
    (api::build_router(state.clone()), state)
}

/// Send a request and return the status with the JSON body (Null when empty)
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("X-Session-Token", token);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

/// Log in and return the session token
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, json) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {}: {}", username, json);
    json["token"].as_str().unwrap().to_string()
}
