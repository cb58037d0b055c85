// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use workout_planner::config::Config;
use workout_planner::db::Db;
use workout_planner::routes::create_router;
use workout_planner::AppState;

/// Create a test app backed by an in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = Db::in_memory().await.expect("in-memory database");

    let state = Arc::new(AppState { config, db });

    (create_router(state.clone()), state)
}

/// Send one request and return (status, parsed JSON body).
/// The body is `Value::Null` for empty responses.
#[allow(dead_code)]
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

/// Register a user and return their session token.
#[allow(dead_code)]
pub async fn register(app: &Router, email: &str, username: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "username": username,
            "password": "test-password-1",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "registration failed: {}", body);
    body["token"].as_str().expect("token in response").to_string()
}

/// Set the profile availability for an authenticated user.
#[allow(dead_code)]
pub async fn set_availability(app: &Router, token: &str, days: &[&str]) {
    let availability: Value = days
        .iter()
        .map(|d| (d.to_string(), json!(["18:00-19:00"])))
        .collect::<serde_json::Map<_, _>>()
        .into();

    let (status, body) = request(
        app,
        "PUT",
        "/api/profile",
        Some(token),
        Some(json!({ "availability": availability })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "profile update failed: {}", body);
}

/// Generate a plan and return its parsed body.
#[allow(dead_code)]
pub async fn generate_plan(app: &Router, token: &str, weeks: Option<i64>) -> Value {
    let body = match weeks {
        Some(weeks) => json!({ "weeks": weeks }),
        None => json!({}),
    };

    let (status, body) = request(app, "POST", "/api/workout-plans", Some(token), Some(body)).await;

    assert_eq!(status, StatusCode::CREATED, "plan creation failed: {}", body);
    body
}
