// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile tests: lazy creation and partial updates.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_profile_created_lazily_with_username() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "lazy@example.com", "lazy_user").await;

    let (status, body) = common::request(&app, "GET", "/api/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "lazy_user");
    assert_eq!(body["availability"], json!({}));
    assert_eq!(body["equipment"], json!([]));
    assert_eq!(body["fatigue_log"], json!([]));
}

#[tokio::test]
async fn test_partial_update_leaves_other_fields() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "partial@example.com", "partial").await;
    common::set_availability(&app, &token, &["mon", "wed"]).await;

    // Update only the name
    let (status, body) = common::request(
        &app,
        "PUT",
        "/api/profile",
        Some(&token),
        Some(json!({ "name": "Iron Mike" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Iron Mike");
    // Availability set earlier is untouched
    assert_eq!(
        body["availability"],
        json!({ "mon": ["18:00-19:00"], "wed": ["18:00-19:00"] })
    );
}

#[tokio::test]
async fn test_update_equipment_and_fatigue_log() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "gear@example.com", "gear").await;

    let fatigue = json!([
        { "date": "2025-09-20", "level": 7 },
        { "date": "2025-09-18", "level": 4 },
    ]);

    let (status, body) = common::request(
        &app,
        "PUT",
        "/api/profile",
        Some(&token),
        Some(json!({
            "equipment": ["dumbbells", "barbell"],
            "fatigue_log": fatigue,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["equipment"], json!(["dumbbells", "barbell"]));
    // Entries keep their reported order, even when not sorted by date
    assert_eq!(body["fatigue_log"], fatigue);
}

#[tokio::test]
async fn test_update_rejects_empty_name() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "noname@example.com", "noname").await;

    let (status, _) = common::request(
        &app,
        "PUT",
        "/api/profile",
        Some(&token),
        Some(json!({ "name": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_reports_profile_name() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "me@example.com", "me_user").await;

    common::request(
        &app,
        "PUT",
        "/api/profile",
        Some(&token),
        Some(json!({ "name": "Renamed" })),
    )
    .await;

    let (status, body) = common::request(&app, "GET", "/api/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "me_user");
    assert_eq!(body["name"], "Renamed");
}
