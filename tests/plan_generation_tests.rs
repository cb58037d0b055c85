// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan generation tests.
//!
//! Exercised end-to-end through the REST surface: for availability with
//! `k` weekday labels and `w` weeks, generation produces `w * k` sessions,
//! the i-th dated `2 * i` days after the plan's start date, all `planned`
//! with the default exercise list.

use axum::http::StatusCode;
use chrono::{Days, NaiveDate};
use serde_json::{json, Value};

mod common;

fn parse_date(value: &Value) -> NaiveDate {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_generate_two_weeks_two_days() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "gen@example.com", "gen").await;
    common::set_availability(&app, &token, &["mon", "wed"]).await;

    let plan = common::generate_plan(&app, &token, Some(2)).await;

    assert_eq!(plan["weeks"], 2);
    assert_eq!(plan["rationale"], "Initial plan generated");

    let sessions = plan["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 4);

    // Each session lands exactly 2 days after the previous one,
    // starting at the plan's start date.
    let start = parse_date(&plan["start_date"]);
    for (i, session) in sessions.iter().enumerate() {
        let expected = start + Days::new(2 * i as u64);
        assert_eq!(parse_date(&session["date"]), expected);
        assert_eq!(session["status"], "planned");
        assert_eq!(session["notes"], "");
        assert_eq!(
            session["exercises"],
            json!([{ "name": "Squat", "sets": 3, "reps": 10 }])
        );
    }
}

#[tokio::test]
async fn test_generate_defaults_to_four_weeks() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "default@example.com", "default_weeks").await;
    common::set_availability(&app, &token, &["fri", "mon", "wed"]).await;

    let plan = common::generate_plan(&app, &token, None).await;

    assert_eq!(plan["weeks"], 4);
    assert_eq!(plan["sessions"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_generate_rejects_nonpositive_weeks() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "zero@example.com", "zero_weeks").await;
    common::set_availability(&app, &token, &["mon"]).await;

    for weeks in [0, -3] {
        let (status, body) = common::request(
            &app,
            "POST",
            "/api/workout-plans",
            Some(&token),
            Some(json!({ "weeks": weeks })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    // Nothing was persisted by the rejected attempts
    let (status, body) =
        common::request(&app, "GET", "/api/workout-plans", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_generate_rejects_empty_availability() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "empty@example.com", "empty_avail").await;

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/workout-plans",
        Some(&token),
        Some(json!({ "weeks": 4 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (_, plans) = common::request(&app, "GET", "/api/workout-plans", Some(&token), None).await;
    assert_eq!(plans.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_repeated_generation_creates_independent_plans() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "repeat@example.com", "repeat").await;
    common::set_availability(&app, &token, &["sat"]).await;

    let first = common::generate_plan(&app, &token, Some(1)).await;
    let second = common::generate_plan(&app, &token, Some(1)).await;

    assert_ne!(first["id"], second["id"]);

    // No merging or deduplication: both plans keep their own sessions
    let (_, plans) = common::request(&app, "GET", "/api/workout-plans", Some(&token), None).await;
    let plans = plans.as_array().unwrap();
    assert_eq!(plans.len(), 2);
    for plan in plans {
        assert_eq!(plan["sessions"].as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_plans_are_owner_scoped() {
    let (app, _) = common::create_test_app().await;
    let owner = common::register(&app, "owner@example.com", "owner").await;
    let other = common::register(&app, "other@example.com", "other").await;
    common::set_availability(&app, &owner, &["mon"]).await;

    let plan = common::generate_plan(&app, &owner, Some(1)).await;
    let plan_id = plan["id"].as_i64().unwrap();

    let uri = format!("/api/workout-plans/{}", plan_id);
    let (status, _) = common::request(&app, "GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::request(&app, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_plan_removes_sessions() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "deleter@example.com", "deleter").await;
    common::set_availability(&app, &token, &["mon", "thu"]).await;

    let plan = common::generate_plan(&app, &token, Some(1)).await;
    let plan_id = plan["id"].as_i64().unwrap();

    let (status, _) = common::request(
        &app,
        "DELETE",
        &format!("/api/workout-plans/{}", plan_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, sessions) =
        common::request(&app, "GET", "/api/workout-sessions", Some(&token), None).await;
    assert_eq!(sessions.as_array().unwrap().len(), 0);

    // Deleting again is a 404
    let (status, _) = common::request(
        &app,
        "DELETE",
        &format!("/api/workout-plans/{}", plan_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_regenerate_replaces_sessions() {
    let (app, _) = common::create_test_app().await;
    let token = common::register(&app, "regen@example.com", "regen").await;
    common::set_availability(&app, &token, &["mon", "wed"]).await;

    let plan = common::generate_plan(&app, &token, Some(2)).await;
    let plan_id = plan["id"].as_i64().unwrap();
    let old_ids: Vec<i64> = plan["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();

    // Availability changes before the regenerate
    common::set_availability(&app, &token, &["fri", "mon", "wed"]).await;

    let (status, regenerated) = common::request(
        &app,
        "POST",
        &format!("/api/workout-plans/{}/regenerate", plan_id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(regenerated["id"].as_i64().unwrap(), plan_id);

    // Same plan length, new batch from the current availability
    let sessions = regenerated["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 6);
    for session in sessions {
        let id = session["id"].as_i64().unwrap();
        assert!(!old_ids.contains(&id));
        assert_eq!(session["status"], "planned");
    }

    // The old batch is gone
    let (_, all_sessions) =
        common::request(&app, "GET", "/api/workout-sessions", Some(&token), None).await;
    assert_eq!(all_sessions.as_array().unwrap().len(), 6);
}
