// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout session routes.
//!
//! Sessions have no create or delete endpoints: they are materialized by
//! the plan generator and removed by plan deletion. The only mutation is
//! the status lifecycle update.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Exercise, SessionStatus, WorkoutSession};
use crate::routes::current_profile;
use crate::services::SessionLifecycle;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Session routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workout-sessions", get(list_sessions))
        .route("/api/workout-sessions/{id}", get(get_session))
        .route(
            "/api/workout-sessions/{id}/update_status",
            post(update_status),
        )
}

/// Session as served by the API.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct SessionResponse {
    pub id: i64,
    pub plan_id: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    #[cfg_attr(
        feature = "binding-generation",
        ts(type = "Record<string, unknown>[]")
    )]
    pub exercises: Vec<Exercise>,
    #[cfg_attr(
        feature = "binding-generation",
        ts(type = "\"planned\" | \"completed\" | \"missed\" | \"rescheduled\"")
    )]
    pub status: SessionStatus,
    pub notes: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

impl From<WorkoutSession> for SessionResponse {
    fn from(session: WorkoutSession) -> Self {
        Self {
            id: session.id,
            plan_id: session.plan_id,
            date: session.date,
            exercises: session.exercises,
            status: session.status,
            notes: session.notes,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Deserialize)]
struct SessionsQuery {
    /// Restrict to one plan
    plan_id: Option<i64>,
    /// Restrict to one lifecycle status
    status: Option<String>,
}

/// List the caller's sessions, optionally filtered by plan and status.
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<SessionsQuery>,
) -> Result<Json<Vec<SessionResponse>>> {
    let (_, profile) = current_profile(&state, &auth).await?;

    let status = params
        .status
        .map(|s| SessionStatus::parse(&s).ok_or(AppError::InvalidStatus(s)))
        .transpose()?;

    let sessions = state
        .db
        .list_sessions(profile.id, params.plan_id, status)
        .await?;

    Ok(Json(sessions.into_iter().map(SessionResponse::from).collect()))
}

/// Get one of the caller's sessions.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SessionResponse>> {
    let (_, profile) = current_profile(&state, &auth).await?;

    let session = state
        .db
        .get_session(profile.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;

    Ok(Json(SessionResponse::from(session)))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Move a session through its lifecycle.
///
/// Returns the updated session, or 400 if the requested status is not
/// one of planned/completed/missed/rescheduled.
async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<SessionResponse>> {
    let (_, profile) = current_profile(&state, &auth).await?;

    let session = state
        .db
        .get_session(profile.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;

    let lifecycle = SessionLifecycle::new(state.db.clone());
    let updated = lifecycle
        .update_status(&session, &req.status, req.notes)
        .await?;

    Ok(Json(SessionResponse::from(updated)))
}
