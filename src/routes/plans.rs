// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{PlanWithSessions, WorkoutPlan, WorkoutSession};
use crate::routes::current_profile;
use crate::routes::sessions::SessionResponse;
use crate::services::PlanGenerator;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Plan routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workout-plans", get(list_plans).post(create_plan))
        .route(
            "/api/workout-plans/{id}",
            get(get_plan).delete(delete_plan),
        )
        .route("/api/workout-plans/{id}/regenerate", post(regenerate_plan))
}

/// Plan as served by the API, with its sessions embedded.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct PlanResponse {
    pub id: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub start_date: NaiveDate,
    pub weeks: i64,
    pub rationale: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub last_updated: DateTime<Utc>,
    pub sessions: Vec<SessionResponse>,
}

impl PlanResponse {
    fn new(plan: WorkoutPlan, sessions: Vec<WorkoutSession>) -> Self {
        Self {
            id: plan.id,
            start_date: plan.start_date,
            weeks: plan.weeks,
            rationale: plan.rationale,
            created_at: plan.created_at,
            last_updated: plan.last_updated,
            sessions: sessions.into_iter().map(SessionResponse::from).collect(),
        }
    }
}

impl From<PlanWithSessions> for PlanResponse {
    fn from(value: PlanWithSessions) -> Self {
        Self::new(value.plan, value.sessions)
    }
}

/// List the caller's plans with their sessions.
async fn list_plans(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<PlanResponse>>> {
    let (_, profile) = current_profile(&state, &auth).await?;

    let plans = state.db.list_plans(profile.id).await?;

    // One sessions query per plan; plan lists stay small.
    let mut responses = Vec::with_capacity(plans.len());
    for plan in plans {
        let sessions = state.db.sessions_for_plan(plan.id).await?;
        responses.push(PlanResponse::new(plan, sessions));
    }

    Ok(Json(responses))
}

#[derive(Deserialize, Default)]
pub struct CreatePlanRequest {
    /// Plan length; defaults to 4 weeks
    pub weeks: Option<i64>,
}

/// Generate a new plan from the caller's availability.
async fn create_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>)> {
    let (_, profile) = current_profile(&state, &auth).await?;

    let generator = PlanGenerator::new(state.db.clone());
    let created = generator.generate(&profile, req.weeks).await?;

    Ok((StatusCode::CREATED, Json(PlanResponse::from(created))))
}

/// Get one of the caller's plans with its sessions.
async fn get_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<PlanResponse>> {
    let (_, profile) = current_profile(&state, &auth).await?;

    let plan = state
        .db
        .get_plan(profile.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", id)))?;

    let sessions = state.db.sessions_for_plan(plan.id).await?;

    Ok(Json(PlanResponse::new(plan, sessions)))
}

/// Delete a plan; its sessions go with it.
async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let (_, profile) = current_profile(&state, &auth).await?;

    let deleted = state.db.delete_plan(profile.id, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Plan {} not found", id)));
    }

    tracing::info!(profile_id = profile.id, plan_id = id, "Deleted plan");

    Ok(StatusCode::NO_CONTENT)
}

/// Re-run generation for an existing plan, replacing its sessions.
async fn regenerate_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<PlanResponse>> {
    let (_, profile) = current_profile(&state, &auth).await?;

    let plan = state
        .db
        .get_plan(profile.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", id)))?;

    let generator = PlanGenerator::new(state.db.clone());
    let regenerated = generator.regenerate(&profile, &plan).await?;

    Ok(Json(PlanResponse::from(regenerated)))
}
