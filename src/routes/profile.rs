// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current-user and profile routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Availability, FatigueEntry, ProfileUpdate, UserProfile};
use crate::routes::auth::AccountResponse;
use crate::routes::current_profile;
use crate::AppState;
use axum::{
    extract::State,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Profile routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/account", delete(delete_account))
        .route("/api/profile", get(get_profile).put(update_profile))
}

// ─── Current User ────────────────────────────────────────────

/// Get current user, creating the profile if this is the first
/// authenticated access.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AccountResponse>> {
    let (user, profile) = current_profile(&state, &auth).await?;

    Ok(Json(AccountResponse {
        id: user.id,
        email: user.email,
        username: user.username,
        name: profile.name,
    }))
}

// ─── Account Deletion ────────────────────────────────────────

/// Response for account deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

/// Delete the account and, through the cascade, the profile and every
/// plan and session it owns.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(user_id = auth.user_id, "User-initiated account deletion");

    state.db.delete_user(auth.user_id).await?;

    Ok(Json(DeleteAccountResponse {
        success: true,
        message: "Account and all workout data deleted.".to_string(),
    }))
}

// ─── Profile ─────────────────────────────────────────────────

/// Profile as served by the API.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct ProfileResponse {
    pub id: i64,
    pub name: String,
    #[cfg_attr(
        feature = "binding-generation",
        ts(type = "Record<string, string[]>")
    )]
    pub availability: Availability,
    pub equipment: Vec<String>,
    #[cfg_attr(
        feature = "binding-generation",
        ts(type = "{ date: string; level: number }[]")
    )]
    pub fatigue_log: Vec<FatigueEntry>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            availability: profile.availability,
            equipment: profile.equipment,
            fatigue_log: profile.fatigue_log,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Get the caller's profile, creating it lazily.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let (_, profile) = current_profile(&state, &auth).await?;

    Ok(Json(ProfileResponse::from(profile)))
}

#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub availability: Option<Availability>,
    pub equipment: Option<Vec<String>>,
    pub fatigue_log: Option<Vec<FatigueEntry>>,
}

/// Partially update the caller's profile; omitted fields are untouched.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    req.validate()
        .map_err(|e| crate::error::AppError::Validation(e.to_string()))?;

    let (_, profile) = current_profile(&state, &auth).await?;

    let updated = state
        .db
        .update_profile(
            &profile,
            ProfileUpdate {
                name: req.name,
                availability: req.availability,
                equipment: req.equipment,
                fatigue_log: req.fatigue_log,
            },
        )
        .await?;

    Ok(Json(ProfileResponse::from(updated)))
}
