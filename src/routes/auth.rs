// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and login routes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// The authenticated account, as returned from auth endpoints and /api/me.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Display name from the profile
    pub name: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountResponse,
}

/// Create a new account, its profile, and a session token.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if state.db.get_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Validation("email already registered".to_string()));
    }
    if state.db.username_taken(&req.username).await? {
        return Err(AppError::Validation("username already taken".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .db
        .create_user(&req.username, &req.email, &password_hash)
        .await?;
    let profile = state
        .db
        .get_or_create_profile(user.id, &user.username)
        .await?;

    let token = create_jwt(user.id, &state.config.jwt_signing_key)?;

    tracing::info!(user_id = user.id, "Registered new user");

    Ok(Json(AuthResponse {
        token,
        user: AccountResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            name: profile.name,
        },
    }))
}

/// Exchange email + password for a session token.
///
/// Unknown email and wrong password produce the same 401, and the
/// profile is created lazily here if the account predates profiles.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .db
        .get_user_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let profile = state
        .db
        .get_or_create_profile(user.id, &user.username)
        .await?;

    let token = create_jwt(user.id, &state.config.jwt_signing_key)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: AccountResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            name: profile.name,
        },
    }))
}

/// Hash a password with argon2 and a fresh random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
