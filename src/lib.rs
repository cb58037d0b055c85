// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout-Planner: schedule workout sessions around weekly availability
//!
//! This crate provides the backend API for user profiles, generated workout
//! plans and the lifecycle of individual workout sessions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
}
