// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod plan;
pub mod session;
pub mod user;

pub use plan::{NewPlan, PlanWithSessions, WorkoutPlan};
pub use session::{Exercise, NewSession, SessionStatus, WorkoutSession};
pub use user::{Availability, FatigueEntry, ProfileUpdate, User, UserProfile};
