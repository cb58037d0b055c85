// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout plan model for storage and API.

use crate::models::session::WorkoutSession;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One generated batch of sessions covering `weeks` weeks from `start_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: i64,
    pub profile_id: i64,
    pub start_date: NaiveDate,
    pub weeks: i64,
    /// Free-text explanation of plan decisions
    pub rationale: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// A plan to be created by the generator.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub start_date: NaiveDate,
    pub weeks: i64,
    pub rationale: String,
}

/// A plan together with its sessions, as served by the API.
#[derive(Debug, Clone, Serialize)]
pub struct PlanWithSessions {
    #[serde(flatten)]
    pub plan: WorkoutPlan,
    pub sessions: Vec<WorkoutSession>,
}
