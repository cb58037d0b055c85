// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan generation service.
//!
//! Produces one plan and its batch of sessions from a profile's weekly
//! availability:
//! 1. Take the availability's weekday labels in lexicographic order
//! 2. Lay out `weeks * labels` session dates, each 2 days after the last
//! 3. Materialize one `planned` session per date with a default exercise
//!
//! The date stride is a flat 2 days from the plan's start date; the
//! weekday labels contribute only their count, not their position in the
//! week. A future adaptive generator (fatigue- and equipment-aware) would
//! replace step 2 and 3.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{Exercise, NewPlan, NewSession, PlanWithSessions, UserProfile, WorkoutPlan};
use chrono::{Days, NaiveDate};

/// Plan length when the request does not specify one.
pub const DEFAULT_WEEKS: i64 = 4;

/// Calendar days between consecutive generated sessions.
const SESSION_STRIDE_DAYS: u64 = 2;

const INITIAL_RATIONALE: &str = "Initial plan generated";

/// Generates plans and their sessions. Each generation run is one
/// transaction; repeated runs produce independent, overlapping plans.
pub struct PlanGenerator {
    db: Db,
}

impl PlanGenerator {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Generate a new plan for `profile` starting today.
    pub async fn generate(
        &self,
        profile: &UserProfile,
        weeks: Option<i64>,
    ) -> Result<PlanWithSessions> {
        let weeks = weeks.unwrap_or(DEFAULT_WEEKS);
        let start_date = chrono::Utc::now().date_naive();
        let sessions = build_sessions(profile, weeks, start_date)?;

        let plan = NewPlan {
            start_date,
            weeks,
            rationale: INITIAL_RATIONALE.to_string(),
        };

        tracing::info!(
            profile_id = profile.id,
            weeks,
            sessions = sessions.len(),
            "Generating plan"
        );

        self.db
            .insert_plan_with_sessions(profile.id, &plan, &sessions)
            .await
    }

    /// Re-run generation for an existing plan: its sessions are replaced
    /// by a fresh batch laid out from today, using the profile's current
    /// availability and the plan's original length.
    pub async fn regenerate(
        &self,
        profile: &UserProfile,
        plan: &WorkoutPlan,
    ) -> Result<PlanWithSessions> {
        let start_date = chrono::Utc::now().date_naive();
        let sessions = build_sessions(profile, plan.weeks, start_date)?;

        tracing::info!(
            profile_id = profile.id,
            plan_id = plan.id,
            sessions = sessions.len(),
            "Regenerating plan"
        );

        self.db
            .replace_plan_sessions(plan, start_date, &sessions)
            .await
    }
}

/// Validate inputs and lay out the session batch.
fn build_sessions(
    profile: &UserProfile,
    weeks: i64,
    start_date: NaiveDate,
) -> Result<Vec<NewSession>> {
    if weeks <= 0 {
        return Err(AppError::Validation(
            "weeks must be a positive integer".to_string(),
        ));
    }
    if profile.availability.is_empty() {
        return Err(AppError::Validation(
            "profile availability is empty; add available days before generating a plan"
                .to_string(),
        ));
    }

    // BTreeMap keys iterate lexicographically ("fri" < "mon" < "wed"),
    // not in calendar order. Only the number of labels matters for the
    // layout; each slot lands 2 days after the previous one.
    let slots_per_week = profile.availability.len();

    Ok(session_dates(start_date, weeks, slots_per_week)
        .into_iter()
        .map(|date| NewSession {
            date,
            exercises: default_exercises(),
        })
        .collect())
}

/// The flat date layout: `weeks * slots_per_week` dates, the i-th date
/// `2 * i` days after `start`.
fn session_dates(start: NaiveDate, weeks: i64, slots_per_week: usize) -> Vec<NaiveDate> {
    let count = weeks as usize * slots_per_week;
    let mut dates = Vec::with_capacity(count);
    let mut current = start;
    for _ in 0..count {
        dates.push(current);
        // NaiveDate covers +/- ~262,000 years; a plan horizon never
        // reaches the boundary, but saturate rather than panic.
        current = current
            .checked_add_days(Days::new(SESSION_STRIDE_DAYS))
            .unwrap_or(NaiveDate::MAX);
    }
    dates
}

/// Every generated session starts with the same single default exercise.
fn default_exercises() -> Vec<Exercise> {
    let mut squat = Exercise::new();
    squat.insert("name".to_string(), "Squat".into());
    squat.insert("sets".to_string(), 3.into());
    squat.insert("reps".to_string(), 10.into());
    vec![squat]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;
    use chrono::{DateTime, Utc};

    fn test_profile(days: &[&str]) -> UserProfile {
        let availability: Availability = days
            .iter()
            .map(|d| (d.to_string(), vec!["18:00-19:00".to_string()]))
            .collect();
        let now = DateTime::<Utc>::UNIX_EPOCH;
        UserProfile {
            id: 1,
            user_id: 1,
            name: "test".to_string(),
            availability,
            equipment: vec![],
            fatigue_log: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_session_dates_flat_stride() {
        let dates = session_dates(date(2025, 1, 1), 2, 2);
        assert_eq!(
            dates,
            vec![
                date(2025, 1, 1),
                date(2025, 1, 3),
                date(2025, 1, 5),
                date(2025, 1, 7),
            ]
        );
    }

    #[test]
    fn test_session_dates_count() {
        let dates = session_dates(date(2025, 6, 1), 4, 3);
        assert_eq!(dates.len(), 12);
        for (i, d) in dates.iter().enumerate() {
            assert_eq!(*d, date(2025, 6, 1) + Days::new(2 * i as u64));
        }
    }

    #[test]
    fn test_build_sessions_default_exercise() {
        let profile = test_profile(&["mon", "wed"]);
        let sessions = build_sessions(&profile, 1, date(2025, 1, 1)).unwrap();

        assert_eq!(sessions.len(), 2);
        for session in &sessions {
            assert_eq!(session.exercises.len(), 1);
            let exercise = &session.exercises[0];
            assert_eq!(exercise.get("name").and_then(|v| v.as_str()), Some("Squat"));
            assert_eq!(exercise.get("sets").and_then(|v| v.as_i64()), Some(3));
            assert_eq!(exercise.get("reps").and_then(|v| v.as_i64()), Some(10));
        }
    }

    #[test]
    fn test_build_sessions_rejects_nonpositive_weeks() {
        let profile = test_profile(&["mon"]);

        for weeks in [0, -1] {
            let err = build_sessions(&profile, weeks, date(2025, 1, 1)).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn test_build_sessions_rejects_empty_availability() {
        let profile = test_profile(&[]);

        let err = build_sessions(&profile, 4, date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_slot_count_ignores_time_windows() {
        // Three labels with any number of windows still yield 3 slots/week.
        let mut profile = test_profile(&["fri", "mon", "wed"]);
        profile
            .availability
            .get_mut("mon")
            .unwrap()
            .push("07:00-08:00".to_string());

        let sessions = build_sessions(&profile, 2, date(2025, 3, 10)).unwrap();
        assert_eq!(sessions.len(), 6);
    }
}
