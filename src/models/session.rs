// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout session model and lifecycle status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One exercise entry. Deliberately open-ended: any string-keyed record,
/// typically `{"name": ..., "sets": ..., "reps": ...}`.
pub type Exercise = serde_json::Map<String, serde_json::Value>;

/// Lifecycle status of a session.
///
/// A flat set, not a state machine: every status is reachable from every
/// other status and none is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Planned,
    Completed,
    Missed,
    Rescheduled,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 4] = [
        SessionStatus::Planned,
        SessionStatus::Completed,
        SessionStatus::Missed,
        SessionStatus::Rescheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Planned => "planned",
            SessionStatus::Completed => "completed",
            SessionStatus::Missed => "missed",
            SessionStatus::Rescheduled => "rescheduled",
        }
    }

    /// Parse a status label; `None` for anything outside the four
    /// recognized values.
    pub fn parse(value: &str) -> Option<SessionStatus> {
        match value {
            "planned" => Some(SessionStatus::Planned),
            "completed" => Some(SessionStatus::Completed),
            "missed" => Some(SessionStatus::Missed),
            "rescheduled" => Some(SessionStatus::Rescheduled),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled workout occurrence.
///
/// Sessions are created only by the plan generator and thereafter mutated
/// only through status updates; the plan and profile links never change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: i64,
    pub profile_id: i64,
    pub plan_id: i64,
    pub date: NaiveDate,
    pub exercises: Vec<Exercise>,
    pub status: SessionStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session to be materialized by the plan generator. Status starts as
/// `planned` and notes start empty, so neither is a field here.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub date: NaiveDate,
    pub exercises: Vec<Exercise>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_statuses() {
        for status in SessionStatus::ALL {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        assert_eq!(SessionStatus::parse("abandoned"), None);
        assert_eq!(SessionStatus::parse("Planned"), None);
        assert_eq!(SessionStatus::parse(""), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&SessionStatus::Rescheduled).unwrap();
        assert_eq!(json, "\"rescheduled\"");
    }
}
