// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle service.
//!
//! Moves a session between its four statuses (planned, completed, missed,
//! rescheduled). Any status may follow any other; there is no transition
//! graph and no terminal status. Notes are overwritten only when the
//! caller supplies a non-empty value.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{SessionStatus, WorkoutSession};

/// A validated status change.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: SessionStatus,
    /// `None` means "keep the stored notes"
    pub notes: Option<String>,
}

/// Validate a requested status change.
///
/// An unrecognized status label is rejected before anything is written.
/// Empty notes collapse to `None` so they never clobber existing notes.
pub fn parse_change(status: &str, notes: Option<String>) -> Result<StatusChange> {
    let status = SessionStatus::parse(status)
        .ok_or_else(|| AppError::InvalidStatus(status.to_string()))?;

    let notes = notes.filter(|n| !n.is_empty());

    Ok(StatusChange { status, notes })
}

/// Applies status changes to sessions.
pub struct SessionLifecycle {
    db: Db,
}

impl SessionLifecycle {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Apply a status change to `session` and return the updated record.
    ///
    /// The caller has already resolved `session` through an owner-scoped
    /// lookup; no further authorization happens here. Two racing updates
    /// to the same session are last-write-wins.
    pub async fn update_status(
        &self,
        session: &WorkoutSession,
        requested_status: &str,
        notes: Option<String>,
    ) -> Result<WorkoutSession> {
        let change = parse_change(requested_status, notes)?;

        tracing::info!(
            session_id = session.id,
            from = %session.status,
            to = %change.status,
            "Updating session status"
        );

        self.db
            .update_session_status(session.id, change.status, change.notes.as_deref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_change_accepts_all_statuses() {
        for status in SessionStatus::ALL {
            let change = parse_change(status.as_str(), None).unwrap();
            assert_eq!(change.status, status);
            assert_eq!(change.notes, None);
        }
    }

    #[test]
    fn test_parse_change_rejects_unknown_status() {
        let err = parse_change("abandoned", None).unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus(ref s) if s == "abandoned"));
    }

    #[test]
    fn test_empty_notes_keep_existing() {
        let change = parse_change("completed", Some(String::new())).unwrap();
        assert_eq!(change.notes, None);
    }

    #[test]
    fn test_nonempty_notes_overwrite() {
        let change = parse_change("completed", Some("felt good".to_string())).unwrap();
        assert_eq!(change.notes.as_deref(), Some("felt good"));
    }
}
