//! Account and profile models for storage and API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weekly availability: weekday label -> time windows, e.g.
/// `{"mon": ["18:00-19:00"]}`. A `BTreeMap` keeps the weekday labels in
/// lexicographic order, which is the order the plan generator consumes them.
pub type Availability = BTreeMap<String, Vec<String>>;

/// Registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC hash, never serialized to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One fatigue log entry. Entries are kept in insertion order, which is the
/// order the user reported them, not necessarily sorted by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueEntry {
    pub date: NaiveDate,
    pub level: i32,
}

/// Scheduling preferences for one account. Exactly one per user, created
/// lazily on first authenticated access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub availability: Availability,
    pub equipment: Vec<String>,
    pub fatigue_log: Vec<FatigueEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub availability: Option<Availability>,
    pub equipment: Option<Vec<String>>,
    pub fatigue_log: Option<Vec<FatigueEntry>>,
}
