// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite pool wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts and credentials)
//! - Profiles (availability, equipment, fatigue log)
//! - Plans (generated batches of sessions)
//! - Sessions (scheduled workouts with lifecycle status)
//!
//! Plan generation and session replacement each run inside a single
//! transaction, so a plan is never observable with only part of its
//! sessions.

use crate::error::AppError;
use crate::models::{
    NewPlan, NewSession, PlanWithSessions, ProfileUpdate, SessionStatus, User, UserProfile,
    WorkoutPlan, WorkoutSession,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Database handle. Cheap to clone; all clones share one pool.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connect to the database at `database_url` and run migrations.
    ///
    /// Foreign keys are enabled on every connection; the cascade chain
    /// from users down to sessions depends on them.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

        tracing::info!(url = database_url, "Connected to database");

        Ok(Self { pool })
    }

    /// In-memory database for tests.
    ///
    /// An in-memory SQLite database exists per connection, so the pool is
    /// pinned to a single connection to keep the schema visible.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Database(e.to_string()))?
            .foreign_keys(true);

        // The database lives and dies with its one connection, so the
        // pool must never reap it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

        Ok(Self { pool })
    }

    // ─── Users ───────────────────────────────────────────────

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let now = chrono::Utc::now();
        let row = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) \
             VALUES (?1, ?2, ?3, ?4) RETURNING *",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        user_from_row(&row)
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn username_taken(&self, username: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 FROM users WHERE username = ?1 LIMIT 1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Delete an account. The profile, plans and sessions go with it.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id, "Deleted user and all owned records");
        Ok(())
    }

    // ─── Profiles ────────────────────────────────────────────

    pub async fn get_profile_by_user(&self, user_id: i64) -> Result<Option<UserProfile>, AppError> {
        let row = sqlx::query("SELECT * FROM user_profiles WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    /// Fetch the user's profile, creating an empty one named `default_name`
    /// if none exists yet.
    pub async fn get_or_create_profile(
        &self,
        user_id: i64,
        default_name: &str,
    ) -> Result<UserProfile, AppError> {
        if let Some(profile) = self.get_profile_by_user(user_id).await? {
            return Ok(profile);
        }

        let now = chrono::Utc::now();
        let inserted = sqlx::query(
            "INSERT INTO user_profiles (user_id, name, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?3) RETURNING *",
        )
        .bind(user_id)
        .bind(default_name)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => profile_from_row(&row),
            // A concurrent request may have created the profile between the
            // lookup and the insert; the UNIQUE(user_id) constraint catches
            // that, and the existing row wins.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => self
                .get_profile_by_user(user_id)
                .await?
                .ok_or_else(|| AppError::Database("profile vanished after insert race".into())),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a partial update to a profile. Absent fields keep their
    /// current values; `updated_at` is refreshed.
    pub async fn update_profile(
        &self,
        current: &UserProfile,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AppError> {
        let name = update.name.unwrap_or_else(|| current.name.clone());
        let availability = update
            .availability
            .unwrap_or_else(|| current.availability.clone());
        let equipment = update.equipment.unwrap_or_else(|| current.equipment.clone());
        let fatigue_log = update
            .fatigue_log
            .unwrap_or_else(|| current.fatigue_log.clone());

        let row = sqlx::query(
            "UPDATE user_profiles SET name = ?2, availability = ?3, equipment = ?4, \
             fatigue_log = ?5, updated_at = ?6 WHERE id = ?1 RETURNING *",
        )
        .bind(current.id)
        .bind(name)
        .bind(encode_json(&availability)?)
        .bind(encode_json(&equipment)?)
        .bind(encode_json(&fatigue_log)?)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await?;

        profile_from_row(&row)
    }

    // ─── Plans ───────────────────────────────────────────────

    /// Create a plan and all of its sessions in one transaction.
    pub async fn insert_plan_with_sessions(
        &self,
        profile_id: i64,
        plan: &NewPlan,
        sessions: &[NewSession],
    ) -> Result<PlanWithSessions, AppError> {
        let now = chrono::Utc::now();
        let mut tx = self.pool.begin().await?;

        let plan_row = sqlx::query(
            "INSERT INTO workout_plans (profile_id, start_date, weeks, rationale, \
             created_at, last_updated) VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING *",
        )
        .bind(profile_id)
        .bind(plan.start_date)
        .bind(plan.weeks)
        .bind(&plan.rationale)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        let created = plan_from_row(&plan_row)?;

        let mut created_sessions = Vec::with_capacity(sessions.len());
        for session in sessions {
            let row = insert_session(&mut tx, profile_id, created.id, session, now).await?;
            created_sessions.push(session_from_row(&row)?);
        }

        tx.commit().await?;

        tracing::info!(
            profile_id,
            plan_id = created.id,
            sessions = created_sessions.len(),
            "Created plan"
        );

        Ok(PlanWithSessions {
            plan: created,
            sessions: created_sessions,
        })
    }

    /// Replace a plan's sessions with a freshly generated batch and move
    /// its start date, in one transaction.
    pub async fn replace_plan_sessions(
        &self,
        plan: &WorkoutPlan,
        start_date: chrono::NaiveDate,
        sessions: &[NewSession],
    ) -> Result<PlanWithSessions, AppError> {
        let now = chrono::Utc::now();
        let mut tx = self.pool.begin().await?;

        let plan_row = sqlx::query(
            "UPDATE workout_plans SET start_date = ?2, last_updated = ?3 \
             WHERE id = ?1 RETURNING *",
        )
        .bind(plan.id)
        .bind(start_date)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        let updated = plan_from_row(&plan_row)?;

        sqlx::query("DELETE FROM workout_sessions WHERE plan_id = ?1")
            .bind(plan.id)
            .execute(&mut *tx)
            .await?;

        let mut created_sessions = Vec::with_capacity(sessions.len());
        for session in sessions {
            let row = insert_session(&mut tx, plan.profile_id, plan.id, session, now).await?;
            created_sessions.push(session_from_row(&row)?);
        }

        tx.commit().await?;

        tracing::info!(
            plan_id = plan.id,
            sessions = created_sessions.len(),
            "Regenerated plan sessions"
        );

        Ok(PlanWithSessions {
            plan: updated,
            sessions: created_sessions,
        })
    }

    pub async fn list_plans(&self, profile_id: i64) -> Result<Vec<WorkoutPlan>, AppError> {
        let rows = sqlx::query("SELECT * FROM workout_plans WHERE profile_id = ?1 ORDER BY id")
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(plan_from_row).collect()
    }

    /// Owner-scoped plan lookup; another profile's plan is simply absent.
    pub async fn get_plan(
        &self,
        profile_id: i64,
        plan_id: i64,
    ) -> Result<Option<WorkoutPlan>, AppError> {
        let row = sqlx::query("SELECT * FROM workout_plans WHERE id = ?1 AND profile_id = ?2")
            .bind(plan_id)
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(plan_from_row).transpose()
    }

    /// Delete a plan and (by cascade) its sessions. Returns whether a
    /// plan was actually deleted.
    pub async fn delete_plan(&self, profile_id: i64, plan_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM workout_plans WHERE id = ?1 AND profile_id = ?2")
            .bind(plan_id)
            .bind(profile_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ─── Sessions ────────────────────────────────────────────

    pub async fn sessions_for_plan(&self, plan_id: i64) -> Result<Vec<WorkoutSession>, AppError> {
        let rows =
            sqlx::query("SELECT * FROM workout_sessions WHERE plan_id = ?1 ORDER BY date, id")
                .bind(plan_id)
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(session_from_row).collect()
    }

    pub async fn list_sessions(
        &self,
        profile_id: i64,
        plan_id: Option<i64>,
        status: Option<SessionStatus>,
    ) -> Result<Vec<WorkoutSession>, AppError> {
        let rows = sqlx::query(
            "SELECT * FROM workout_sessions WHERE profile_id = ?1 \
             AND (?2 IS NULL OR plan_id = ?2) \
             AND (?3 IS NULL OR status = ?3) \
             ORDER BY date, id",
        )
        .bind(profile_id)
        .bind(plan_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(session_from_row).collect()
    }

    /// Owner-scoped session lookup.
    pub async fn get_session(
        &self,
        profile_id: i64,
        session_id: i64,
    ) -> Result<Option<WorkoutSession>, AppError> {
        let row = sqlx::query("SELECT * FROM workout_sessions WHERE id = ?1 AND profile_id = ?2")
            .bind(session_id)
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(session_from_row).transpose()
    }

    /// Set a session's status, optionally overwriting its notes.
    ///
    /// `COALESCE` keeps the stored notes when `notes` is `None`; the
    /// update timestamp is always refreshed.
    pub async fn update_session_status(
        &self,
        session_id: i64,
        status: SessionStatus,
        notes: Option<&str>,
    ) -> Result<WorkoutSession, AppError> {
        let row = sqlx::query(
            "UPDATE workout_sessions SET status = ?2, notes = COALESCE(?3, notes), \
             updated_at = ?4 WHERE id = ?1 RETURNING *",
        )
        .bind(session_id)
        .bind(status.as_str())
        .bind(notes)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await?;

        session_from_row(&row)
    }
}

async fn insert_session(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    profile_id: i64,
    plan_id: i64,
    session: &NewSession,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<SqliteRow, AppError> {
    let row = sqlx::query(
        "INSERT INTO workout_sessions (profile_id, plan_id, date, exercises, status, \
         notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 'planned', '', ?5, ?5) RETURNING *",
    )
    .bind(profile_id)
    .bind(plan_id)
    .bind(session.date)
    .bind(encode_json(&session.exercises)?)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;

    Ok(row)
}

// ─── Row mapping ─────────────────────────────────────────────

fn user_from_row(row: &SqliteRow) -> Result<User, AppError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

fn profile_from_row(row: &SqliteRow) -> Result<UserProfile, AppError> {
    Ok(UserProfile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        availability: decode_json("availability", &row.try_get::<String, _>("availability")?)?,
        equipment: decode_json("equipment", &row.try_get::<String, _>("equipment")?)?,
        fatigue_log: decode_json("fatigue_log", &row.try_get::<String, _>("fatigue_log")?)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn plan_from_row(row: &SqliteRow) -> Result<WorkoutPlan, AppError> {
    Ok(WorkoutPlan {
        id: row.try_get("id")?,
        profile_id: row.try_get("profile_id")?,
        start_date: row.try_get("start_date")?,
        weeks: row.try_get("weeks")?,
        rationale: row.try_get("rationale")?,
        created_at: row.try_get("created_at")?,
        last_updated: row.try_get("last_updated")?,
    })
}

fn session_from_row(row: &SqliteRow) -> Result<WorkoutSession, AppError> {
    let status: String = row.try_get("status")?;
    let status = SessionStatus::parse(&status)
        .ok_or_else(|| AppError::Database(format!("unknown session status: {}", status)))?;

    Ok(WorkoutSession {
        id: row.try_get("id")?,
        profile_id: row.try_get("profile_id")?,
        plan_id: row.try_get("plan_id")?,
        date: row.try_get("date")?,
        exercises: decode_json("exercises", &row.try_get::<String, _>("exercises")?)?,
        status,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JSON encode failed: {}", e)))
}

fn decode_json<T: serde::de::DeserializeOwned>(column: &str, raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Database(format!("corrupt {} column: {}", column, e)))
}
