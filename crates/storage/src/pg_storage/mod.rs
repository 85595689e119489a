//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by aggregate.

#![allow(clippy::absolute_paths, reason = "std paths in error handling are clear")]

mod journal;
mod notifications;
mod profiles;
mod prompts;
mod sessions;
mod tasks;

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use therapy_core::{
    JournalEntry, Notification, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS, Profile, Prompt, Session, Task,
};

use super::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }
}

pub(crate) const PROFILE_COLUMNS: &str = "id, user_id, name, description, goals, challenges, \
    emotional_states, preferred_method, session_count, last_session_at, created_at, updated_at";

pub(crate) const SESSION_COLUMNS: &str = "id, user_id, profile_id, therapy_method, messages, \
    scheduled_for, started_at, ended_at, completed, metrics, created_at, updated_at";

pub(crate) const TASK_COLUMNS: &str = "id, user_id, profile_id, title, description, due_date, \
    completed, completed_at, created_at, updated_at";

pub(crate) const JOURNAL_COLUMNS: &str =
    "id, user_id, profile_id, content, mood, tags, created_at, updated_at";

pub(crate) const NOTIFICATION_COLUMNS: &str = "id, user_id, notification_type, related_id, \
    scheduled_for, title, message, sent, sent_at, delivery_attempts, last_attempt_at, created_at";

pub(crate) const PROMPT_COLUMNS: &str =
    "id, name, content, method, is_system, created_at, updated_at";

/// Decode a JSONB column into a domain type.
pub(crate) fn parse_json_column<T: serde::de::DeserializeOwned>(
    row: &sqlx::postgres::PgRow,
    column: &str,
) -> Result<T, StorageError> {
    let value: serde_json::Value = row.try_get(column)?;
    serde_json::from_value(value).map_err(|e| StorageError::DataCorruption {
        context: format!("column {column}"),
        source: Box::new(e),
    })
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

pub(crate) fn row_to_profile(row: &sqlx::postgres::PgRow) -> Result<Profile, StorageError> {
    let session_count: i32 = row.try_get("session_count")?;
    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        goals: parse_json_column(row, "goals")?,
        challenges: parse_json_column(row, "challenges")?,
        emotional_states: parse_json_column(row, "emotional_states")?,
        preferred_method: row.try_get("preferred_method")?,
        session_count: u32::try_from(session_count).unwrap_or(0),
        last_session_at: row.try_get("last_session_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_session(row: &sqlx::postgres::PgRow) -> Result<Session, StorageError> {
    let metrics: Option<serde_json::Value> = row.try_get("metrics")?;
    Ok(Session {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        profile_id: row.try_get("profile_id")?,
        therapy_method: row.try_get("therapy_method")?,
        messages: parse_json_column(row, "messages")?,
        scheduled_for: row.try_get("scheduled_for")?,
        started_at: row.try_get("started_at")?,
        ended_at: row.try_get("ended_at")?,
        completed: row.try_get("completed")?,
        metrics: metrics.map(serde_json::from_value).transpose()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_task(row: &sqlx::postgres::PgRow) -> Result<Task, StorageError> {
    Ok(Task {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        profile_id: row.try_get("profile_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        due_date: row.try_get("due_date")?,
        completed: row.try_get("completed")?,
        completed_at: row.try_get("completed_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_journal_entry(
    row: &sqlx::postgres::PgRow,
) -> Result<JournalEntry, StorageError> {
    Ok(JournalEntry {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        profile_id: row.try_get("profile_id")?,
        content: row.try_get("content")?,
        mood: row.try_get("mood")?,
        tags: parse_json_column(row, "tags")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_notification(
    row: &sqlx::postgres::PgRow,
) -> Result<Notification, StorageError> {
    let notification_type: String = row.try_get("notification_type")?;
    let delivery_attempts: i32 = row.try_get("delivery_attempts")?;
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        notification_type: notification_type.parse()?,
        related_id: row.try_get("related_id")?,
        scheduled_for: row.try_get::<DateTime<Utc>, _>("scheduled_for")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        sent: row.try_get("sent")?,
        sent_at: row.try_get("sent_at")?,
        delivery_attempts: u32::try_from(delivery_attempts).unwrap_or(0),
        last_attempt_at: row.try_get("last_attempt_at")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_prompt(row: &sqlx::postgres::PgRow) -> Result<Prompt, StorageError> {
    Ok(Prompt {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        content: row.try_get("content")?,
        method: row.try_get("method")?,
        is_system: row.try_get("is_system")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
