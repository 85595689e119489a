//! SessionStore implementation for PgStorage.

use super::*;

use crate::traits::SessionStore;
use async_trait::async_trait;
use therapy_core::SessionMessage;

#[async_trait]
impl SessionStore for PgStorage {
    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let metrics = session.metrics.as_ref().map(serde_json::to_value).transpose()?;
        sqlx::query(&format!(
            "INSERT INTO sessions ({SESSION_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
             ON CONFLICT (id) DO UPDATE SET
               therapy_method = EXCLUDED.therapy_method,
               messages = EXCLUDED.messages,
               scheduled_for = EXCLUDED.scheduled_for,
               started_at = EXCLUDED.started_at,
               ended_at = EXCLUDED.ended_at,
               completed = EXCLUDED.completed,
               metrics = EXCLUDED.metrics,
               updated_at = EXCLUDED.updated_at"
        ))
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.profile_id)
        .bind(&session.therapy_method)
        .bind(serde_json::to_value(&session.messages)?)
        .bind(session.scheduled_for)
        .bind(session.started_at)
        .bind(session.ended_at)
        .bind(session.completed)
        .bind(metrics)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, StorageError> {
        let row = sqlx::query(&format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn list_sessions(&self, profile_id: &str, limit: usize) -> Result<Vec<Session>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE profile_id = $1
             ORDER BY started_at DESC, id ASC LIMIT $2"
        ))
        .bind(profile_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_session).collect()
    }

    async fn append_session_message(
        &self,
        session_id: &str,
        message: &SessionMessage,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE sessions SET messages = messages || jsonb_build_array($2::jsonb), updated_at = $3
             WHERE id = $1 AND completed = FALSE",
        )
        .bind(session_id)
        .bind(serde_json::to_value(message)?)
        .bind(message.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn complete_session(
        &self,
        id: &str,
        ended_at: DateTime<Utc>,
    ) -> Result<Option<Session>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1 AND completed = FALSE FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut session = row_to_session(&row)?;
        let metrics = serde_json::to_value(session.complete(ended_at)?)?;
        let result = sqlx::query(
            "UPDATE sessions SET completed = TRUE, ended_at = $2, metrics = $3, updated_at = $2
             WHERE id = $1 AND completed = FALSE",
        )
        .bind(id)
        .bind(ended_at)
        .bind(metrics)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        tx.commit().await?;
        Ok(Some(session))
    }

    async fn delete_session(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_scheduled_sessions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions
             WHERE completed = FALSE AND scheduled_for >= $1 AND scheduled_for <= $2
             ORDER BY scheduled_for ASC, id ASC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_session).collect()
    }
}
