//! ProfileStore implementation for PgStorage.

use super::*;

use crate::traits::ProfileStore;
use async_trait::async_trait;

#[async_trait]
impl ProfileStore for PgStorage {
    async fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO profiles ({PROFILE_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
             ON CONFLICT (id) DO UPDATE SET
               name = EXCLUDED.name,
               description = EXCLUDED.description,
               goals = EXCLUDED.goals,
               challenges = EXCLUDED.challenges,
               emotional_states = EXCLUDED.emotional_states,
               preferred_method = EXCLUDED.preferred_method,
               updated_at = EXCLUDED.updated_at"
        ))
        .bind(&profile.id)
        .bind(&profile.user_id)
        .bind(&profile.name)
        .bind(&profile.description)
        .bind(serde_json::to_value(&profile.goals)?)
        .bind(serde_json::to_value(&profile.challenges)?)
        .bind(serde_json::to_value(&profile.emotional_states)?)
        .bind(&profile.preferred_method)
        .bind(i32::try_from(profile.session_count).map_err(|e| StorageError::DataCorruption {
            context: "session_count exceeds i32::MAX".into(),
            source: Box::new(e),
        })?)
        .bind(profile.last_session_at)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StorageError> {
        let row = sqlx::query(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_profile(&r)).transpose()
    }

    async fn list_profiles(&self, user_id: &str, limit: usize) -> Result<Vec<Profile>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1
             ORDER BY created_at DESC, id ASC LIMIT $2"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_profile).collect()
    }

    async fn delete_profile(&self, id: &str) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await?;
        // Notifications reference sessions and tasks by id only, so they are not
        // covered by the foreign-key cascade.
        sqlx::query(
            "DELETE FROM notifications WHERE sent = FALSE AND related_id IN (
               SELECT id FROM sessions WHERE profile_id = $1
               UNION ALL
               SELECT id FROM tasks WHERE profile_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1").bind(id).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_session_started(
        &self,
        profile_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE profiles SET session_count = session_count + 1,
               last_session_at = GREATEST(COALESCE(last_session_at, $2), $2),
               updated_at = NOW()
             WHERE id = $1",
        )
        .bind(profile_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("profile", profile_id));
        }
        Ok(())
    }

    async fn record_session_removed(&self, profile_id: &str) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE profiles SET session_count = GREATEST(session_count - 1, 0), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(profile_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
