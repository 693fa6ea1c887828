use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tutor_core::model::UserId;

use super::SqliteRepository;
use crate::repository::{IdentityRepository, StorageError};

// Single-row identity, never expired: this is the durable primary backend.
#[async_trait]
impl IdentityRepository for SqliteRepository {
    async fn load_user_id(&self) -> Result<Option<UserId>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT user_id
                FROM identity
                WHERE id = 1
            ",
        )
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let token: String = row
            .try_get("user_id")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(UserId::new(token)))
    }

    async fn store_user_id(&self, user: &UserId) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO identity (id, user_id, issued_at)
                VALUES (1, ?1, ?2)
                ON CONFLICT(id) DO UPDATE SET
                    user_id = excluded.user_id,
                    issued_at = excluded.issued_at
            ",
        )
        .bind(user.as_str())
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
