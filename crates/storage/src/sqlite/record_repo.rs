use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tutor_core::model::UserId;

use super::SqliteRepository;
use crate::repository::{RecordKind, RecordRepository, StorageError};

#[async_trait]
impl RecordRepository for SqliteRepository {
    async fn read_record(
        &self,
        user: &UserId,
        kind: RecordKind,
    ) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT payload
                FROM records
                WHERE user_id = ?1 AND kind = ?2
            ",
        )
        .bind(user.as_str())
        .bind(kind.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.map(|r| {
            r.try_get::<String, _>("payload")
                .map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn write_record(
        &self,
        user: &UserId,
        kind: RecordKind,
        payload: &str,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO records (user_id, kind, payload, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(user_id, kind) DO UPDATE SET
                    payload = excluded.payload,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(user.as_str())
        .bind(kind.as_str())
        .bind(payload)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn delete_record(&self, user: &UserId, kind: RecordKind) -> Result<(), StorageError> {
        sqlx::query(
            r"
                DELETE FROM records
                WHERE user_id = ?1 AND kind = ?2
            ",
        )
        .bind(user.as_str())
        .bind(kind.as_str())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
