//! JSON codec shared by the record-backed services.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use storage::repository::{RecordKind, RecordRepository, StorageError};
use tutor_core::model::UserId;

/// Reads and decodes a record, falling back to `T::default()` when the record
/// is absent or its payload does not parse. A payload that fails to parse is
/// treated like a missing record, not an error.
pub(crate) async fn read_or_default<T>(
    records: &Arc<dyn RecordRepository>,
    user: &UserId,
    kind: RecordKind,
) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    let Some(payload) = records.read_record(user, kind).await? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&payload) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(%kind, user = user.as_str(), %err, "malformed record, starting fresh");
            Ok(T::default())
        }
    }
}

/// Encodes and persists a record. Last write wins.
pub(crate) async fn write_json<T>(
    records: &Arc<dyn RecordRepository>,
    user: &UserId,
    kind: RecordKind,
    value: &T,
) -> Result<(), StorageError>
where
    T: Serialize,
{
    let payload =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    records.write_record(user, kind, &payload).await
}
