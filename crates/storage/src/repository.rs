use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tutor_core::model::UserId;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The kinds of user-scoped records this platform persists.
///
/// `as_str` yields the persisted kind names; combined with the user id they
/// form the record key space (`<userId>` + kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Progress,
    QuizScores,
    Achievements,
    CompletedProjects,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordKind::Progress => "courseProgress",
            RecordKind::QuizScores => "quizScores",
            RecordKind::Achievements => "unlockedAchievements",
            RecordKind::CompletedProjects => "completedProjects",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Repository contract for named, user-scoped records.
///
/// Values are JSON-encoded text; decoding (and the malformed-payload-as-absent
/// policy) lives in the services layer.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Fetch the raw payload for a record, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn read_record(
        &self,
        user: &UserId,
        kind: RecordKind,
    ) -> Result<Option<String>, StorageError>;

    /// Persist or replace a record's payload. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload cannot be stored.
    async fn write_record(
        &self,
        user: &UserId,
        kind: RecordKind,
        payload: &str,
    ) -> Result<(), StorageError>;

    /// Remove a record entirely. Deleting an absent record is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn delete_record(&self, user: &UserId, kind: RecordKind) -> Result<(), StorageError>;
}

/// Repository contract for the anonymous user identity token.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Load the stored identity, `None` if absent (or expired, for backends
    /// with a retention window).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_user_id(&self) -> Result<Option<UserId>, StorageError>;

    /// Persist the identity token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be stored.
    async fn store_user_id(&self, user: &UserId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<HashMap<(UserId, RecordKind), String>>>,
    identity: Arc<Mutex<Option<UserId>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn read_record(
        &self,
        user: &UserId,
        kind: RecordKind,
    ) -> Result<Option<String>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(user.clone(), kind)).cloned())
    }

    async fn write_record(
        &self,
        user: &UserId,
        kind: RecordKind,
        payload: &str,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((user.clone(), kind), payload.to_owned());
        Ok(())
    }

    async fn delete_record(&self, user: &UserId, kind: RecordKind) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&(user.clone(), kind));
        Ok(())
    }
}

#[async_trait]
impl IdentityRepository for InMemoryRepository {
    async fn load_user_id(&self) -> Result<Option<UserId>, StorageError> {
        let guard = self
            .identity
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn store_user_id(&self, user: &UserId) -> Result<(), StorageError> {
        let mut guard = self
            .identity
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(user.clone());
        Ok(())
    }
}

/// Aggregates the record store and both identity backends behind trait
/// objects for easy backend swapping.
///
/// The identity token is persisted redundantly: `identity` is the primary
/// backend, `identity_mirror` the secondary one consulted when the primary
/// has lost the token.
#[derive(Clone)]
pub struct Storage {
    pub records: Arc<dyn RecordRepository>,
    pub identity: Arc<dyn IdentityRepository>,
    pub identity_mirror: Arc<dyn IdentityRepository>,
}

impl Storage {
    /// Build a fully in-memory `Storage` (two independent identity backends).
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let records: Arc<dyn RecordRepository> = Arc::new(repo.clone());
        let identity: Arc<dyn IdentityRepository> = Arc::new(repo);
        let identity_mirror: Arc<dyn IdentityRepository> = Arc::new(InMemoryRepository::new());
        Self {
            records,
            identity,
            identity_mirror,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("user_test01")
    }

    #[tokio::test]
    async fn read_back_what_was_written() {
        let repo = InMemoryRepository::new();
        repo.write_record(&user(), RecordKind::Progress, r#"{"html":[0]}"#)
            .await
            .unwrap();

        let payload = repo
            .read_record(&user(), RecordKind::Progress)
            .await
            .unwrap();
        assert_eq!(payload.as_deref(), Some(r#"{"html":[0]}"#));
    }

    #[tokio::test]
    async fn records_are_scoped_by_user_and_kind() {
        let repo = InMemoryRepository::new();
        repo.write_record(&user(), RecordKind::Progress, "{}")
            .await
            .unwrap();

        let other = UserId::new("user_other");
        assert!(repo
            .read_record(&other, RecordKind::Progress)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .read_record(&user(), RecordKind::QuizScores)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemoryRepository::new();
        repo.write_record(&user(), RecordKind::Achievements, "[]")
            .await
            .unwrap();
        repo.delete_record(&user(), RecordKind::Achievements)
            .await
            .unwrap();
        repo.delete_record(&user(), RecordKind::Achievements)
            .await
            .unwrap();
        assert!(repo
            .read_record(&user(), RecordKind::Achievements)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn identity_backends_are_independent() {
        let storage = Storage::in_memory();
        storage.identity.store_user_id(&user()).await.unwrap();

        assert_eq!(storage.identity.load_user_id().await.unwrap(), Some(user()));
        assert!(storage.identity_mirror.load_user_id().await.unwrap().is_none());
    }
}
