//! JSON-file identity mirror, the secondary backend for the user token.
//!
//! Plays the role a cookie plays in a browser: a second, independent place
//! the identity survives in, with a fixed retention window.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tutor_core::Clock;
use tutor_core::model::UserId;

use crate::repository::{IdentityRepository, StorageError};

/// How long a mirrored identity stays valid.
pub const IDENTITY_RETENTION_DAYS: i64 = 365;

#[derive(Debug, Serialize, Deserialize)]
struct IdentityFile {
    user_id: String,
    expires_at: DateTime<Utc>,
}

/// Identity backend persisted as a small JSON document on disk.
pub struct JsonFileIdentity {
    path: PathBuf,
    clock: Clock,
}

impl JsonFileIdentity {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: Clock::default(),
        }
    }

    /// Use a specific clock for expiry checks (deterministic tests).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl IdentityRepository for JsonFileIdentity {
    async fn load_user_id(&self) -> Result<Option<UserId>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::Unavailable(err.to_string())),
        };

        let file: IdentityFile = match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(err) => {
                // malformed mirror heals on the next store
                tracing::warn!(path = %self.path.display(), %err, "malformed identity mirror");
                return Ok(None);
            }
        };

        if file.expires_at <= self.clock.now() || file.user_id.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(UserId::new(file.user_id)))
    }

    async fn store_user_id(&self, user: &UserId) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        }

        let file = IdentityFile {
            user_id: user.as_str().to_owned(),
            expires_at: self.clock.now() + Duration::days(IDENTITY_RETENTION_DAYS),
        };
        let contents = serde_json::to_string_pretty(&file)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}
