//! Anonymous user identity resolution.
//!
//! The identity token lives in two backends at once: a durable primary and a
//! best-effort mirror. Either surviving is enough to keep the same user.

use std::sync::Arc;

use rand::Rng;

use storage::repository::IdentityRepository;
use tutor_core::Clock;
use tutor_core::model::UserId;

const RANDOM_CHARS: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Resolves the anonymous user id, generating one on first use.
#[derive(Clone)]
pub struct IdentityService {
    identity: Arc<dyn IdentityRepository>,
    mirror: Arc<dyn IdentityRepository>,
    clock: Clock,
}

impl IdentityService {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityRepository>,
        mirror: Arc<dyn IdentityRepository>,
        clock: Clock,
    ) -> Self {
        Self {
            identity,
            mirror,
            clock,
        }
    }

    /// Returns the stored user id, consulting the primary backend first and
    /// the mirror second. When neither has one, generates a fresh id and
    /// stores it in both.
    ///
    /// This never fails: a backend that cannot be read or written is logged
    /// and skipped, and in the worst case the caller gets a fresh id that
    /// only lives in memory.
    pub async fn get_or_create(&self) -> UserId {
        if let Some(user) = self.load_from(&self.identity, "primary").await {
            return user;
        }
        if let Some(user) = self.load_from(&self.mirror, "mirror").await {
            return user;
        }

        let user = self.generate();
        self.store_to(&self.identity, "primary", &user).await;
        self.store_to(&self.mirror, "mirror", &user).await;
        user
    }

    async fn load_from(&self, backend: &Arc<dyn IdentityRepository>, name: &str) -> Option<UserId> {
        match backend.load_user_id().await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(backend = name, %err, "identity backend unreadable");
                None
            }
        }
    }

    async fn store_to(&self, backend: &Arc<dyn IdentityRepository>, name: &str, user: &UserId) {
        if let Err(err) = backend.store_user_id(user).await {
            tracing::warn!(backend = name, %err, "failed to persist identity");
        }
    }

    /// Generates a fresh id of the form `user_<9 random base-36 chars><millis base-36>`.
    fn generate(&self) -> UserId {
        let mut rng = rand::rng();
        let mut id = String::from("user_");
        for _ in 0..RANDOM_CHARS {
            let idx = rng.random_range(0..BASE36.len());
            id.push(BASE36[idx] as char);
        }
        let millis = self.clock.now().timestamp_millis().unsigned_abs();
        id.push_str(&to_base36(millis));
        UserId::new(id)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
