//! Achievement evaluation, unlock persistence, and background polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use storage::repository::{RecordKind, RecordRepository};
use tutor_core::model::{Achievement, ProgressMap, QuizScores, UnlockedSet, UserId, evaluate};

use crate::error::AchievementError;
use crate::progress::AchievementTrigger;
use crate::records::{read_or_default, write_json};

/// Interval between background achievement sweeps.
pub const POLL_PERIOD: Duration = Duration::from_secs(30);

/// Notified once per newly unlocked achievement.
pub trait AchievementObserver: Send + Sync {
    fn achievement_unlocked(&self, achievement: &'static Achievement);
}

/// Evaluates achievement criteria against stored progress and quiz scores,
/// persisting unlocks so each fires exactly once.
pub struct AchievementService {
    records: Arc<dyn RecordRepository>,
    observer: Option<Arc<dyn AchievementObserver>>,
}

impl AchievementService {
    #[must_use]
    pub fn new(records: Arc<dyn RecordRepository>) -> Self {
        Self {
            records,
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AchievementObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Runs one sweep: loads the user's state, unlocks every achievement
    /// whose criteria now hold, persists the unlock set if it grew, and
    /// notifies the observer per new unlock. Returns the new unlocks.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError` if any record cannot be read or the unlock
    /// set cannot be written.
    pub async fn check(&self, user: &UserId) -> Result<Vec<&'static Achievement>, AchievementError> {
        let progress: ProgressMap =
            read_or_default(&self.records, user, RecordKind::Progress).await?;
        let scores: QuizScores =
            read_or_default(&self.records, user, RecordKind::QuizScores).await?;
        let mut unlocked: UnlockedSet =
            read_or_default(&self.records, user, RecordKind::Achievements).await?;

        let new = evaluate(&progress, &scores, &mut unlocked);
        if !new.is_empty() {
            write_json(&self.records, user, RecordKind::Achievements, &unlocked).await?;
            if let Some(observer) = &self.observer {
                for achievement in &new {
                    observer.achievement_unlocked(achievement);
                }
            }
        }
        Ok(new)
    }

    /// The user's persisted unlock set.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError` if the record cannot be read.
    pub async fn unlocked(&self, user: &UserId) -> Result<UnlockedSet, AchievementError> {
        Ok(read_or_default(&self.records, user, RecordKind::Achievements).await?)
    }

    /// Full definitions (title, description, icon) for the user's unlocked
    /// achievements, in id order.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError` if the record cannot be read.
    pub async fn unlocked_achievements(
        &self,
        user: &UserId,
    ) -> Result<Vec<&'static Achievement>, AchievementError> {
        let unlocked = self.unlocked(user).await?;
        Ok(unlocked.ids().map(Achievement::by_id).collect())
    }

    /// Spawns a background task that sweeps the user every `POLL_PERIOD`.
    /// Sweep failures are logged and the loop keeps going. Abort the returned
    /// handle to stop polling.
    pub fn spawn_poller(self: &Arc<Self>, user: UserId) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(POLL_PERIOD);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = service.check(&user).await {
                    tracing::warn!(user = user.as_str(), %err, "achievement sweep failed");
                }
            }
        })
    }
}

/// `AchievementTrigger` adapter that runs a check on the runtime without
/// blocking the caller.
#[derive(Clone)]
pub struct AchievementChecker(pub Arc<AchievementService>);

impl AchievementTrigger for AchievementChecker {
    fn trigger(&self, user: &UserId) {
        let service = Arc::clone(&self.0);
        let user = user.clone();
        tokio::spawn(async move {
            if let Err(err) = service.check(&user).await {
                tracing::warn!(user = user.as_str(), %err, "achievement check failed");
            }
        });
    }
}
