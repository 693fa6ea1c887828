use std::sync::Arc;

use storage::repository::{RecordKind, RecordRepository};
use tutor_core::Clock;
use tutor_core::model::{CourseId, Question, QuizScoreRecord, QuizScores, RecordId, UserId};

use crate::error::QuizError;
use crate::progress::AchievementTrigger;
use crate::quiz::QuizSession;
use crate::records::{read_or_default, write_json};

/// Upper bound on questions drawn into one session.
pub const MAX_QUIZ_QUESTIONS: usize = 10;

/// Starts quiz sessions and persists their outcomes.
#[derive(Clone)]
pub struct QuizService {
    records: Arc<dyn RecordRepository>,
    achievements: Option<Arc<dyn AchievementTrigger>>,
    clock: Clock,
}

impl QuizService {
    #[must_use]
    pub fn new(records: Arc<dyn RecordRepository>, clock: Clock) -> Self {
        Self {
            records,
            achievements: None,
            clock,
        }
    }

    #[must_use]
    pub fn with_achievement_trigger(mut self, trigger: Arc<dyn AchievementTrigger>) -> Self {
        self.achievements = Some(trigger);
        self
    }

    /// Draws up to `MAX_QUIZ_QUESTIONS` questions into a new session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when the pool has no questions.
    pub fn start_session(&self, pool: Vec<Question>) -> Result<QuizSession, QuizError> {
        QuizSession::start(pool, MAX_QUIZ_QUESTIONS)
    }

    /// Submits a session, appends the result to the user's score history, and
    /// kicks off an achievement check.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` on a second submit, or a storage
    /// error if the history cannot be persisted.
    pub async fn submit(
        &self,
        user: &UserId,
        course: &CourseId,
        session: &mut QuizSession,
    ) -> Result<RecordId, QuizError> {
        let outcome = session.submit()?;

        let mut scores: QuizScores =
            read_or_default(&self.records, user, RecordKind::QuizScores).await?;
        let record = QuizScoreRecord::new(
            course.clone(),
            outcome.score,
            outcome.total,
            self.clock.now(),
        );
        let id = scores.append(record);
        write_json(&self.records, user, RecordKind::QuizScores, &scores).await?;

        if let Some(trigger) = &self.achievements {
            trigger.trigger(user);
        }
        Ok(id)
    }

    /// The user's full quiz score history.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the record cannot be read.
    pub async fn scores(&self, user: &UserId) -> Result<QuizScores, QuizError> {
        Ok(read_or_default(&self.records, user, RecordKind::QuizScores).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use storage::repository::InMemoryRepository;
    use tutor_core::model::OPTION_COUNT;
    use tutor_core::time::fixed_clock;

    fn user() -> UserId {
        UserId::new("user_quiz01")
    }

    fn course() -> CourseId {
        CourseId::new("javascript")
    }

    fn pool(size: usize) -> Vec<Question> {
        (0..size)
            .map(|i| {
                Question::new(
                    format!("q{i}"),
                    ["a".into(), "b".into(), "c".into(), "d".into()],
                    i % OPTION_COUNT,
                )
                .unwrap()
            })
            .collect()
    }

    fn service() -> QuizService {
        QuizService::new(Arc::new(InMemoryRepository::new()), fixed_clock())
    }

    #[derive(Default)]
    struct RecordingTrigger {
        fired: Mutex<u32>,
    }

    impl AchievementTrigger for RecordingTrigger {
        fn trigger(&self, _user: &UserId) {
            *self.fired.lock().unwrap() += 1;
        }
    }

    #[tokio::test]
    async fn session_draw_is_capped_at_ten() {
        let svc = service();
        let session = svc.start_session(pool(30)).unwrap();
        assert_eq!(session.question_count(), MAX_QUIZ_QUESTIONS);
    }

    #[tokio::test]
    async fn submit_appends_to_history() {
        let svc = service();

        let mut session = svc.start_session(pool(4)).unwrap();
        for index in 0..session.question_count() {
            session.go_to(index).unwrap();
            let correct = session.current_question().correct_option();
            session.select_answer(correct).unwrap();
        }
        let first = svc.submit(&user(), &course(), &mut session).await.unwrap();

        let mut session = svc.start_session(pool(4)).unwrap();
        let second = svc.submit(&user(), &course(), &mut session).await.unwrap();

        assert_ne!(first, second);
        let scores = svc.scores(&user()).await.unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get(&first).unwrap().percentage(), 100);
        assert_eq!(scores.get(&second).unwrap().percentage(), 0);
    }

    #[tokio::test]
    async fn submit_fires_the_achievement_trigger() {
        let trigger = Arc::new(RecordingTrigger::default());
        let svc = service().with_achievement_trigger(trigger.clone());

        let mut session = svc.start_session(pool(2)).unwrap();
        svc.submit(&user(), &course(), &mut session).await.unwrap();
        assert_eq!(*trigger.fired.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn double_submit_is_rejected_and_not_persisted_twice() {
        let svc = service();
        let mut session = svc.start_session(pool(2)).unwrap();
        svc.submit(&user(), &course(), &mut session).await.unwrap();

        assert!(matches!(
            svc.submit(&user(), &course(), &mut session).await,
            Err(QuizError::AlreadySubmitted)
        ));
        assert_eq!(svc.scores(&user()).await.unwrap().len(), 1);
    }
}
