//! Course progress tracking.

use std::sync::Arc;

use storage::repository::{RecordKind, RecordRepository};
use tutor_core::model::{
    ASSUMED_LESSONS_PER_COURSE, CourseId, OverallProgress, ProgressMap, UserId,
    completion_percentage,
};

use crate::error::ProgressError;
use crate::records::{read_or_default, write_json};

/// Notified after every persisted progress change with the course's full
/// completed-index list.
pub trait ProgressObserver: Send + Sync {
    fn progress_updated(&self, course: &CourseId, completed: &[u32]);
}

/// Kicks off an achievement check for a user. Implementations are expected to
/// run the check out of band.
pub trait AchievementTrigger: Send + Sync {
    fn trigger(&self, user: &UserId);
}

/// Reads and mutates a user's per-course progress record.
#[derive(Clone)]
pub struct ProgressService {
    records: Arc<dyn RecordRepository>,
    observer: Option<Arc<dyn ProgressObserver>>,
    achievements: Option<Arc<dyn AchievementTrigger>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(records: Arc<dyn RecordRepository>) -> Self {
        Self {
            records,
            observer: None,
            achievements: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn with_achievement_trigger(mut self, trigger: Arc<dyn AchievementTrigger>) -> Self {
        self.achievements = Some(trigger);
        self
    }

    /// Marks a lesson complete and persists the updated map.
    ///
    /// The write, the observer notification, and the achievement trigger all
    /// happen even when the lesson was already marked; repeating a lesson is
    /// not an error and leaves the stored state unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be read or written.
    pub async fn mark_lesson_complete(
        &self,
        user: &UserId,
        course: &CourseId,
        lesson_index: u32,
    ) -> Result<(), ProgressError> {
        let mut progress: ProgressMap =
            read_or_default(&self.records, user, RecordKind::Progress).await?;
        progress.mark(course, lesson_index);
        write_json(&self.records, user, RecordKind::Progress, &progress).await?;

        if let Some(observer) = &self.observer {
            observer.progress_updated(course, progress.completed(course));
        }
        if let Some(trigger) = &self.achievements {
            trigger.trigger(user);
        }
        Ok(())
    }

    /// Completed lesson indices for one course, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be read.
    pub async fn completed_lessons(
        &self,
        user: &UserId,
        course: &CourseId,
    ) -> Result<Vec<u32>, ProgressError> {
        let progress: ProgressMap =
            read_or_default(&self.records, user, RecordKind::Progress).await?;
        Ok(progress.completed(course).to_vec())
    }

    /// The full progress map for a user.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be read.
    pub async fn progress(&self, user: &UserId) -> Result<ProgressMap, ProgressError> {
        Ok(read_or_default(&self.records, user, RecordKind::Progress).await?)
    }

    /// Drops all recorded progress for one course.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be read or written.
    pub async fn reset_course(&self, user: &UserId, course: &CourseId) -> Result<(), ProgressError> {
        let mut progress: ProgressMap =
            read_or_default(&self.records, user, RecordKind::Progress).await?;
        progress.reset(course);
        write_json(&self.records, user, RecordKind::Progress, &progress).await?;

        if let Some(observer) = &self.observer {
            observer.progress_updated(course, &[]);
        }
        Ok(())
    }

    /// Completion percentage for one course given its actual lesson count.
    /// Falls back to `ASSUMED_LESSONS_PER_COURSE` when `lesson_count` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be read.
    pub async fn course_percentage(
        &self,
        user: &UserId,
        course: &CourseId,
        lesson_count: Option<u32>,
    ) -> Result<u8, ProgressError> {
        let progress: ProgressMap =
            read_or_default(&self.records, user, RecordKind::Progress).await?;
        let done = u32::try_from(progress.completed(course).len()).unwrap_or(u32::MAX);
        let total = lesson_count.unwrap_or(ASSUMED_LESSONS_PER_COURSE);
        Ok(completion_percentage(done, total))
    }

    /// Aggregate progress across all started courses.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be read.
    pub async fn overall(&self, user: &UserId) -> Result<OverallProgress, ProgressError> {
        let progress: ProgressMap =
            read_or_default(&self.records, user, RecordKind::Progress).await?;
        Ok(progress.overall())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use storage::repository::InMemoryRepository;

    fn user() -> UserId {
        UserId::new("user_progress1")
    }

    fn course(id: &str) -> CourseId {
        CourseId::new(id)
    }

    fn service() -> ProgressService {
        ProgressService::new(Arc::new(InMemoryRepository::new()))
    }

    #[derive(Default)]
    struct RecordingObserver {
        seen: Mutex<Vec<(CourseId, Vec<u32>)>>,
    }

    impl ProgressObserver for RecordingObserver {
        fn progress_updated(&self, course: &CourseId, completed: &[u32]) {
            self.seen
                .lock()
                .unwrap()
                .push((course.clone(), completed.to_vec()));
        }
    }

    #[derive(Default)]
    struct RecordingTrigger {
        fired: Mutex<Vec<UserId>>,
    }

    impl AchievementTrigger for RecordingTrigger {
        fn trigger(&self, user: &UserId) {
            self.fired.lock().unwrap().push(user.clone());
        }
    }

    #[tokio::test]
    async fn marking_persists_sorted_unique_indices() {
        let svc = service();
        svc.mark_lesson_complete(&user(), &course("html"), 2)
            .await
            .unwrap();
        svc.mark_lesson_complete(&user(), &course("html"), 0)
            .await
            .unwrap();
        svc.mark_lesson_complete(&user(), &course("html"), 2)
            .await
            .unwrap();

        let completed = svc.completed_lessons(&user(), &course("html")).await.unwrap();
        assert_eq!(completed, vec![0, 2]);
    }

    #[tokio::test]
    async fn repeat_marks_still_notify() {
        let observer = Arc::new(RecordingObserver::default());
        let trigger = Arc::new(RecordingTrigger::default());
        let svc = service()
            .with_observer(observer.clone())
            .with_achievement_trigger(trigger.clone());

        svc.mark_lesson_complete(&user(), &course("css"), 1)
            .await
            .unwrap();
        svc.mark_lesson_complete(&user(), &course("css"), 1)
            .await
            .unwrap();

        let seen = observer.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], (course("css"), vec![1]));
        assert_eq!(trigger.fired.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reset_clears_one_course_only() {
        let svc = service();
        svc.mark_lesson_complete(&user(), &course("html"), 0)
            .await
            .unwrap();
        svc.mark_lesson_complete(&user(), &course("css"), 3)
            .await
            .unwrap();

        svc.reset_course(&user(), &course("html")).await.unwrap();

        assert!(svc
            .completed_lessons(&user(), &course("html"))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            svc.completed_lessons(&user(), &course("css")).await.unwrap(),
            vec![3]
        );
    }

    #[tokio::test]
    async fn percentage_uses_actual_count_when_known() {
        let svc = service();
        for index in 0..3 {
            svc.mark_lesson_complete(&user(), &course("html"), index)
                .await
                .unwrap();
        }

        assert_eq!(
            svc.course_percentage(&user(), &course("html"), Some(6))
                .await
                .unwrap(),
            50
        );
        assert_eq!(
            svc.course_percentage(&user(), &course("html"), None)
                .await
                .unwrap(),
            25
        );
    }

    #[tokio::test]
    async fn overall_assumes_twelve_lessons_per_course() {
        let svc = service();
        for index in 0..6 {
            svc.mark_lesson_complete(&user(), &course("html"), index)
                .await
                .unwrap();
        }
        svc.mark_lesson_complete(&user(), &course("css"), 0)
            .await
            .unwrap();

        let overall = svc.overall(&user()).await.unwrap();
        assert_eq!(overall.completed, 7);
        assert_eq!(overall.total, 24);
        assert_eq!(overall.percentage, 29);
    }
}
