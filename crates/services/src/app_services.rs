use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::achievements::{AchievementChecker, AchievementService};
use crate::content::CourseDataService;
use crate::error::AppServicesError;
use crate::identity::IdentityService;
use crate::progress::ProgressService;
use crate::projects::ProjectService;
use crate::quiz::QuizService;

/// Assembles the app-facing services over one storage backend, with
/// progress and quiz submissions wired to trigger achievement checks.
#[derive(Clone)]
pub struct AppServices {
    identity: Arc<IdentityService>,
    progress: Arc<ProgressService>,
    quizzes: Arc<QuizService>,
    achievements: Arc<AchievementService>,
    course_data: Arc<CourseDataService>,
    projects: Arc<ProjectService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage with a JSON-file identity
    /// mirror.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        identity_mirror: impl Into<PathBuf>,
        content_base_url: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url, identity_mirror).await?;
        Ok(Self::from_storage(&storage, content_base_url, clock))
    }

    /// Build services over an already-constructed storage backend.
    #[must_use]
    pub fn from_storage(storage: &Storage, content_base_url: &str, clock: Clock) -> Self {
        let identity = Arc::new(IdentityService::new(
            Arc::clone(&storage.identity),
            Arc::clone(&storage.identity_mirror),
            clock,
        ));
        let achievements = Arc::new(AchievementService::new(Arc::clone(&storage.records)));
        let trigger = Arc::new(AchievementChecker(Arc::clone(&achievements)));

        let progress = Arc::new(
            ProgressService::new(Arc::clone(&storage.records))
                .with_achievement_trigger(trigger.clone()),
        );
        let quizzes = Arc::new(
            QuizService::new(Arc::clone(&storage.records), clock)
                .with_achievement_trigger(trigger),
        );
        let course_data = Arc::new(CourseDataService::new(content_base_url));
        let projects = Arc::new(ProjectService::new(
            content_base_url,
            Arc::clone(&storage.records),
        ));

        Self {
            identity,
            progress,
            quizzes,
            achievements,
            course_data,
            projects,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Arc<IdentityService> {
        Arc::clone(&self.identity)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn achievements(&self) -> Arc<AchievementService> {
        Arc::clone(&self.achievements)
    }

    #[must_use]
    pub fn course_data(&self) -> Arc<CourseDataService> {
        Arc::clone(&self.course_data)
    }

    #[must_use]
    pub fn projects(&self) -> Arc<ProjectService> {
        Arc::clone(&self.projects)
    }
}
