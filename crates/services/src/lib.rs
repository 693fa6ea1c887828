#![forbid(unsafe_code)]

pub mod achievements;
pub mod app_services;
pub mod content;
pub mod error;
pub mod identity;
pub mod progress;
pub mod projects;
pub mod quiz;

mod records;

pub use tutor_core::Clock;

pub use achievements::{AchievementChecker, AchievementObserver, AchievementService};
pub use app_services::AppServices;
pub use content::CourseDataService;
pub use error::{
    AchievementError, AppServicesError, CourseDataError, ProgressError, ProjectError, QuizError,
};
pub use identity::IdentityService;
pub use progress::{AchievementTrigger, ProgressObserver, ProgressService};
pub use projects::ProjectService;
pub use quiz::{QuizOutcome, QuizService, QuizSession, MAX_QUIZ_QUESTIONS};
