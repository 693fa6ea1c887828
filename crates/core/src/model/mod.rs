mod achievement;
mod course;
mod ids;
mod progress;
mod project;
mod question;
mod score;

pub use achievement::{Achievement, AchievementId, UnlockedSet, evaluate};
pub use course::{CourseDoc, LessonDoc, QuestionDoc, QuizDoc};
pub use ids::{CourseId, ParseIdError, ProjectId, RecordId, UserId};
pub use progress::{
    ASSUMED_LESSONS_PER_COURSE, CompletedLessons, OverallProgress, ProgressMap,
    completion_percentage,
};
pub use project::{CompletedProjects, Project};
pub use question::{OPTION_COUNT, Question, QuestionError};
pub use score::{QuizScoreRecord, QuizScores};
