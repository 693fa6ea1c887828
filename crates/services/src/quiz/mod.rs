//! Quiz sessions and persisted quiz scores.

mod service;
mod session;

pub use service::{MAX_QUIZ_QUESTIONS, QuizService};
pub use session::{QuizOutcome, QuizSession};
