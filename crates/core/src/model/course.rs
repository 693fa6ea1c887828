use serde::{Deserialize, Serialize};

use crate::model::question::{OPTION_COUNT, Question, QuestionError};

/// External course document, one JSON file per course.
///
/// Only `lessons` (count) and `quiz.questions` matter to the trackers; the
/// remaining fields ride along for the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDoc {
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<LessonDoc>,
    #[serde(default)]
    pub quiz: Option<QuizDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonDoc {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizDoc {
    #[serde(default)]
    pub questions: Vec<QuestionDoc>,
}

/// Wire shape of a question: `{ question, options[4], correct }`.
///
/// Older documents spell the answer index `correctAnswer`; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionDoc {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, alias = "correctAnswer")]
    pub correct: usize,
}

impl QuestionDoc {
    /// Validates the wire shape into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the option count is not exactly four or any
    /// field fails `Question::new` validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let got = self.options.len();
        let options: [String; OPTION_COUNT] = self
            .options
            .try_into()
            .map_err(|_| QuestionError::WrongOptionCount { got })?;
        Question::new(self.question, options, self.correct)
    }
}

impl CourseDoc {
    /// Number of lessons in the course.
    #[must_use]
    pub fn lesson_count(&self) -> u32 {
        u32::try_from(self.lessons.len()).unwrap_or(u32::MAX)
    }

    /// Collects the valid quiz questions, skipping malformed entries.
    #[must_use]
    pub fn questions(&self) -> Vec<Question> {
        self.quiz
            .iter()
            .flat_map(|quiz| quiz.questions.iter().cloned())
            .filter_map(|doc| doc.into_question().ok())
            .collect()
    }
}
