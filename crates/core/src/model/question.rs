use thiserror::Error;

/// Every question presents exactly four answer options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("expected exactly {OPTION_COUNT} options, got {got}")]
    WrongOptionCount { got: usize },

    #[error("correct option index {index} out of range")]
    CorrectIndexOutOfRange { index: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct: usize,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or any option is empty, or if
    /// `correct` does not index into the options.
    pub fn new(
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        for (index, option) in options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption { index });
            }
        }
        if correct >= OPTION_COUNT {
            return Err(QuestionError::CorrectIndexOutOfRange { index: correct });
        }

        Ok(Self {
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Index of the correct option, always in `[0, OPTION_COUNT)`.
    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
