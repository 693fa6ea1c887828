use rand::rng;
use rand::seq::SliceRandom;

use tutor_core::model::{OPTION_COUNT, Question};

use crate::error::QuizError;

/// Final tally of a submitted quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub score: u32,
    pub wrong: u32,
    pub unanswered: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    InProgress,
    Submitted,
}

/// One in-memory run through a quiz.
///
/// Construction draws a random subset of up to `max` questions from the pool,
/// then shuffles that subset again for presentation. Answers are stored in
/// each question's canonical option space. Once submitted, the session is
/// read-only; `restart` begins a fresh run over the same drawn subset.
#[derive(Debug, Clone)]
pub struct QuizSession {
    // The drawn subset, kept in draw order so a restart replays the same
    // questions in a new presentation order.
    pool: Vec<Question>,
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    current: usize,
    state: SessionState,
    outcome: Option<QuizOutcome>,
}

impl QuizSession {
    /// Starts a session from a question pool.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when the pool has no questions or `max` is
    /// zero.
    pub fn start(mut pool: Vec<Question>, max: usize) -> Result<Self, QuizError> {
        if pool.is_empty() || max == 0 {
            return Err(QuizError::Empty);
        }
        let mut r = rng();
        pool.shuffle(&mut r);
        pool.truncate(max);

        let mut questions = pool.clone();
        questions.shuffle(&mut r);

        let answers = vec![None; questions.len()];
        Ok(Self {
            pool,
            questions,
            answers,
            current: 0,
            state: SessionState::InProgress,
            outcome: None,
        })
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The recorded answer for each presented question, `None` if unanswered.
    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.state == SessionState::Submitted
    }

    /// The outcome of a submitted session, `None` while in progress.
    #[must_use]
    pub fn outcome(&self) -> Option<QuizOutcome> {
        self.outcome
    }

    /// Records an answer for the current question. An option index outside
    /// the option range is ignored.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` after submission.
    pub fn select_answer(&mut self, option: usize) -> Result<(), QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        if option < OPTION_COUNT {
            self.answers[self.current] = Some(option);
        }
        Ok(())
    }

    /// Moves to the question at `index`. Out-of-range indices are ignored.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` after submission.
    pub fn go_to(&mut self, index: usize) -> Result<(), QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        if index < self.questions.len() {
            self.current = index;
        }
        Ok(())
    }

    /// Moves to the next question, stopping at the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` after submission.
    pub fn next(&mut self) -> Result<(), QuizError> {
        let target = (self.current + 1).min(self.questions.len().saturating_sub(1));
        self.go_to(target)
    }

    /// Moves to the previous question, stopping at the first one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` after submission.
    pub fn previous(&mut self) -> Result<(), QuizError> {
        let target = self.current.saturating_sub(1);
        self.go_to(target)
    }

    /// Grades the session and freezes it. Unanswered questions count toward
    /// neither score nor wrong.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` on a second submit.
    pub fn submit(&mut self) -> Result<QuizOutcome, QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }

        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let mut score: u32 = 0;
        let mut unanswered: u32 = 0;
        for (question, answer) in self.questions.iter().zip(&self.answers) {
            match answer {
                Some(option) if *option == question.correct_option() => score += 1,
                Some(_) => {}
                None => unanswered += 1,
            }
        }
        let outcome = QuizOutcome {
            score,
            wrong: total - score - unanswered,
            unanswered,
            total,
        };

        self.state = SessionState::Submitted;
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    /// Begins a fresh run over the same drawn questions: answers cleared,
    /// presentation order reshuffled.
    pub fn restart(&mut self) {
        let mut r = rng();
        self.questions = self.pool.clone();
        self.questions.shuffle(&mut r);
        self.answers = vec![None; self.questions.len()];
        self.current = 0;
        self.state = SessionState::InProgress;
        self.outcome = None;
    }

    /// A fresh random permutation of option positions for displaying the
    /// current question. Every call reshuffles.
    #[must_use]
    pub fn shuffled_option_order(&self) -> [usize; OPTION_COUNT] {
        let mut order: [usize; OPTION_COUNT] = std::array::from_fn(|i| i);
        let mut r = rng();
        order.shuffle(&mut r);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn question(prompt: &str, correct: usize) -> Question {
        Question::new(
            prompt,
            [
                "option a".into(),
                "option b".into(),
                "option c".into(),
                "option d".into(),
            ],
            correct,
        )
        .unwrap()
    }

    fn pool(size: usize) -> Vec<Question> {
        (0..size).map(|i| question(&format!("q{i}"), i % OPTION_COUNT)).collect()
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert!(matches!(
            QuizSession::start(Vec::new(), 10),
            Err(QuizError::Empty)
        ));
        assert!(matches!(
            QuizSession::start(pool(3), 0),
            Err(QuizError::Empty)
        ));
    }

    #[test]
    fn draws_at_most_max_questions() {
        let session = QuizSession::start(pool(25), 10).unwrap();
        assert_eq!(session.question_count(), 10);

        let session = QuizSession::start(pool(4), 10).unwrap();
        assert_eq!(session.question_count(), 4);
    }

    #[test]
    fn drawn_questions_are_distinct() {
        let session = QuizSession::start(pool(25), 10).unwrap();
        let prompts: HashSet<&str> = session
            .questions()
            .iter()
            .map(Question::prompt)
            .collect();
        assert_eq!(prompts.len(), 10);
    }

    #[test]
    fn grades_correct_wrong_and_unanswered() {
        let mut session = QuizSession::start(pool(3), 10).unwrap();

        // answer q0 correctly, q1 wrongly, leave q2 unanswered
        let correct = session.current_question().correct_option();
        session.select_answer(correct).unwrap();
        session.go_to(1).unwrap();
        let wrong = (session.current_question().correct_option() + 1) % OPTION_COUNT;
        session.select_answer(wrong).unwrap();

        let outcome = session.submit().unwrap();
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.wrong, 1);
        assert_eq!(outcome.unanswered, 1);
        assert_eq!(outcome.total, 3);
        assert_eq!(session.outcome(), Some(outcome));
    }

    #[test]
    fn changing_an_answer_keeps_the_last_choice() {
        let mut session = QuizSession::start(pool(1), 10).unwrap();
        let correct = session.current_question().correct_option();
        let wrong = (correct + 1) % OPTION_COUNT;

        session.select_answer(wrong).unwrap();
        session.select_answer(correct).unwrap();

        let outcome = session.submit().unwrap();
        assert_eq!(outcome.score, 1);
    }

    #[test]
    fn out_of_range_inputs_are_ignored() {
        let mut session = QuizSession::start(pool(2), 10).unwrap();
        session.select_answer(OPTION_COUNT).unwrap();
        assert_eq!(session.answers()[0], None);

        session.go_to(99).unwrap();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut session = QuizSession::start(pool(2), 10).unwrap();
        session.previous().unwrap();
        assert_eq!(session.current_index(), 0);

        session.next().unwrap();
        assert_eq!(session.current_index(), 1);
        session.next().unwrap();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn submitted_session_is_frozen() {
        let mut session = QuizSession::start(pool(2), 10).unwrap();
        session.submit().unwrap();

        assert!(matches!(
            session.select_answer(0),
            Err(QuizError::AlreadySubmitted)
        ));
        assert!(matches!(session.go_to(1), Err(QuizError::AlreadySubmitted)));
        assert!(matches!(session.submit(), Err(QuizError::AlreadySubmitted)));
    }

    #[test]
    fn restart_clears_answers_and_keeps_the_draw() {
        let mut session = QuizSession::start(pool(5), 3).unwrap();
        let drawn: HashSet<String> = session
            .questions()
            .iter()
            .map(|q| q.prompt().to_owned())
            .collect();
        session.select_answer(0).unwrap();
        session.submit().unwrap();

        session.restart();
        assert!(!session.is_submitted());
        assert!(session.outcome().is_none());
        assert!(session.answers().iter().all(Option::is_none));
        assert_eq!(session.current_index(), 0);

        let redrawn: HashSet<String> = session
            .questions()
            .iter()
            .map(|q| q.prompt().to_owned())
            .collect();
        assert_eq!(drawn, redrawn);
    }

    #[test]
    fn option_order_is_a_permutation() {
        let session = QuizSession::start(pool(1), 1).unwrap();
        for _ in 0..50 {
            let mut order = session.shuffled_option_order();
            order.sort_unstable();
            assert_eq!(order, [0, 1, 2, 3]);
        }
    }

    // A biased shuffle would show up as one prompt dominating a position.
    #[test]
    fn draw_positions_look_uniform() {
        let trials = 4000;
        let mut first_counts = [0u32; 4];
        for _ in 0..trials {
            let session = QuizSession::start(pool(4), 4).unwrap();
            let first = session.questions()[0].prompt();
            let index: usize = first[1..].parse().unwrap();
            first_counts[index] += 1;
        }
        // Expected ~1000 each; allow a generous band.
        for count in first_counts {
            assert!((700..=1300).contains(&count), "skewed count: {count}");
        }
    }
}
