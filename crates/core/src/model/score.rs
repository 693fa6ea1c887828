use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::{CourseId, RecordId};
use crate::model::progress::completion_percentage;

/// One persisted quiz result. Append-only; never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScoreRecord {
    course_id: CourseId,
    score: u32,
    total: u32,
    percentage: u8,
    timestamp: DateTime<Utc>,
}

impl QuizScoreRecord {
    /// Builds a score record, computing the rounded percentage.
    #[must_use]
    pub fn new(course_id: CourseId, score: u32, total: u32, recorded_at: DateTime<Utc>) -> Self {
        Self {
            course_id,
            score,
            total,
            percentage: completion_percentage(score, total),
            timestamp: recorded_at,
        }
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Per-user history of quiz results, keyed by generated record id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizScores(BTreeMap<RecordId, QuizScoreRecord>);

impl QuizScores {
    /// Appends a record under a freshly generated id and returns the id.
    pub fn append(&mut self, record: QuizScoreRecord) -> RecordId {
        let id = RecordId::generate(record.course_id());
        self.0.insert(id.clone(), record);
        id
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&QuizScoreRecord> {
        self.0.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest percentage across all recorded attempts.
    #[must_use]
    pub fn best_percentage(&self) -> Option<u8> {
        self.0.values().map(QuizScoreRecord::percentage).max()
    }

    pub fn records(&self) -> impl Iterator<Item = (&RecordId, &QuizScoreRecord)> {
        self.0.iter()
    }
}
