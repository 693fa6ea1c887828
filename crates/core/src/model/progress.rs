use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::CourseId;

/// Lesson count assumed per course when a course document is unavailable.
pub const ASSUMED_LESSONS_PER_COURSE: u32 = 12;

//
// ─── COMPLETED LESSONS ─────────────────────────────────────────────────────────
//

/// Ordered set of completed lesson indices within one course.
///
/// Indices are unique and kept sorted ascending; they are not validated
/// against the course's actual lesson count (that check belongs to the UI).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct CompletedLessons(Vec<u32>);

impl CompletedLessons {
    /// Records a lesson index as completed.
    ///
    /// Returns `true` if the index was newly added, `false` if it was already
    /// present (idempotent).
    pub fn insert(&mut self, index: u32) -> bool {
        match self.0.binary_search(&index) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, index);
                true
            }
        }
    }

    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The completed indices, sorted ascending.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

// Persisted arrays are normalized on read: duplicates collapse, order heals.
impl From<Vec<u32>> for CompletedLessons {
    fn from(mut indices: Vec<u32>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }
}

impl From<CompletedLessons> for Vec<u32> {
    fn from(completed: CompletedLessons) -> Self {
        completed.0
    }
}

//
// ─── PROGRESS MAP ──────────────────────────────────────────────────────────────
//

/// Per-user mapping from course id to completed lesson indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap(BTreeMap<CourseId, CompletedLessons>);

impl ProgressMap {
    /// Marks a lesson complete. Returns `true` when the index was newly added.
    pub fn mark(&mut self, course: &CourseId, lesson_index: u32) -> bool {
        self.0.entry(course.clone()).or_default().insert(lesson_index)
    }

    /// Completed lesson indices for a course, empty if none recorded.
    #[must_use]
    pub fn completed(&self, course: &CourseId) -> &[u32] {
        self.0.get(course).map_or(&[], CompletedLessons::as_slice)
    }

    /// Removes a course's entry entirely. Returns `true` if one existed.
    pub fn reset(&mut self, course: &CourseId) -> bool {
        self.0.remove(course).is_some()
    }

    /// Total completed lessons across all courses.
    #[must_use]
    pub fn total_completed(&self) -> u32 {
        self.0
            .values()
            .map(|c| u32::try_from(c.len()).unwrap_or(u32::MAX))
            .fold(0, u32::saturating_add)
    }

    /// Number of courses with at least one completed lesson.
    #[must_use]
    pub fn courses_started(&self) -> usize {
        self.0.values().filter(|c| !c.is_empty()).count()
    }

    /// Largest completed-lesson count in any single course.
    #[must_use]
    pub fn max_in_single_course(&self) -> usize {
        self.0.values().map(CompletedLessons::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CourseId, &CompletedLessons)> {
        self.0.iter()
    }

    /// Aggregate progress across all started courses, assuming
    /// `ASSUMED_LESSONS_PER_COURSE` lessons per course.
    #[must_use]
    pub fn overall(&self) -> OverallProgress {
        let completed = self.total_completed();
        let total = u32::try_from(self.0.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(ASSUMED_LESSONS_PER_COURSE);
        OverallProgress {
            completed,
            total,
            percentage: completion_percentage(completed, total),
        }
    }
}

/// Aggregate progress across all courses a user has touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallProgress {
    pub completed: u32,
    pub total: u32,
    pub percentage: u8,
}

/// Completion percentage, 0-100 rounded to the nearest integer.
///
/// `total == 0` yields 0 rather than dividing by zero.
#[must_use]
pub fn completion_percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = u64::from(completed);
    let total = u64::from(total);
    let rounded = (100 * completed + total / 2) / total;
    u8::try_from(rounded).unwrap_or(u8::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
