use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::model::ids::ParseIdError;
use crate::model::progress::ProgressMap;
use crate::model::score::QuizScores;

/// Quiz percentage that qualifies for `QuizMaster`.
pub const QUIZ_MASTER_PERCENTAGE: u8 = 80;
/// Completed lessons in one course that qualify for `FirstCourse`.
pub const FIRST_COURSE_LESSONS: usize = 12;
/// Distinct started courses that qualify for `Polyglot`.
pub const POLYGLOT_COURSES: usize = 3;

//
// ─── ACHIEVEMENT IDS ───────────────────────────────────────────────────────────
//

/// Identifier of an achievement; persisted as its snake_case string form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstLesson,
    FiveLessons,
    TenLessons,
    FirstCourse,
    QuizMaster,
    Polyglot,
}

impl AchievementId {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstLesson => "first_lesson",
            AchievementId::FiveLessons => "five_lessons",
            AchievementId::TenLessons => "ten_lessons",
            AchievementId::FirstCourse => "first_course",
            AchievementId::QuizMaster => "quiz_master",
            AchievementId::Polyglot => "polyglot",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AchievementId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_lesson" => Ok(AchievementId::FirstLesson),
            "five_lessons" => Ok(AchievementId::FiveLessons),
            "ten_lessons" => Ok(AchievementId::TenLessons),
            "first_course" => Ok(AchievementId::FirstCourse),
            "quiz_master" => Ok(AchievementId::QuizMaster),
            "polyglot" => Ok(AchievementId::Polyglot),
            _ => Err(ParseIdError::new("AchievementId")),
        }
    }
}

//
// ─── DEFINITIONS ───────────────────────────────────────────────────────────────
//

/// A milestone definition: unlocked once its predicate over a user's progress
/// and quiz history becomes true, shown at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

static ALL: [Achievement; 6] = [
    Achievement {
        id: AchievementId::FirstLesson,
        title: "First Steps",
        description: "Complete your first lesson",
        icon: "fas fa-star",
    },
    Achievement {
        id: AchievementId::FiveLessons,
        title: "Learning Machine",
        description: "Complete 5 lessons",
        icon: "fas fa-graduation-cap",
    },
    Achievement {
        id: AchievementId::TenLessons,
        title: "Knowledge Seeker",
        description: "Complete 10 lessons",
        icon: "fas fa-book",
    },
    Achievement {
        id: AchievementId::FirstCourse,
        title: "Course Conqueror",
        description: "Complete your first course",
        icon: "fas fa-trophy",
    },
    Achievement {
        id: AchievementId::QuizMaster,
        title: "Quiz Master",
        description: "Score 80% or higher on any quiz",
        icon: "fas fa-brain",
    },
    Achievement {
        id: AchievementId::Polyglot,
        title: "Polyglot",
        description: "Complete lessons in 3 different courses",
        icon: "fas fa-language",
    },
];

impl Achievement {
    /// The fixed set of achievement definitions.
    #[must_use]
    pub fn all() -> &'static [Achievement] {
        &ALL
    }

    /// Looks up a definition by id.
    #[must_use]
    pub fn by_id(id: AchievementId) -> &'static Achievement {
        match id {
            AchievementId::FirstLesson => &ALL[0],
            AchievementId::FiveLessons => &ALL[1],
            AchievementId::TenLessons => &ALL[2],
            AchievementId::FirstCourse => &ALL[3],
            AchievementId::QuizMaster => &ALL[4],
            AchievementId::Polyglot => &ALL[5],
        }
    }

    /// Whether this achievement's predicate holds for the given history.
    #[must_use]
    pub fn qualifies(&self, progress: &ProgressMap, scores: &QuizScores) -> bool {
        match self.id {
            AchievementId::FirstLesson => progress.total_completed() >= 1,
            AchievementId::FiveLessons => progress.total_completed() >= 5,
            AchievementId::TenLessons => progress.total_completed() >= 10,
            AchievementId::FirstCourse => progress.max_in_single_course() >= FIRST_COURSE_LESSONS,
            AchievementId::QuizMaster => scores
                .best_percentage()
                .is_some_and(|p| p >= QUIZ_MASTER_PERCENTAGE),
            AchievementId::Polyglot => progress.courses_started() >= POLYGLOT_COURSES,
        }
    }
}

//
// ─── UNLOCKED SET ──────────────────────────────────────────────────────────────
//

/// Achievements already shown to a user. Grows monotonically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockedSet(BTreeSet<AchievementId>);

impl UnlockedSet {
    #[must_use]
    pub fn contains(&self, id: AchievementId) -> bool {
        self.0.contains(&id)
    }

    /// Returns `true` if the id was newly added.
    pub fn insert(&mut self, id: AchievementId) -> bool {
        self.0.insert(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AchievementId> + '_ {
        self.0.iter().copied()
    }
}

/// Evaluates the full definition set against a user's history.
///
/// Returns the achievements that newly qualify and are not already in
/// `unlocked`, adding their ids to `unlocked` as a side effect. Each
/// achievement therefore unlocks at most once.
pub fn evaluate(
    progress: &ProgressMap,
    scores: &QuizScores,
    unlocked: &mut UnlockedSet,
) -> Vec<&'static Achievement> {
    Achievement::all()
        .iter()
        .filter(|achievement| {
            achievement.qualifies(progress, scores) && unlocked.insert(achievement.id)
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::CourseId;
    use crate::model::score::QuizScoreRecord;
    use crate::time::fixed_now;

    fn progress_with(counts: &[(&str, u32)]) -> ProgressMap {
        let mut progress = ProgressMap::default();
        for (course, lessons) in counts {
            let course = CourseId::new(*course);
            for index in 0..*lessons {
                progress.mark(&course, index);
            }
        }
        progress
    }

    fn scores_with(percent_score: u32, total: u32) -> QuizScores {
        let mut scores = QuizScores::default();
        scores.append(QuizScoreRecord::new(
            CourseId::new("html"),
            percent_score,
            total,
            fixed_now(),
        ));
        scores
    }

    #[test]
    fn first_lesson_unlocks_after_any_completion() {
        let mut unlocked = UnlockedSet::default();
        let newly = evaluate(
            &progress_with(&[("html", 1)]),
            &QuizScores::default(),
            &mut unlocked,
        );
        assert_eq!(newly.len(), 1);
        assert_eq!(newly[0].id, AchievementId::FirstLesson);
        assert!(unlocked.contains(AchievementId::FirstLesson));
    }

    #[test]
    fn already_unlocked_is_never_returned_again() {
        let progress = progress_with(&[("html", 1)]);
        let scores = QuizScores::default();
        let mut unlocked = UnlockedSet::default();

        let first = evaluate(&progress, &scores, &mut unlocked);
        assert_eq!(first.len(), 1);

        // predicate still holds, but the id is already in the set
        let second = evaluate(&progress, &scores, &mut unlocked);
        assert!(second.is_empty());
        assert_eq!(unlocked.len(), 1);
    }

    #[test]
    fn lesson_count_tiers() {
        let mut unlocked = UnlockedSet::default();
        let newly = evaluate(
            &progress_with(&[("html", 6), ("css", 4)]),
            &QuizScores::default(),
            &mut unlocked,
        );
        let ids: Vec<_> = newly.iter().map(|a| a.id).collect();
        assert!(ids.contains(&AchievementId::FirstLesson));
        assert!(ids.contains(&AchievementId::FiveLessons));
        assert!(ids.contains(&AchievementId::TenLessons));
        assert!(!ids.contains(&AchievementId::FirstCourse));
    }

    #[test]
    fn first_course_needs_twelve_in_one_course() {
        let progress = progress_with(&[("html", 12)]);
        let mut unlocked = UnlockedSet::default();
        let ids: Vec<_> = evaluate(&progress, &QuizScores::default(), &mut unlocked)
            .iter()
            .map(|a| a.id)
            .collect();
        assert!(ids.contains(&AchievementId::FirstCourse));
    }

    #[test]
    fn quiz_master_requires_eighty_percent() {
        let mut unlocked = UnlockedSet::default();
        let newly = evaluate(
            &ProgressMap::default(),
            &scores_with(8, 10),
            &mut unlocked,
        );
        assert_eq!(newly.len(), 1);
        assert_eq!(newly[0].id, AchievementId::QuizMaster);

        let mut unlocked = UnlockedSet::default();
        let newly = evaluate(
            &ProgressMap::default(),
            &scores_with(7, 10),
            &mut unlocked,
        );
        assert!(newly.is_empty());
    }

    #[test]
    fn polyglot_counts_distinct_started_courses() {
        let progress = progress_with(&[("html", 1), ("css", 1), ("python", 1)]);
        let mut unlocked = UnlockedSet::default();
        let ids: Vec<_> = evaluate(&progress, &QuizScores::default(), &mut unlocked)
            .iter()
            .map(|a| a.id)
            .collect();
        assert!(ids.contains(&AchievementId::Polyglot));
    }

    #[test]
    fn ids_serialize_as_snake_case_strings() {
        let mut unlocked = UnlockedSet::default();
        unlocked.insert(AchievementId::QuizMaster);
        unlocked.insert(AchievementId::FirstLesson);
        let json = serde_json::to_string(&unlocked).unwrap();
        assert_eq!(json, r#"["first_lesson","quiz_master"]"#);
    }

    #[test]
    fn by_id_returns_the_matching_definition() {
        for achievement in Achievement::all() {
            assert_eq!(Achievement::by_id(achievement.id), achievement);
        }
        assert_eq!(Achievement::by_id(AchievementId::QuizMaster).title, "Quiz Master");
    }

    #[test]
    fn id_string_roundtrip() {
        for achievement in Achievement::all() {
            let parsed: AchievementId = achievement.id.as_str().parse().unwrap();
            assert_eq!(parsed, achievement.id);
        }
        assert!("unknown_badge".parse::<AchievementId>().is_err());
    }
}
