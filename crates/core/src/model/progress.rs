use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::{CourseId, LessonId};
use crate::model::preferences::NotificationPreferences;

//
// ─── COMPLETED COURSES ─────────────────────────────────────────────────────────
//

/// Courses a user has explicitly marked complete.
///
/// Set semantics over an insertion-ordered list so the serialized form stays
/// a plain JSON array. Grows only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CourseId>", into = "Vec<CourseId>")]
pub struct CompletedCourses(Vec<CourseId>);

impl CompletedCourses {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, course_id: &str) -> bool {
        self.0.iter().any(|id| id.as_str() == course_id)
    }

    /// Adds the course. Returns `false` if it was already present.
    pub fn insert(&mut self, course_id: CourseId) -> bool {
        if self.contains(course_id.as_str()) {
            return false;
        }
        self.0.push(course_id);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseId> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<CourseId>> for CompletedCourses {
    fn from(ids: Vec<CourseId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }
}

impl From<CompletedCourses> for Vec<CourseId> {
    fn from(set: CompletedCourses) -> Self {
        set.0
    }
}

//
// ─── COMPLETED LESSONS ─────────────────────────────────────────────────────────
//

/// Per-course sets of completed lesson ids.
///
/// Serialized as `{ "<course>": ["<lesson>", ...] }`. A course whose last
/// lesson is toggled off keeps an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<CourseId, Vec<LessonId>>", into = "BTreeMap<CourseId, Vec<LessonId>>")]
pub struct CompletedLessons(BTreeMap<CourseId, Vec<LessonId>>);

impl CompletedLessons {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, course_id: &str, lesson_id: &str) -> bool {
        self.0
            .get(course_id)
            .is_some_and(|lessons| lessons.iter().any(|id| id.as_str() == lesson_id))
    }

    /// Flip membership of one lesson. Returns `true` if the lesson is now complete.
    pub fn toggle(&mut self, course_id: CourseId, lesson_id: LessonId) -> bool {
        let lessons = self.0.entry(course_id).or_default();
        if let Some(pos) = lessons.iter().position(|id| *id == lesson_id) {
            lessons.remove(pos);
            false
        } else {
            lessons.push(lesson_id);
            true
        }
    }

    /// Number of lesson ids recorded for the course.
    #[must_use]
    pub fn count(&self, course_id: &str) -> usize {
        self.0.get(course_id).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn lessons(&self, course_id: &str) -> &[LessonId] {
        self.0.get(course_id).map_or(&[], Vec::as_slice)
    }
}

impl From<BTreeMap<CourseId, Vec<LessonId>>> for CompletedLessons {
    fn from(mut map: BTreeMap<CourseId, Vec<LessonId>>) -> Self {
        for lessons in map.values_mut() {
            let mut seen: Vec<LessonId> = Vec::with_capacity(lessons.len());
            for id in lessons.drain(..) {
                if !seen.contains(&id) {
                    seen.push(id);
                }
            }
            *lessons = seen;
        }
        Self(map)
    }
}

impl From<CompletedLessons> for BTreeMap<CourseId, Vec<LessonId>> {
    fn from(lessons: CompletedLessons) -> Self {
        lessons.0
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Everything persisted for one identity's progress partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub completed_courses: CompletedCourses,
    pub completed_lessons: CompletedLessons,
    pub notifications: NotificationPreferences,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_courses_dedupes_on_load() {
        let set: CompletedCourses =
            serde_json::from_str(r#"["react-fundamentals","ai-integration","react-fundamentals"]"#)
                .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"["react-fundamentals","ai-integration"]"#
        );
    }

    #[test]
    fn insert_reports_whether_state_changed() {
        let mut set = CompletedCourses::new();
        assert!(set.insert(CourseId::new("a")));
        assert!(!set.insert(CourseId::new("a")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn toggle_is_self_inverse() {
        let mut lessons = CompletedLessons::new();
        assert!(lessons.toggle(CourseId::new("c"), LessonId::new("l1")));
        assert!(lessons.contains("c", "l1"));
        assert!(!lessons.toggle(CourseId::new("c"), LessonId::new("l1")));
        assert!(!lessons.contains("c", "l1"));
        assert_eq!(lessons.count("c"), 0);
    }

    #[test]
    fn emptied_course_keeps_an_empty_list() {
        let mut lessons = CompletedLessons::new();
        lessons.toggle(CourseId::new("c"), LessonId::new("l1"));
        lessons.toggle(CourseId::new("c"), LessonId::new("l1"));
        assert_eq!(serde_json::to_string(&lessons).unwrap(), r#"{"c":[]}"#);
    }

    #[test]
    fn lessons_parse_from_stored_mapping() {
        let lessons: CompletedLessons =
            serde_json::from_str(r#"{"react-fundamentals":["l1","l2","l1"]}"#).unwrap();
        assert_eq!(lessons.count("react-fundamentals"), 2);
        assert_eq!(lessons.count("unknown"), 0);
        assert!(lessons.lessons("unknown").is_empty());
    }

    #[test]
    fn lessons_reject_non_mapping() {
        let parsed = serde_json::from_str::<CompletedLessons>(r#"["l1"]"#);
        assert!(parsed.is_err());
    }
}
