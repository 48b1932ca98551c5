use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use storage::keys;
use storage::repository::{KeyValueStore, StorageError};
use studio_core::Catalog;
use studio_core::model::{
    CompletedCourses, CompletedLessons, Course, CourseId, Email, LessonId,
    NotificationPreferences, ProgressSnapshot,
};
use studio_core::progress::{self, RoadmapProgress};

use crate::error::ProgressError;

/// Per-identity completion state and its derivations.
///
/// Unbound until a session attaches an identity. While unbound, reads report
/// zero/default values and every mutation is a silent no-op.
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    catalog: Arc<Catalog>,
    partition: Option<Partition>,
}

struct Partition {
    email: Email,
    snapshot: ProgressSnapshot,
}

/// A bound partition together with the port it persists through.
struct Bound<'a> {
    kv: &'a dyn KeyValueStore,
    partition: &'a mut Partition,
}

impl Bound<'_> {
    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ProgressError> {
        let encoded = serde_json::to_string(value)?;
        self.kv.set(key, &encoded).await?;
        debug!(key, "progress persisted");
        Ok(())
    }
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, catalog: Arc<Catalog>) -> Self {
        Self {
            kv,
            catalog,
            partition: None,
        }
    }

    /// Read an identity's partition, substituting defaults for absent or
    /// malformed values.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend itself cannot be read.
    pub async fn load_snapshot(&self, email: &Email) -> Result<ProgressSnapshot, StorageError> {
        let email = email.as_str();
        Ok(ProgressSnapshot {
            completed_courses: read_json::<CompletedCourses>(
                self.kv.as_ref(),
                &keys::completed_courses(email),
            )
            .await?,
            completed_lessons: read_json::<CompletedLessons>(
                self.kv.as_ref(),
                &keys::completed_lessons(email),
            )
            .await?,
            notifications: read_json::<NotificationPreferences>(
                self.kv.as_ref(),
                &keys::notifications(email),
            )
            .await?,
        })
    }

    pub(crate) fn attach(&mut self, email: Email, snapshot: ProgressSnapshot) {
        self.partition = Some(Partition { email, snapshot });
    }

    pub(crate) fn detach(&mut self) {
        self.partition = None;
    }

    /// The single binding guard every mutation goes through.
    fn bound_mut(&mut self) -> Option<Bound<'_>> {
        let partition = self.partition.as_mut()?;
        Some(Bound {
            kv: self.kv.as_ref(),
            partition,
        })
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.partition.is_some()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&ProgressSnapshot> {
        self.partition.as_ref().map(|p| &p.snapshot)
    }

    // ─── Derived reads ─────────────────────────────────────────────────────────

    /// Course progress in `0..=100`.
    #[must_use]
    pub fn course_progress(&self, course_id: &str) -> u8 {
        self.snapshot().map_or(0, |snapshot| {
            progress::course_progress(snapshot, self.catalog.course(course_id))
        })
    }

    #[must_use]
    pub fn is_course_completed(&self, course_id: &str) -> bool {
        self.snapshot()
            .is_some_and(|s| s.completed_courses.contains(course_id))
    }

    /// Completed course ids in completion order; empty when unbound.
    #[must_use]
    pub fn completed_courses(&self) -> Vec<&CourseId> {
        self.snapshot()
            .map(|s| s.completed_courses.iter().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_lesson_complete(&self, course_id: &str, lesson_id: &str) -> bool {
        self.snapshot()
            .is_some_and(|s| s.completed_lessons.contains(course_id, lesson_id))
    }

    #[must_use]
    pub fn notification_preferences(&self) -> NotificationPreferences {
        self.snapshot()
            .map(|s| s.notifications)
            .unwrap_or_default()
    }

    /// Courses with an earned badge, in catalog order.
    #[must_use]
    pub fn badges(&self) -> Vec<&Course> {
        self.snapshot()
            .map(|snapshot| progress::badges(snapshot, &self.catalog))
            .unwrap_or_default()
    }

    /// Step statuses for a learning path, or `None` if the path is unknown.
    #[must_use]
    pub fn roadmap(&self, path_id: &str) -> Option<RoadmapProgress<'_>> {
        let path = self.catalog.path(path_id)?;
        Some(progress::roadmap(path, |course| {
            self.course_progress(course.as_str())
        }))
    }

    // ─── Mutations ─────────────────────────────────────────────────────────────

    /// Flip one lesson's completion mark and persist the whole mapping.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the write fails; in-memory state is then
    /// left unchanged.
    pub async fn toggle_lesson_complete(
        &mut self,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<(), ProgressError> {
        let Some(mut bound) = self.bound_mut() else {
            return Ok(());
        };

        let mut lessons = bound.partition.snapshot.completed_lessons.clone();
        let complete = lessons.toggle(CourseId::new(course_id), LessonId::new(lesson_id));
        let key = keys::completed_lessons(bound.partition.email.as_str());
        bound.write_json(&key, &lessons).await?;
        bound.partition.snapshot.completed_lessons = lessons;

        debug!(course_id, lesson_id, complete, "lesson toggled");
        Ok(())
    }

    /// Mark a course complete. Already-completed courses cause no write.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the write fails.
    pub async fn complete_course(&mut self, course_id: &str) -> Result<(), ProgressError> {
        let Some(mut bound) = self.bound_mut() else {
            return Ok(());
        };
        if bound.partition.snapshot.completed_courses.contains(course_id) {
            return Ok(());
        }

        let mut courses = bound.partition.snapshot.completed_courses.clone();
        courses.insert(CourseId::new(course_id));
        let key = keys::completed_courses(bound.partition.email.as_str());
        bound.write_json(&key, &courses).await?;
        bound.partition.snapshot.completed_courses = courses;

        debug!(course_id, "course completed");
        Ok(())
    }

    /// Replace the stored notification preferences.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the write fails.
    pub async fn update_notification_preferences(
        &mut self,
        prefs: NotificationPreferences,
    ) -> Result<(), ProgressError> {
        let Some(mut bound) = self.bound_mut() else {
            return Ok(());
        };

        let key = keys::notifications(bound.partition.email.as_str());
        bound.write_json(&key, &prefs).await?;
        bound.partition.snapshot.notifications = prefs;
        Ok(())
    }
}

/// Decode a JSON value, treating absence and corruption alike as the default.
async fn read_json<T>(kv: &dyn KeyValueStore, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = kv.get(key).await? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(key, error = %err, "ignoring malformed stored value");
            Ok(T::default())
        }
    }
}
