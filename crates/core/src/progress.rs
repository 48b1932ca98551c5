//! Pure progress derivations over a [`ProgressSnapshot`] and the catalog.

use crate::catalog::Catalog;
use crate::model::{Course, CourseId, LearningPath, ProgressSnapshot, RoadmapStep};

/// Progress reported for a course that is explicitly completed.
pub const COMPLETE: u8 = 100;

/// Highest value lesson arithmetic may report while lessons remain unmarked.
pub const NEARLY_COMPLETE: u8 = 99;

/// Percentage of `completed` out of `total`, rounded half up.
///
/// Returns 0 for an empty course. Never reports 100 while `completed < total`;
/// a result that would round up to 100 is held at 99. Counts above `total`
/// are capped at `total`.
#[must_use]
pub fn lesson_percent(completed: usize, total: usize) -> u8 {
    if total == 0 || completed == 0 {
        return 0;
    }
    let completed = completed.min(total);
    let percent = (200 * completed + total) / (2 * total);
    if percent >= 100 {
        if completed < total {
            return NEARLY_COMPLETE;
        }
        return COMPLETE;
    }
    u8::try_from(percent).unwrap_or(NEARLY_COMPLETE)
}

/// Course progress in `0..=100` for one snapshot.
///
/// Unknown courses (`None`) and courses without lessons report 0. An explicit
/// completion always reports 100, whatever the lesson marks say.
#[must_use]
pub fn course_progress(snapshot: &ProgressSnapshot, course: Option<&Course>) -> u8 {
    let Some(course) = course else {
        return 0;
    };
    if course.lessons().is_empty() {
        return 0;
    }
    if snapshot.completed_courses.contains(course.id().as_str()) {
        return COMPLETE;
    }
    lesson_percent(
        snapshot.completed_lessons.count(course.id().as_str()),
        course.lesson_count(),
    )
}

/// Courses the user holds a badge for, in catalog order.
#[must_use]
pub fn badges<'a>(snapshot: &ProgressSnapshot, catalog: &'a Catalog) -> Vec<&'a Course> {
    catalog
        .courses()
        .iter()
        .filter(|course| snapshot.completed_courses.contains(course.id().as_str()))
        .collect()
}

//
// ─── ROADMAP ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Current,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepProgress<'a> {
    /// 1-based position across all stages.
    pub number: usize,
    pub step: &'a RoadmapStep,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapProgress<'a> {
    pub steps: Vec<StepProgress<'a>>,
    pub completed: usize,
    pub total: usize,
}

impl RoadmapProgress<'_> {
    /// The step the user should work on next, if any.
    #[must_use]
    pub fn current(&self) -> Option<&StepProgress<'_>> {
        self.steps
            .iter()
            .find(|step| step.status == StepStatus::Current)
    }
}

/// Status of every step on a learning path.
///
/// A step is completed when its linked course reports exactly 100. With `c`
/// completed steps, step number `c + 1` is current (unless completed itself);
/// every other unfinished step is locked.
#[must_use]
pub fn roadmap<'a>(
    path: &'a LearningPath,
    mut progress_of: impl FnMut(&CourseId) -> u8,
) -> RoadmapProgress<'a> {
    let done: Vec<(&RoadmapStep, bool)> = path
        .steps()
        .map(|step| {
            let complete = step
                .course_id()
                .is_some_and(|course| progress_of(course) == COMPLETE);
            (step, complete)
        })
        .collect();
    let completed = done.iter().filter(|(_, complete)| *complete).count();

    let steps = done
        .into_iter()
        .enumerate()
        .map(|(index, (step, complete))| {
            let number = index + 1;
            let status = if complete {
                StepStatus::Completed
            } else if number == completed + 1 {
                StepStatus::Current
            } else {
                StepStatus::Locked
            };
            StepProgress {
                number,
                step,
                status,
            }
        })
        .collect::<Vec<_>>();

    RoadmapProgress {
        total: steps.len(),
        steps,
        completed,
    }
}
