use crate::model::ids::{CourseId, PathId};

/// One step on a roadmap, optionally linked to a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapStep {
    id: String,
    title: String,
    description: String,
    course_id: Option<CourseId>,
}

impl RoadmapStep {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        course_id: Option<CourseId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            course_id,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn course_id(&self) -> Option<&CourseId> {
        self.course_id.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStage {
    title: String,
    steps: Vec<RoadmapStep>,
}

impl PathStage {
    #[must_use]
    pub fn new(title: impl Into<String>, steps: Vec<RoadmapStep>) -> Self {
        Self {
            title: title.into(),
            steps,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn steps(&self) -> &[RoadmapStep] {
        &self.steps
    }
}

/// A learning path: ordered stages of roadmap steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningPath {
    id: PathId,
    title: String,
    description: String,
    duration: String,
    stages: Vec<PathStage>,
}

impl LearningPath {
    #[must_use]
    pub fn new(
        id: impl Into<PathId>,
        title: impl Into<String>,
        description: impl Into<String>,
        duration: impl Into<String>,
        stages: Vec<PathStage>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            duration: duration.into(),
            stages,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PathId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Human-readable estimate, e.g. "Approx. 3 Months".
    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn stages(&self) -> &[PathStage] {
        &self.stages
    }

    /// All steps across stages, in roadmap order.
    pub fn steps(&self) -> impl Iterator<Item = &RoadmapStep> {
        self.stages.iter().flat_map(|stage| stage.steps.iter())
    }

    /// Distinct courses linked from the roadmap, in first-seen order.
    #[must_use]
    pub fn course_ids(&self) -> Vec<&CourseId> {
        let mut ids: Vec<&CourseId> = Vec::new();
        for id in self.steps().filter_map(RoadmapStep::course_id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}
