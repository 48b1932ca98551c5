use crate::model::ids::{CourseId, LessonId};

/// A single lesson inside a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    duration_minutes: u32,
}

impl Lesson {
    #[must_use]
    pub fn new(id: impl Into<LessonId>, title: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_minutes,
        }
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

/// Catalog entry for a course. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    long_description: String,
    instructor: String,
    tags: Vec<String>,
    lessons: Vec<Lesson>,
    image: String,
    what_you_will_learn: Vec<String>,
}

impl Course {
    #[must_use]
    pub fn new(id: impl Into<CourseId>, title: impl Into<String>, lessons: Vec<Lesson>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            long_description: String::new(),
            instructor: String::new(),
            tags: Vec::new(),
            lessons,
            image: String::new(),
            what_you_will_learn: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(
        mut self,
        description: impl Into<String>,
        long_description: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self.long_description = long_description.into();
        self
    }

    #[must_use]
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    #[must_use]
    pub fn with_outcomes<I, S>(mut self, outcomes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.what_you_will_learn = outcomes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
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
    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    #[must_use]
    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub fn what_you_will_learn(&self) -> &[String] {
        &self.what_you_will_learn
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id.as_str() == id)
    }

    /// Sum of all lesson durations.
    #[must_use]
    pub fn total_minutes(&self) -> u32 {
        self.lessons.iter().map(Lesson::duration_minutes).sum()
    }
}
