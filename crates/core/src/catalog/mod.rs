//! Read-only reference data: courses, learning paths and practice problems.

mod seed;

use crate::model::{Course, Difficulty, LearningPath, Problem, ProblemId};

/// In-memory catalog. Never mutated by progress tracking.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    paths: Vec<LearningPath>,
    problems: Vec<Problem>,
}

impl Catalog {
    #[must_use]
    pub fn new(courses: Vec<Course>, paths: Vec<LearningPath>, problems: Vec<Problem>) -> Self {
        Self {
            courses,
            paths,
            problems,
        }
    }

    /// The catalog shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(seed::courses(), seed::learning_paths(), seed::problems())
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn paths(&self) -> &[LearningPath] {
        &self.paths
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    #[must_use]
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id().as_str() == id)
    }

    #[must_use]
    pub fn path(&self, id: &str) -> Option<&LearningPath> {
        self.paths.iter().find(|path| path.id().as_str() == id)
    }

    #[must_use]
    pub fn problem(&self, id: ProblemId) -> Option<&Problem> {
        self.problems.iter().find(|problem| problem.id == id)
    }

    /// Problems matching every populated field of the query, in catalog order.
    #[must_use]
    pub fn find_problems(&self, query: &ProblemQuery) -> Vec<&Problem> {
        self.problems
            .iter()
            .filter(|problem| query.matches(problem))
            .collect()
    }
}

/// Filter for the practice problem list.
#[derive(Debug, Clone, Default)]
pub struct ProblemQuery {
    pub difficulty: Option<Difficulty>,
    pub language: Option<String>,
    pub search: Option<String>,
}

impl ProblemQuery {
    #[must_use]
    pub fn matches(&self, problem: &Problem) -> bool {
        if self.difficulty.is_some_and(|d| d != problem.difficulty) {
            return false;
        }
        if let Some(language) = self.language.as_deref() {
            if !problem.language.eq_ignore_ascii_case(language.trim()) {
                return false;
            }
        }
        self.search
            .as_deref()
            .is_none_or(|needle| problem.matches_search(needle))
    }
}
