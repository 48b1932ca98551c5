mod course;
mod identity;
mod ids;
mod leaderboard;
mod path;
mod problem;
mod progress;
mod preferences;

pub use ids::{CourseId, LessonId, ParseIdError, PathId, ProblemId};

pub use course::{Course, Lesson};
pub use identity::{Email, Identity, IdentityError, initials};
pub use leaderboard::{LeaderboardEntry, POINTS_PER_PROBLEM};
pub use path::{LearningPath, PathStage, RoadmapStep};
pub use preferences::NotificationPreferences;
pub use problem::{Difficulty, ParseDifficultyError, Problem, ProblemExample, ProblemSolution};
pub use progress::{CompletedCourses, CompletedLessons, ProgressSnapshot};
