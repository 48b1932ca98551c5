/// One row of the (mock) leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub username: String,
    pub initials: String,
    pub problems_solved: u32,
    /// Percentage in `0..=100`.
    pub accuracy: u8,
    pub streak_days: u32,
    pub points: u32,
}

/// Points awarded per solved problem.
pub const POINTS_PER_PROBLEM: u32 = 4;
