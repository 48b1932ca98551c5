//! Mock leaderboard data. Nothing here is persisted.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use studio_core::model::{Identity, LeaderboardEntry, POINTS_PER_PROBLEM};

const FIRST_NAMES: [&str; 12] = [
    "Sarah", "Alex", "Priya", "David", "Maria", "Kevin", "Lisa", "Tom", "Emily", "Chris",
    "Jessica", "Mike",
];
const LAST_NAMES: [&str; 12] = [
    "Chen", "Johnson", "Patel", "Wilson", "Garcia", "Brown", "Wong", "Black", "Smith", "Lee",
    "Davis", "Miller",
];

const TOP_SOLVED: u32 = 512;
const SOLVED_STEP: u32 = 3;

/// Filter applied when reshuffling the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    AllTime,
    ThisMonth,
    ThisWeek,
}

impl Timeframe {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllTime => "all-time",
            Self::ThisMonth => "this-month",
            Self::ThisWeek => "this-week",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all-time" | "all" => Some(Self::AllTime),
            "this-month" | "month" => Some(Self::ThisMonth),
            "this-week" | "week" => Some(Self::ThisWeek),
            _ => None,
        }
    }
}

/// Generate `count` ranked users with descending solve counts.
pub fn generate(count: usize, rng: &mut impl Rng) -> Vec<LeaderboardEntry> {
    (0..count)
        .map(|i| {
            let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Sarah");
            let last = LAST_NAMES.choose(rng).copied().unwrap_or("Chen");
            let index = u32::try_from(i).unwrap_or(u32::MAX);
            let problems_solved = TOP_SOLVED
                .saturating_sub(index.saturating_mul(SOLVED_STEP))
                .saturating_sub(rng.random_range(0..10));
            LeaderboardEntry {
                rank: index.saturating_add(1),
                name: format!("{first} {last}"),
                username: format!("@{}{}", first.to_lowercase(), leading_lower(last)),
                initials: format!("{}{}", leading(first), leading(last)),
                problems_solved,
                accuracy: rng.random_range(85..100),
                streak_days: rng.random_range(0..100),
                points: problems_solved * POINTS_PER_PROBLEM,
            }
        })
        .collect()
}

/// Simulate a filtered fetch: shuffle, keep 30 to 49 rows, shave up to 99
/// points off each row outside all-time, then rank by points.
pub fn reshuffle(
    base: &[LeaderboardEntry],
    timeframe: Timeframe,
    rng: &mut impl Rng,
) -> Vec<LeaderboardEntry> {
    let mut rows = base.to_vec();
    rows.shuffle(rng);
    rows.truncate(rng.random_range(30..50));

    if timeframe != Timeframe::AllTime {
        for row in &mut rows {
            row.points = row.points.saturating_sub(rng.random_range(0..100));
        }
    }

    rows.sort_by(|a, b| b.points.cmp(&a.points));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = u32::try_from(idx + 1).unwrap_or(u32::MAX);
    }
    rows
}

/// Fixed standing shown for the signed-in user.
#[must_use]
pub fn current_user_entry(identity: &Identity) -> LeaderboardEntry {
    let first = identity.name().split(' ').next().unwrap_or_default();
    LeaderboardEntry {
        rank: 37,
        name: identity.name().to_string(),
        username: format!("@{}", first.to_lowercase()),
        initials: identity.initials().to_string(),
        problems_solved: 150,
        accuracy: 78,
        streak_days: 10,
        points: 600,
    }
}

fn leading(name: &str) -> String {
    name.chars().next().map(String::from).unwrap_or_default()
}

fn leading_lower(name: &str) -> String {
    name.chars().next().map(|c| c.to_lowercase().collect()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use studio_core::model::Email;

    #[test]
    fn generated_rows_follow_rank_and_points_rules() {
        let mut rng = StdRng::seed_from_u64(7);
        let rows = generate(50, &mut rng);

        assert_eq!(rows.len(), 50);
        for (i, row) in rows.iter().enumerate() {
            let i = u32::try_from(i).unwrap();
            assert_eq!(row.rank, i + 1);
            let ceiling = 512 - 3 * i;
            assert!(row.problems_solved <= ceiling && row.problems_solved > ceiling - 10);
            assert_eq!(row.points, row.problems_solved * 4);
            assert!((85..100).contains(&row.accuracy));
            assert!(row.streak_days < 100);

            let (first, last) = row.name.split_once(' ').unwrap();
            assert!(FIRST_NAMES.contains(&first));
            assert!(LAST_NAMES.contains(&last));
            assert_eq!(row.initials.len(), 2);
            assert!(row.username.starts_with(&format!("@{}", first.to_lowercase())));
        }
    }

    #[test]
    fn all_time_reshuffle_keeps_points_and_reranks() {
        let mut rng = StdRng::seed_from_u64(11);
        let base = generate(50, &mut rng);
        let rows = reshuffle(&base, Timeframe::AllTime, &mut rng);

        assert!((30..50).contains(&rows.len()));
        for (idx, row) in rows.iter().enumerate() {
            assert_eq!(row.rank as usize, idx + 1);
            assert_eq!(row.points, row.problems_solved * 4);
        }
        assert!(rows.windows(2).all(|w| w[0].points >= w[1].points));
    }

    #[test]
    fn weekly_reshuffle_only_lowers_points() {
        let mut rng = StdRng::seed_from_u64(3);
        let base = generate(50, &mut rng);
        let rows = reshuffle(&base, Timeframe::ThisWeek, &mut rng);

        for row in &rows {
            let full = row.problems_solved * 4;
            assert!(row.points <= full && row.points + 100 > full);
        }
        assert!(rows.windows(2).all(|w| w[0].points >= w[1].points));
    }

    #[test]
    fn current_user_row_uses_first_name() {
        let identity = Identity::new("Ada Lovelace", Email::new("ada@example.com").unwrap());
        let row = current_user_entry(&identity);
        assert_eq!(row.rank, 37);
        assert_eq!(row.username, "@ada");
        assert_eq!(row.initials, "AL");
        assert_eq!(row.points, 600);
    }

    #[test]
    fn timeframe_parses_short_forms() {
        assert_eq!(Timeframe::parse("Week"), Some(Timeframe::ThisWeek));
        assert_eq!(Timeframe::parse("all-time"), Some(Timeframe::AllTime));
        assert_eq!(Timeframe::parse("year"), None);
        assert_eq!(Timeframe::ThisMonth.as_str(), "this-month");
    }
}
