use chrono::NaiveDate;

use crate::DayCounts;

pub const XP_PER_COMMIT: u64 = 10;
pub const XP_PER_PULL_REQUEST: u64 = 50;
pub const XP_PER_ISSUE: u64 = 20;
pub const XP_PER_CODE_REVIEW: u64 = 30;

/// Experience earned by a single day of activity. Computed once when the
/// day's record is created and stored with it, so accumulated experience is
/// a plain sum over records and can never be double-awarded.
pub fn xp_for_day(counts: &DayCounts) -> u64 {
    u64::from(counts.commits) * XP_PER_COMMIT
        + u64::from(counts.pull_requests) * XP_PER_PULL_REQUEST
        + u64::from(counts.issues) * XP_PER_ISSUE
        + u64::from(counts.code_reviews) * XP_PER_CODE_REVIEW
}

/// Level as a step function of total experience: `floor(sqrt(xp / 100)) + 1`.
/// Monotonically non-decreasing, level 1 at zero experience.
pub fn level_for_xp(xp: u64) -> u32 {
    (xp as f64 / 100.0).sqrt().floor() as u32 + 1
}

/// Number of consecutive calendar days with recorded activity, walking
/// backward from `today`. The chain may start at today or at yesterday (a
/// quiet day today does not break a streak that was alive yesterday), after
/// which the walk requires strict consecutiveness and terminates at the
/// first gap of two or more days.
pub fn current_streak(today: NaiveDate, dates: &[NaiveDate]) -> u32 {
    let mut sorted: Vec<NaiveDate> = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();

    let mut streak = 0;
    let mut cursor = today;
    for day in sorted {
        match cursor.signed_duration_since(day).num_days() {
            0 => {
                streak += 1;
                cursor = match cursor.pred_opt() {
                    Some(prev) => prev,
                    None => break,
                };
            }
            1 => {
                streak += 1;
                cursor = day;
            }
            _ => break,
        }
    }

    streak
}

/// Inputs to the confidence score, mixing cumulative activity totals with
/// the externally cached social signals from the user's profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceFactors {
    pub commits: u64,
    pub pull_requests: u64,
    pub stars: u64,
    pub followers: u64,
    pub streak: u32,
    pub repos_contributed: u64,
}

const WEIGHT_COMMITS: f64 = 0.25;
const WEIGHT_PULL_REQUESTS: f64 = 0.30;
const WEIGHT_STARS: f64 = 0.15;
const WEIGHT_FOLLOWERS: f64 = 0.10;
const WEIGHT_STREAK: f64 = 0.12;
const WEIGHT_REPOS: f64 = 0.08;

/// Weighted, normalized composite engagement score in `[0, 100]`.
///
/// Each factor is scaled to `[0, 100]` before weighting; the weights sum to
/// 1.0, so the result cannot exceed 100, but the final clamp guards the
/// invariant against future weight changes.
pub fn confidence_score(factors: &ConfidenceFactors) -> u32 {
    let weighted = [
        (WEIGHT_COMMITS, factors.commits as f64 / 10.0),
        (WEIGHT_PULL_REQUESTS, factors.pull_requests as f64 / 5.0),
        (WEIGHT_STARS, factors.stars as f64 / 50.0),
        (WEIGHT_FOLLOWERS, factors.followers as f64 / 100.0),
        (WEIGHT_STREAK, f64::from(factors.streak) * 2.0),
        (WEIGHT_REPOS, factors.repos_contributed as f64 * 10.0),
    ];

    let score: f64 = weighted
        .into_iter()
        .map(|(weight, value)| weight * value.min(100.0))
        .sum();

    score.round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, dom).unwrap()
    }

    #[test]
    fn xp_accumulates_as_sum_of_daily_awards() {
        let days = [
            DayCounts {
                commits: 3,
                pull_requests: 1,
                issues: 0,
                code_reviews: 2,
            },
            DayCounts {
                commits: 0,
                pull_requests: 0,
                issues: 5,
                code_reviews: 0,
            },
            DayCounts::default(),
        ];

        let total: u64 = days.iter().map(xp_for_day).sum();
        assert_eq!(total, 30 + 50 + 60 + 100);
    }

    #[test]
    fn level_starts_at_one_and_never_decreases() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(399), 2);
        assert_eq!(level_for_xp(400), 3);

        let mut previous = 0;
        for xp in (0..50_000).step_by(37) {
            let level = level_for_xp(xp);
            assert!(level >= previous, "level regressed at xp = {xp}");
            previous = level;
        }
    }

    #[test]
    fn streak_counts_consecutive_days_through_today() {
        let today = day(2024, 6, 15);
        let dates = [today, day(2024, 6, 14), day(2024, 6, 13)];
        assert_eq!(current_streak(today, &dates), 3);
    }

    #[test]
    fn streak_tolerates_one_quiet_day_at_the_recent_end() {
        let today = day(2024, 6, 15);
        let dates = [day(2024, 6, 14), day(2024, 6, 13)];
        assert_eq!(current_streak(today, &dates), 2);
    }

    #[test]
    fn streak_breaks_on_a_two_day_gap() {
        let today = day(2024, 6, 15);
        assert_eq!(current_streak(today, &[day(2024, 6, 12)]), 0);

        let dates = [day(2024, 6, 14), day(2024, 6, 13), day(2024, 6, 11)];
        assert_eq!(current_streak(today, &dates), 2);
    }

    #[test]
    fn streak_is_zero_without_activity() {
        assert_eq!(current_streak(day(2024, 6, 15), &[]), 0);
    }

    #[test]
    fn streak_ignores_duplicate_and_future_dates() {
        let today = day(2024, 6, 15);
        let dates = [today, today, day(2024, 6, 14)];
        assert_eq!(current_streak(today, &dates), 2);

        // A future-dated entry terminates the walk instead of panicking.
        assert_eq!(current_streak(today, &[day(2024, 6, 20)]), 0);
    }

    #[test]
    fn confidence_score_stays_within_bounds() {
        assert_eq!(confidence_score(&ConfidenceFactors::default()), 0);

        let maxed = ConfidenceFactors {
            commits: u64::MAX,
            pull_requests: u64::MAX,
            stars: u64::MAX,
            followers: u64::MAX,
            streak: u32::MAX,
            repos_contributed: u64::MAX,
        };
        assert_eq!(confidence_score(&maxed), 100);
    }

    #[test]
    fn confidence_normalization_caps_each_factor() {
        // 1000 commits saturates the commit factor; more commits change nothing.
        let at_cap = ConfidenceFactors {
            commits: 1_000,
            ..Default::default()
        };
        let beyond_cap = ConfidenceFactors {
            commits: 1_000_000,
            ..Default::default()
        };
        assert_eq!(confidence_score(&at_cap), confidence_score(&beyond_cap));
        assert_eq!(confidence_score(&at_cap), 25);
    }

    #[test]
    fn confidence_weights_apply_per_factor() {
        let factors = ConfidenceFactors {
            commits: 100,      // normalizes to 10.0, weighted 2.5
            pull_requests: 50, // normalizes to 10.0, weighted 3.0
            stars: 500,        // normalizes to 10.0, weighted 1.5
            followers: 1_000,  // normalizes to 10.0, weighted 1.0
            streak: 5,         // normalizes to 10.0, weighted 1.2
            repos_contributed: 1, // normalizes to 10.0, weighted 0.8
        };
        assert_eq!(confidence_score(&factors), 10);
    }
}
