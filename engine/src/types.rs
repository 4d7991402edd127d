use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Badge, DayCounts, GithubHandle};

use crate::storage::ProfileRecord;

/// One day of an ingested activity snapshot, as handed over by the
/// activity-sync collaborator after it has normalized provider payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub counts: DayCounts,
    pub repos: BTreeSet<String>,
}

/// One cell of the contribution-graph view. Days without a ledger record
/// appear with a zero count; the ledger itself stores no zero records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub day: NaiveDate,
    pub count: u32,
}

/// Per-metric difference between this week and the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyChange {
    pub commits: i64,
    pub pull_requests: i64,
    pub issues: i64,
    pub code_reviews: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub this_week: DayCounts,
    pub last_week: DayCounts,
    pub change: WeeklyChange,
}

impl WeeklySummary {
    pub fn new(this_week: DayCounts, last_week: DayCounts) -> Self {
        let diff = |a: u32, b: u32| i64::from(a) - i64::from(b);
        Self {
            this_week,
            last_week,
            change: WeeklyChange {
                commits: diff(this_week.commits, last_week.commits),
                pull_requests: diff(this_week.pull_requests, last_week.pull_requests),
                issues: diff(this_week.issues, last_week.issues),
                code_reviews: diff(this_week.code_reviews, last_week.code_reviews),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub login: GithubHandle,
    pub confidence_score: u32,
    pub rank: u32,
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
    pub badges: BTreeSet<Badge>,
}

impl From<ProfileRecord> for LeaderboardEntry {
    fn from(profile: ProfileRecord) -> Self {
        Self {
            login: profile.login,
            confidence_score: profile.confidence_score,
            rank: profile.rank,
            xp: profile.xp,
            level: profile.level,
            streak: profile.streak,
            badges: profile.badges,
        }
    }
}
