use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{Badge, DayCounts, GithubHandle};

/// One user profile with its cached social signals and derived metrics.
/// Derived fields are written only by the metrics aggregator; `level` is
/// always `level_for_xp(xp)` and is never stored independently of a
/// recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub login: GithubHandle,
    pub followers: u64,
    pub total_stars: u64,
    pub confidence_score: u32,
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
    /// 1 = best. 0 until the first reposition after creation.
    pub rank: u32,
    pub badges: BTreeSet<Badge>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl ProfileRecord {
    pub fn newcomer(login: GithubHandle) -> Self {
        Self {
            login,
            followers: 0,
            total_stars: 0,
            confidence_score: 0,
            xp: 0,
            level: shared::level_for_xp(0),
            streak: 0,
            rank: 0,
            badges: BTreeSet::new(),
            last_synced_at: None,
        }
    }
}

/// One day of contribution activity for one user. Immutable once created;
/// `xp_earned` is computed exactly once, at creation, so a re-sync of the
/// same day can never double-award experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub login: GithubHandle,
    pub day: NaiveDate,
    pub counts: DayCounts,
    pub repos: BTreeSet<String>,
    pub xp_earned: u64,
    pub recorded_at: DateTime<Utc>,
}

/// The derived fields the aggregator persists in a single profile write.
#[derive(Debug, Clone)]
pub struct MetricsUpdate {
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
    pub confidence_score: u32,
    pub badges: BTreeSet<Badge>,
    pub last_synced_at: DateTime<Utc>,
}
