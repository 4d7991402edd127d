use chrono::{DateTime, NaiveDate, Utc};
use shared::DayCounts;
use std::collections::BTreeSet;

use crate::Result;

pub mod memory;
pub mod types;

pub use memory::InMemoryStore;
pub use types::{ActivityRecord, MetricsUpdate, ProfileRecord};

/// Append-only-per-day store of daily contribution counts. Records are
/// immutable once created; the uniqueness of (user, day) is the safety net
/// that makes a retried or racing ingest a no-op instead of a double-write.
#[async_trait::async_trait]
pub trait ActivityLedger: Send + Sync {
    /// Creates the record for (login, day) unless one already exists, in
    /// which case the stored record is returned untouched with
    /// `created = false`. Implementations backed by a database constraint
    /// may instead surface [`crate::EngineError::DuplicateDay`] when the
    /// constraint trips concurrently; callers treat that as "already
    /// exists" and re-read.
    async fn record_if_absent(
        &self,
        login: &str,
        day: NaiveDate,
        counts: DayCounts,
        repos: BTreeSet<String>,
        xp_earned: u64,
        recorded_at: DateTime<Utc>,
    ) -> Result<(ActivityRecord, bool)>;

    /// Full history for a user, ascending by day, optionally bounded below.
    async fn history(&self, login: &str, since: Option<NaiveDate>) -> Result<Vec<ActivityRecord>>;

    /// Records with `start <= day <= end`, ascending by day.
    async fn history_in_window(
        &self,
        login: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ActivityRecord>>;
}

/// Profile persistence plus the population queries the rank resolver and
/// leaderboard need. Implementations decide the storage technology; the
/// engine only requires these contracts.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Creates an all-zero profile on first identity linkage. Returns the
    /// existing profile unchanged if the login is already known.
    async fn create_profile(&self, login: &str) -> Result<ProfileRecord>;

    async fn get_profile(&self, login: &str) -> Result<Option<ProfileRecord>>;

    /// Writes the five derived fields plus the sync timestamp atomically.
    async fn update_metrics(&self, login: &str, update: MetricsUpdate) -> Result<()>;

    /// Inbound refresh of the externally cached social signals; consumed by
    /// the next ingest/reposition cycle.
    async fn refresh_social_counts(&self, login: &str, stars: u64, followers: u64) -> Result<()>;

    async fn set_rank(&self, login: &str, rank: u32) -> Result<()>;

    /// Number of users whose confidence score is strictly greater.
    async fn count_scores_above(&self, score: u32) -> Result<u64>;

    /// Top profiles by confidence score descending, experience descending
    /// as the tiebreak, truncated to `limit`.
    async fn top_by_confidence(&self, limit: usize) -> Result<Vec<ProfileRecord>>;
}
