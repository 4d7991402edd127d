use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use shared::DayCounts;

use crate::storage::{ActivityLedger, ActivityRecord, ProfileStore};
use crate::types::{ActivityPoint, LeaderboardEntry, WeeklySummary};
use crate::{EngineError, Result};

/// Trailing window of the contribution graph when the caller does not ask
/// for a specific one.
pub const DEFAULT_GRAPH_DAYS: u32 = 365;

/// Read-only projections over the ledger and the profile population. No
/// view mutates anything; they can be queried at any time, independently of
/// ingest cycles.
pub struct ReportingViews<S> {
    store: Arc<S>,
}

impl<S: ProfileStore + ActivityLedger> ReportingViews<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Calendar-heatmap series for the trailing window ending at `today`,
    /// one point per day, zero for days the ledger has no record for.
    pub async fn activity_graph(
        &self,
        login: &str,
        today: NaiveDate,
        days: Option<u32>,
    ) -> Result<Vec<ActivityPoint>> {
        self.require_profile(login).await?;

        let days = days.unwrap_or(DEFAULT_GRAPH_DAYS);
        let Some(start) = today.checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        else {
            return Err(EngineError::InvalidInput(format!(
                "graph window of {days} days does not fit the calendar"
            )));
        };

        let by_day: BTreeMap<NaiveDate, u32> = self
            .store
            .history_in_window(login, start, today)
            .await?
            .into_iter()
            .map(|record| (record.day, record.counts.total()))
            .collect();

        Ok(start
            .iter_days()
            .take(days as usize)
            .map(|day| ActivityPoint {
                day,
                count: by_day.get(&day).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Raw count totals for the trailing 7 days and the 7 days before
    /// that, plus their per-metric differences. A record exactly on the
    /// week boundary belongs to the more recent window.
    pub async fn weekly_summary(&self, login: &str, today: NaiveDate) -> Result<WeeklySummary> {
        self.require_profile(login).await?;

        let week_ago = today - Days::new(7);
        let two_weeks_ago = today - Days::new(14);

        let this_week = self.store.history_in_window(login, week_ago, today).await?;
        let last_week = self
            .store
            .history_in_window(login, two_weeks_ago, week_ago - Days::new(1))
            .await?;

        Ok(WeeklySummary::new(sum_counts(&this_week), sum_counts(&last_week)))
    }

    /// Top of the population by confidence score, experience breaking ties.
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let top = self.store.top_by_confidence(limit).await?;
        Ok(top.into_iter().map(Into::into).collect())
    }

    async fn require_profile(&self, login: &str) -> Result<()> {
        self.store
            .get_profile(login)
            .await?
            .map(|_| ())
            .ok_or_else(|| EngineError::UserNotFound(login.to_owned()))
    }
}

fn sum_counts(records: &[ActivityRecord]) -> DayCounts {
    records
        .iter()
        .fold(DayCounts::default(), |acc, record| acc + record.counts)
}
