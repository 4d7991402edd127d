use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use shared::{
    badges_for, confidence_score, current_streak, level_for_xp, xp_for_day, BadgeTotals,
    ConfidenceFactors, DayCounts,
};
use tracing::{debug, info, instrument};

use crate::rank::RankResolver;
use crate::storage::{ActivityLedger, MetricsUpdate, ProfileRecord, ProfileStore};
use crate::types::DaySnapshot;
use crate::{EngineError, Result};

/// Orchestrates one metrics pass for one user: ledger writes for the new
/// days of an ingested snapshot, a full-history recompute of every derived
/// metric, a single profile write, and a rank reposition.
///
/// Invocations are expected to be serialized per user by the caller;
/// concurrent ingests for different users share no mutable state. If an
/// invocation fails after some ledger writes, a retry sees those days as
/// already present and skips them, and the recompute is a pure function of
/// ledger state, so re-running it is always safe.
pub struct MetricsAggregator<S> {
    store: Arc<S>,
    ranks: RankResolver<S>,
}

impl<S: ProfileStore + ActivityLedger> MetricsAggregator<S> {
    pub fn new(store: Arc<S>) -> Self {
        let ranks = RankResolver::new(store.clone());
        Self { store, ranks }
    }

    #[instrument(skip(self, snapshot, now))]
    pub async fn ingest(
        &self,
        login: &str,
        snapshot: &BTreeMap<NaiveDate, DaySnapshot>,
        now: DateTime<Utc>,
    ) -> Result<ProfileRecord> {
        let profile = self
            .store
            .get_profile(login)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(login.to_owned()))?;

        let today = now.date_naive();
        // Reject the whole call before any ledger write.
        if let Some(day) = snapshot.keys().find(|day| **day > today) {
            return Err(EngineError::InvalidInput(format!(
                "activity day {day} is in the future"
            )));
        }

        for (day, snap) in snapshot {
            let xp_earned = xp_for_day(&snap.counts);
            let written = self
                .store
                .record_if_absent(login, *day, snap.counts, snap.repos.clone(), xp_earned, now)
                .await;
            match written {
                Ok((_, true)) => debug!(%day, xp_earned, "recorded activity day"),
                Ok((_, false)) => debug!(%day, "day already recorded, skipping"),
                // A concurrent ingest won the insert; the record exists and
                // the recompute below will pick it up.
                Err(EngineError::DuplicateDay { .. }) => debug!(%day, "absorbed duplicate-day race"),
                Err(other) => return Err(other),
            }
        }

        let history = self.store.history(login, None).await?;
        let totals = history
            .iter()
            .fold(DayCounts::default(), |acc, record| acc + record.counts);
        let xp: u64 = history.iter().map(|record| record.xp_earned).sum();
        let repos_contributed = history
            .iter()
            .flat_map(|record| record.repos.iter())
            .unique()
            .count() as u64;
        let dates: Vec<NaiveDate> = history.iter().map(|record| record.day).collect();

        let streak = current_streak(today, &dates);
        let score = confidence_score(&ConfidenceFactors {
            commits: totals.commits.into(),
            pull_requests: totals.pull_requests.into(),
            stars: profile.total_stars,
            followers: profile.followers,
            streak,
            repos_contributed,
        });
        let badges = badges_for(&BadgeTotals {
            commits: totals.commits.into(),
            pull_requests: totals.pull_requests.into(),
            streak,
            stars: profile.total_stars,
        });

        self.store
            .update_metrics(
                login,
                MetricsUpdate {
                    xp,
                    level: level_for_xp(xp),
                    streak,
                    confidence_score: score,
                    badges,
                    last_synced_at: now,
                },
            )
            .await?;

        let rank = self.ranks.reposition(login).await?;
        info!(login, score, rank, streak, xp, "metrics updated");

        self.store
            .get_profile(login)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(login.to_owned()))
    }
}
