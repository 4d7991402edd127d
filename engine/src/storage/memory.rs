use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use shared::{DayCounts, GithubHandle};
use tokio::sync::RwLock;

use super::{ActivityLedger, ActivityRecord, MetricsUpdate, ProfileRecord, ProfileStore};
use crate::{EngineError, Result};

/// Reference store used by the engine's tests and by embedders that do not
/// need durability. The write lock makes the check-and-insert in
/// `record_if_absent` atomic, so the per-(user, day) uniqueness invariant
/// holds even for racing ingests of the same user.
#[derive(Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<GithubHandle, ProfileRecord>>,
    ledger: RwLock<HashMap<GithubHandle, BTreeMap<NaiveDate, ActivityRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ActivityLedger for InMemoryStore {
    async fn record_if_absent(
        &self,
        login: &str,
        day: NaiveDate,
        counts: DayCounts,
        repos: BTreeSet<String>,
        xp_earned: u64,
        recorded_at: DateTime<Utc>,
    ) -> Result<(ActivityRecord, bool)> {
        let mut ledger = self.ledger.write().await;
        let days = ledger.entry(login.to_owned()).or_default();
        if let Some(existing) = days.get(&day) {
            return Ok((existing.clone(), false));
        }

        let record = ActivityRecord {
            login: login.to_owned(),
            day,
            counts,
            repos,
            xp_earned,
            recorded_at,
        };
        days.insert(day, record.clone());
        Ok((record, true))
    }

    async fn history(&self, login: &str, since: Option<NaiveDate>) -> Result<Vec<ActivityRecord>> {
        let ledger = self.ledger.read().await;
        let records = ledger
            .get(login)
            .map(|days| {
                days.values()
                    .filter(|record| since.map_or(true, |cutoff| record.day >= cutoff))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn history_in_window(
        &self,
        login: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ActivityRecord>> {
        let ledger = self.ledger.read().await;
        let records = ledger
            .get(login)
            .map(|days| days.range(start..=end).map(|(_, r)| r.clone()).collect())
            .unwrap_or_default();
        Ok(records)
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryStore {
    async fn create_profile(&self, login: &str) -> Result<ProfileRecord> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(login.to_owned())
            .or_insert_with(|| ProfileRecord::newcomer(login.to_owned()));
        Ok(profile.clone())
    }

    async fn get_profile(&self, login: &str) -> Result<Option<ProfileRecord>> {
        Ok(self.profiles.read().await.get(login).cloned())
    }

    async fn update_metrics(&self, login: &str, update: MetricsUpdate) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(login)
            .ok_or_else(|| EngineError::UserNotFound(login.to_owned()))?;

        profile.xp = update.xp;
        profile.level = update.level;
        profile.streak = update.streak;
        profile.confidence_score = update.confidence_score;
        profile.badges = update.badges;
        profile.last_synced_at = Some(update.last_synced_at);
        Ok(())
    }

    async fn refresh_social_counts(&self, login: &str, stars: u64, followers: u64) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(login)
            .ok_or_else(|| EngineError::UserNotFound(login.to_owned()))?;

        profile.total_stars = stars;
        profile.followers = followers;
        Ok(())
    }

    async fn set_rank(&self, login: &str, rank: u32) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(login)
            .ok_or_else(|| EngineError::UserNotFound(login.to_owned()))?;

        profile.rank = rank;
        Ok(())
    }

    async fn count_scores_above(&self, score: u32) -> Result<u64> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .values()
            .filter(|profile| profile.confidence_score > score)
            .count() as u64)
    }

    async fn top_by_confidence(&self, limit: usize) -> Result<Vec<ProfileRecord>> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .values()
            .sorted_by(|a, b| {
                b.confidence_score
                    .cmp(&a.confidence_score)
                    .then(b.xp.cmp(&a.xp))
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(dom: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, dom).unwrap()
    }

    fn counts(commits: u32) -> DayCounts {
        DayCounts {
            commits,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn record_if_absent_keeps_the_first_write() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        let (first, created) = store
            .record_if_absent("octocat", day(1), counts(3), BTreeSet::new(), 30, now)
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.xp_earned, 30);

        // A second sync for the same day is a no-op, even with new counts.
        let (second, created) = store
            .record_if_absent("octocat", day(1), counts(9), BTreeSet::new(), 90, now)
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(second.counts.commits, 3);
        assert_eq!(second.xp_earned, 30);
    }

    #[tokio::test]
    async fn history_is_ascending_and_bounded() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        for dom in [5, 1, 3] {
            store
                .record_if_absent("octocat", day(dom), counts(1), BTreeSet::new(), 10, now)
                .await
                .unwrap();
        }

        let all = store.history("octocat", None).await.unwrap();
        assert_eq!(
            all.iter().map(|r| r.day).collect::<Vec<_>>(),
            vec![day(1), day(3), day(5)]
        );

        let since = store.history("octocat", Some(day(3))).await.unwrap();
        assert_eq!(since.len(), 2);

        let window = store
            .history_in_window("octocat", day(1), day(3))
            .await
            .unwrap();
        assert_eq!(
            window.iter().map(|r| r.day).collect::<Vec<_>>(),
            vec![day(1), day(3)]
        );
    }

    #[tokio::test]
    async fn create_profile_is_idempotent() {
        let store = InMemoryStore::new();
        store.create_profile("octocat").await.unwrap();
        store
            .refresh_social_counts("octocat", 500, 40)
            .await
            .unwrap();

        // A second linkage must not reset the cached signals.
        let again = store.create_profile("octocat").await.unwrap();
        assert_eq!(again.total_stars, 500);
        assert_eq!(again.followers, 40);
        assert_eq!(again.level, 1);
    }

    #[tokio::test]
    async fn updates_for_unknown_users_fail() {
        let store = InMemoryStore::new();
        let err = store.set_rank("ghost", 1).await.unwrap_err();
        assert!(matches!(err, EngineError::UserNotFound(login) if login == "ghost"));
    }
}
