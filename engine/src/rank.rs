use std::sync::Arc;

use tracing::instrument;

use crate::storage::ProfileStore;
use crate::{EngineError, Result};

/// Positions a user within the population ordered by confidence score.
///
/// Rank is `1 + count of users with a strictly greater score`, so tied
/// scores share a rank number. The population is read as an unsynchronized
/// snapshot: ranks of unrelated users stay stale until their own next
/// reposition, which keeps the whole resolver lock-free at the cost of
/// eventual consistency.
pub struct RankResolver<S> {
    store: Arc<S>,
}

impl<S> Clone for RankResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: ProfileStore> RankResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn reposition(&self, login: &str) -> Result<u32> {
        let profile = self
            .store
            .get_profile(login)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(login.to_owned()))?;

        let higher_ranked = self
            .store
            .count_scores_above(profile.confidence_score)
            .await?;
        let rank = higher_ranked as u32 + 1;

        self.store.set_rank(login, rank).await?;
        Ok(rank)
    }
}
