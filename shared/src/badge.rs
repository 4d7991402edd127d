use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Achievement labels shown on profiles and leaderboards. The set is
/// re-derived from current cumulative totals on every metrics pass rather
/// than kept as an append-only unlock log, so a badge disappears if the
/// total it was earned from is ever corrected below its threshold.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum Badge {
    #[serde(rename = "Commit Champion")]
    #[strum(serialize = "Commit Champion")]
    CommitChampion,
    #[serde(rename = "PR Master")]
    #[strum(serialize = "PR Master")]
    PrMaster,
    #[serde(rename = "30-Day Warrior")]
    #[strum(serialize = "30-Day Warrior")]
    ThirtyDayWarrior,
    #[serde(rename = "Century Streak")]
    #[strum(serialize = "Century Streak")]
    CenturyStreak,
    #[serde(rename = "Rising Star")]
    #[strum(serialize = "Rising Star")]
    RisingStar,
    #[serde(rename = "GitHub Celebrity")]
    #[strum(serialize = "GitHub Celebrity")]
    GithubCelebrity,
}

impl Badge {
    const fn is_earned(&self, totals: &BadgeTotals) -> bool {
        match self {
            Self::CommitChampion => totals.commits >= 100,
            Self::PrMaster => totals.pull_requests >= 50,
            Self::ThirtyDayWarrior => totals.streak >= 30,
            Self::CenturyStreak => totals.streak >= 100,
            Self::RisingStar => totals.stars >= 100,
            Self::GithubCelebrity => totals.stars >= 1_000,
        }
    }
}

/// Cumulative totals badges are judged against.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeTotals {
    pub commits: u64,
    pub pull_requests: u64,
    pub streak: u32,
    pub stars: u64,
}

pub fn badges_for(totals: &BadgeTotals) -> BTreeSet<Badge> {
    Badge::iter()
        .filter(|badge| badge.is_earned(totals))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_set_matches_thresholds_exactly() {
        let totals = BadgeTotals {
            commits: 150,
            pull_requests: 10,
            streak: 35,
            stars: 50,
        };
        let badges = badges_for(&totals);
        assert_eq!(
            badges,
            BTreeSet::from([Badge::CommitChampion, Badge::ThirtyDayWarrior])
        );
    }

    #[test]
    fn no_activity_earns_no_badges() {
        assert!(badges_for(&BadgeTotals::default()).is_empty());
    }

    #[test]
    fn star_badges_stack_at_one_thousand() {
        let totals = BadgeTotals {
            stars: 1_000,
            ..Default::default()
        };
        let badges = badges_for(&totals);
        assert_eq!(
            badges,
            BTreeSet::from([Badge::RisingStar, Badge::GithubCelebrity])
        );
    }

    #[test]
    fn badges_serialize_to_display_labels() {
        assert_eq!(Badge::ThirtyDayWarrior.to_string(), "30-Day Warrior");
        assert_eq!(
            serde_json::to_string(&Badge::GithubCelebrity).unwrap(),
            "\"GitHub Celebrity\""
        );
    }
}
