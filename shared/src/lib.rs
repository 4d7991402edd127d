use std::ops::Add;

use serde::{Deserialize, Serialize};

mod badge;
mod scoring;

pub use badge::*;
pub use scoring::*;

pub type GithubHandle = String;

/// Raw contribution counts for a single calendar day, as delivered by the
/// activity-sync collaborator. Counts are unsigned, so negative input is
/// unrepresentable at this boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCounts {
    pub commits: u32,
    pub pull_requests: u32,
    pub issues: u32,
    pub code_reviews: u32,
}

impl DayCounts {
    pub const fn total(&self) -> u32 {
        self.commits + self.pull_requests + self.issues + self.code_reviews
    }
}

impl Add for DayCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            commits: self.commits + other.commits,
            pull_requests: self.pull_requests + other.pull_requests,
            issues: self.issues + other.issues,
            code_reviews: self.code_reviews + other.code_reviews,
        }
    }
}
