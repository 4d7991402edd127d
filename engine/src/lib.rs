pub mod aggregator;
pub mod error;
pub mod rank;
pub mod storage;
pub mod types;
pub mod views;

pub use aggregator::MetricsAggregator;
pub use error::{EngineError, Result};
pub use rank::RankResolver;
pub use views::ReportingViews;
