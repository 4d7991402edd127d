use chrono::NaiveDate;
use shared::GithubHandle;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("user not found: {0}")]
    UserNotFound(GithubHandle),

    /// Raised by a storage backend whose (user, day) uniqueness constraint
    /// was violated by a concurrent writer. The aggregator absorbs this as
    /// "record already exists"; it never reaches a caller of `ingest`.
    #[error("activity for {login} on {day} already recorded")]
    DuplicateDay { login: GithubHandle, day: NaiveDate },

    #[error("invalid ingest input: {0}")]
    InvalidInput(String),

    /// Storage failures propagate unchanged; retrying them is the caller's
    /// responsibility, not the engine's.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
