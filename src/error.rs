// src/error.rs

use thiserror::Error;

/// Errors raised by a [`ProfileStore`](crate::store::ProfileStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored data exists but does not decode into a valid profile.
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Reported by a [`LeaderboardPublisher`](crate::leaderboard::LeaderboardPublisher).
/// Logged by the engine, never surfaced to the caller.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("leaderboard rejected entry: {0}")]
    Rejected(String),

    #[error("leaderboard unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question needs at least two answers, got {0}")]
    TooFewAnswers(usize),

    #[error("correct answer index {index} out of range for {len} answers")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum TriviaError {
    /// Nothing was committed; the caller may retry the same call.
    #[error("failed to persist profile: {0}")]
    PersistenceWriteFailed(#[source] StoreError),

    #[error("failed to read profile: {0}")]
    PersistenceReadFailed(#[source] StoreError),

    #[error("stored profile is corrupt: {0}")]
    PersistenceReadCorrupt(String),

    #[error("invalid question {text:?}: {source}")]
    InvalidQuestion {
        text: String,
        #[source]
        source: QuestionError,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, TriviaError>;
