// src/leaderboard.rs

use crate::error::PublishError;
use serde::Serialize;

/// What the remote leaderboard receives after a game raises the total score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// Total score, not the points from the last game.
    pub score: u64,
    pub level_name: String,
    pub accuracy: f64,
    pub games_played: u32,
}

/// Fire-and-forget sink. Delivery and retries belong to the implementation;
/// it must not block the caller for long. Errors and panics are only logged.
///
/// Called while the profile is locked, so it must not call back into the
/// engine.
pub trait LeaderboardPublisher: Send + Sync {
    fn publish(&self, entry: &LeaderboardEntry) -> Result<(), PublishError>;
}

impl<F> LeaderboardPublisher for F
where
    F: Fn(&LeaderboardEntry) -> Result<(), PublishError> + Send + Sync,
{
    fn publish(&self, entry: &LeaderboardEntry) -> Result<(), PublishError> {
        self(entry)
    }
}
