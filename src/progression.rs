// src/progression.rs

use crate::constants::*;
use crate::error::{Result, StoreError, TriviaError};
use crate::iq::{self, IqSummary};
use crate::leaderboard::{LeaderboardEntry, LeaderboardPublisher};
use crate::levels::{self, Level};
use crate::models::{GameMode, GameReward, GameStats, IqTestResult, PlayerProfile};
use crate::policy::policy_for;
use crate::store::ProfileStore;
use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, error, info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Notifications emitted after a change has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    ScoreUpdated {
        points_awarded: u64,
        total_score: u64,
    },
    LevelUp {
        previous: Level,
        level: Level,
    },
}

/// Turns finished games into durable score, level and statistics.
///
/// All writes go through the shared store mutex, which makes this the single
/// writer for the profile. Reads come from an in-memory snapshot that is only
/// replaced after the store accepted the new state.
pub struct ProgressionEngine<S: ProfileStore> {
    store: Arc<Mutex<S>>,
    snapshot: RwLock<PlayerProfile>,
    publisher: Option<Arc<dyn LeaderboardPublisher>>,
    subscribers: Mutex<Vec<Sender<ProgressEvent>>>,
}

// --- Public Interface ---

impl<S: ProfileStore> ProgressionEngine<S> {
    pub fn new(store: Arc<Mutex<S>>) -> Result<Self> {
        let profile = {
            let guard = store.lock().map_err(|_| TriviaError::LockPoisoned)?;
            load_or_fresh(&*guard)?
        };
        info!(
            "Progression ready: total score {}, level {}",
            profile.total_score,
            levels::level_for_score(profile.total_score).name
        );
        Ok(ProgressionEngine {
            store,
            snapshot: RwLock::new(profile),
            publisher: None,
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn LeaderboardPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Receives every event emitted after this call.
    pub fn subscribe(&self) -> Receiver<ProgressEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub fn record_game_result(
        &self,
        raw_score: u32,
        accuracy: f64,
        mode: GameMode,
    ) -> Result<GameReward> {
        let accuracy = clamp_accuracy(accuracy);
        let points = base_points(raw_score, mode);
        let multiplier = accuracy_multiplier(accuracy);
        let adjusted = apply_multiplier(points, multiplier);

        debug!(
            "[Score Input] Mode: {:?}, Raw: {}, Accuracy: {:.3}, Points: {}, Multiplier: {:.1}",
            mode, raw_score, accuracy, points, multiplier
        );

        // Held until the events and the leaderboard entry are out, so
        // observers see results in commit order.
        let (_store, before, after) = self.commit(|profile| {
            profile.total_score = profile.total_score.saturating_add(adjusted);
            apply_game_stats(&mut profile.stats, raw_score, accuracy, mode);
        })?;

        let old_level = levels::level_for_score(before.total_score);
        let new_level = levels::level_for_score(after.total_score);
        let leveled_up = new_level.name != old_level.name;

        info!(
            "[Score Result] +{} points: Total {} -> {}, Games {}, Avg Accuracy {:.3}",
            adjusted,
            before.total_score,
            after.total_score,
            after.stats.total_games_played,
            after.stats.average_accuracy
        );

        self.emit(ProgressEvent::ScoreUpdated {
            points_awarded: adjusted,
            total_score: after.total_score,
        });
        if leveled_up {
            info!("[Level] {} -> {}", old_level.name, new_level.name);
            self.emit(ProgressEvent::LevelUp {
                previous: old_level.clone(),
                level: new_level.clone(),
            });
        }

        if after.total_score > before.total_score {
            self.publish(LeaderboardEntry {
                score: after.total_score,
                level_name: new_level.name.to_string(),
                accuracy,
                games_played: after.stats.total_games_played,
            });
        }

        Ok(GameReward {
            points_awarded: adjusted,
            leveled_up,
            new_level: leveled_up.then(|| new_level.clone()),
            total_score: after.total_score,
        })
    }

    pub fn record_iq_test_result(&self, correct_count: u32) -> Result<IqTestResult> {
        self.record_iq_test_result_at(correct_count, Utc::now())
    }

    /// IQ results go to their own ledger and never touch the total score.
    pub fn record_iq_test_result_at(
        &self,
        correct_count: u32,
        now: DateTime<Utc>,
    ) -> Result<IqTestResult> {
        let score = iq::iq_score(correct_count);
        let result = IqTestResult {
            score,
            taken_at: now.trunc_subsecs(0),
            category: IQ_DEFAULT_CATEGORY.to_string(),
            percentile: iq::percentile(score),
        };

        let mut store = self.lock_store()?;
        store.append_iq_result(&result).map_err(write_failed)?;
        drop(store);

        info!(
            "[IQ] Correct: {}, Score: {} ({}), Percentile: {:.1}",
            correct_count,
            result.score,
            result.classification(),
            result.percentile
        );
        Ok(result)
    }

    pub fn record_challenge_won(&self) -> Result<GameStats> {
        let (store, _, after) = self.commit(|p| {
            p.stats.challenges_won = p.stats.challenges_won.saturating_add(1)
        })?;
        drop(store);
        Ok(after.stats)
    }

    pub fn record_daily_challenge_completed(&self) -> Result<GameStats> {
        let (store, _, after) = self.commit(|p| {
            p.stats.daily_challenges_completed =
                p.stats.daily_challenges_completed.saturating_add(1)
        })?;
        drop(store);
        Ok(after.stats)
    }

    pub fn current_level(&self) -> &'static Level {
        levels::level_for_score(self.total_score())
    }

    pub fn next_level(&self) -> Option<&'static Level> {
        levels::next_level(self.total_score())
    }

    pub fn progress_to_next_level(&self) -> f64 {
        levels::progress_to_next_level(self.total_score())
    }

    pub fn total_score(&self) -> u64 {
        self.read_snapshot().total_score
    }

    pub fn profile(&self) -> PlayerProfile {
        self.read_snapshot().clone()
    }

    pub fn stats(&self) -> GameStats {
        self.read_snapshot().stats.clone()
    }

    pub fn iq_results(&self) -> Result<Vec<IqTestResult>> {
        let store = self.lock_store()?;
        store
            .load_iq_results()
            .map_err(read_failed)
    }

    pub fn iq_summary(&self) -> Result<IqSummary> {
        Ok(IqSummary::from_results(&self.iq_results()?))
    }

    /// Wipes score, statistics, the shown-questions ledger and IQ results.
    pub fn reset_profile(&self) -> Result<()> {
        let mut store = self.lock_store()?;
        store.reset().map_err(write_failed)?;
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = PlayerProfile::default();
        warn!("Profile reset to defaults");
        Ok(())
    }
}

// --- Internal Plumbing ---

impl<S: ProfileStore> ProgressionEngine<S> {
    fn lock_store(&self) -> Result<MutexGuard<'_, S>> {
        self.store.lock().map_err(|_| TriviaError::LockPoisoned)
    }

    fn read_snapshot(&self) -> std::sync::RwLockReadGuard<'_, PlayerProfile> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `update` to a copy of the profile, persists it, then swaps the
    /// snapshot. On a failed save nothing changes. The store guard is handed
    /// back so the caller can finish notifying before the next writer runs.
    fn commit<F>(&self, update: F) -> Result<(MutexGuard<'_, S>, PlayerProfile, PlayerProfile)>
    where
        F: FnOnce(&mut PlayerProfile),
    {
        let mut store = self.lock_store()?;
        let before = self.read_snapshot().clone();
        let mut after = before.clone();
        update(&mut after);

        store.save_profile(&after).map_err(write_failed)?;
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = after.clone();
        Ok((store, before, after))
    }

    fn emit(&self, event: ProgressEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn publish(&self, entry: LeaderboardEntry) {
        if let Some(publisher) = &self.publisher {
            debug!(
                "[Leaderboard] Publishing score {} ({})",
                entry.score, entry.level_name
            );
            match panic::catch_unwind(AssertUnwindSafe(|| publisher.publish(&entry))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("[Leaderboard] Publish failed: {}", e),
                Err(_) => error!(
                    "[Leaderboard] Publisher panicked on score {}; entry dropped",
                    entry.score
                ),
            }
        }
    }
}

fn write_failed(err: StoreError) -> TriviaError {
    error!("Failed to persist profile: {}", err);
    TriviaError::PersistenceWriteFailed(err)
}

fn read_failed(err: StoreError) -> TriviaError {
    match err {
        StoreError::Corrupt(reason) => TriviaError::PersistenceReadCorrupt(reason),
        other => TriviaError::PersistenceReadFailed(other),
    }
}

/// A corrupt profile is replaced by a zeroed one; any other read failure is
/// reported.
fn load_or_fresh<S: ProfileStore>(store: &S) -> Result<PlayerProfile> {
    match store.load_profile() {
        Ok(profile) => Ok(profile),
        Err(StoreError::Corrupt(reason)) => {
            warn!(
                "Stored profile is corrupt ({}). Starting from a fresh profile.",
                reason
            );
            Ok(PlayerProfile::default())
        }
        Err(e) => Err(read_failed(e)),
    }
}

// --- Internal Algorithm Logic ---

/// NaN and infinities become 0.0, everything else is clamped into `[0, 1]`.
pub fn clamp_accuracy(accuracy: f64) -> f64 {
    if !accuracy.is_finite() {
        warn!("Non-finite accuracy {} treated as 0.0", accuracy);
        return 0.0;
    }
    let clamped = accuracy.clamp(0.0, 1.0);
    if clamped != accuracy {
        warn!("Accuracy {} clamped to {}", accuracy, clamped);
    }
    clamped
}

pub fn category_bonus(mode: GameMode) -> f64 {
    policy_for(mode).category_bonus
}

pub fn base_points(raw_score: u32, mode: GameMode) -> u64 {
    (raw_score as f64 * POINTS_PER_CORRECT * category_bonus(mode)).round() as u64
}

pub fn accuracy_multiplier(accuracy: f64) -> f64 {
    if accuracy >= ACCURACY_PERFECT {
        MULTIPLIER_PERFECT
    } else if accuracy >= ACCURACY_EXCELLENT {
        MULTIPLIER_EXCELLENT
    } else if accuracy >= ACCURACY_GOOD {
        MULTIPLIER_GOOD
    } else if accuracy >= ACCURACY_AVERAGE {
        MULTIPLIER_AVERAGE
    } else if accuracy >= ACCURACY_BELOW_AVERAGE {
        MULTIPLIER_BELOW_AVERAGE
    } else {
        MULTIPLIER_POOR
    }
}

pub fn apply_multiplier(points: u64, multiplier: f64) -> u64 {
    (points as f64 * multiplier).round() as u64
}

/// Points a game is worth before it is added to the total.
pub fn score_game(raw_score: u32, accuracy: f64, mode: GameMode) -> u64 {
    let accuracy = clamp_accuracy(accuracy);
    apply_multiplier(base_points(raw_score, mode), accuracy_multiplier(accuracy))
}

/// Running mean over `games` samples, `games` counting the new one.
pub fn running_average(previous: f64, games: u32, sample: f64) -> f64 {
    if games == 0 {
        return sample;
    }
    let n = games as f64;
    (previous * (n - 1.0) + sample) / n
}

fn apply_game_stats(stats: &mut GameStats, raw_score: u32, accuracy: f64, mode: GameMode) {
    stats.total_games_played = stats.total_games_played.saturating_add(1);
    stats.average_accuracy =
        running_average(stats.average_accuracy, stats.total_games_played, accuracy);

    let best = stats.mode_high_scores.entry(mode).or_insert(0);
    if raw_score > *best {
        debug!("[Stats] New {:?} high score: {} -> {}", mode, best, raw_score);
        *best = raw_score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_brackets() {
        assert_eq!(accuracy_multiplier(1.0), 2.0);
        assert_eq!(accuracy_multiplier(0.95), 2.0);
        assert_eq!(accuracy_multiplier(0.94999), 1.5);
        assert_eq!(accuracy_multiplier(0.90), 1.5);
        assert_eq!(accuracy_multiplier(0.85), 1.2);
        assert_eq!(accuracy_multiplier(0.80), 1.2);
        assert_eq!(accuracy_multiplier(0.75), 1.0);
        assert_eq!(accuracy_multiplier(0.70), 1.0);
        assert_eq!(accuracy_multiplier(0.65), 0.8);
        assert_eq!(accuracy_multiplier(0.60), 0.8);
        assert_eq!(accuracy_multiplier(0.59), 0.5);
        assert_eq!(accuracy_multiplier(0.0), 0.5);
    }

    #[test]
    fn test_classic_perfect_game() {
        assert_eq!(base_points(10, GameMode::Classic), 100);
        assert_eq!(score_game(10, 1.0, GameMode::Classic), 200);
    }

    #[test]
    fn test_premium_perfect_game() {
        assert_eq!(base_points(10, GameMode::TimeAttack), 150);
        assert_eq!(score_game(10, 1.0, GameMode::TimeAttack), 300);
    }

    #[test]
    fn test_rounding_half_points() {
        // 1 * 10 * 1.5 = 15, * 0.5 = 7.5 -> 8
        assert_eq!(score_game(1, 0.1, GameMode::Challenge), 8);
    }

    #[test]
    fn test_clamp_accuracy() {
        assert_eq!(clamp_accuracy(f64::NAN), 0.0);
        assert_eq!(clamp_accuracy(f64::INFINITY), 0.0);
        assert_eq!(clamp_accuracy(1.7), 1.0);
        assert_eq!(clamp_accuracy(-0.2), 0.0);
        assert_eq!(clamp_accuracy(0.42), 0.42);
    }

    #[test]
    fn test_running_average_constant_samples() {
        let mut avg = 0.0;
        for n in 1..=25 {
            avg = running_average(avg, n, 0.83);
        }
        assert!((avg - 0.83).abs() < 1e-9);
    }

    #[test]
    fn test_apply_game_stats_tracks_mode_best() {
        let mut stats = GameStats::default();
        apply_game_stats(&mut stats, 7, 0.7, GameMode::TimeAttack);
        apply_game_stats(&mut stats, 5, 0.5, GameMode::TimeAttack);
        assert_eq!(stats.total_games_played, 2);
        assert_eq!(stats.high_score(GameMode::TimeAttack), 7);
        assert_eq!(stats.high_score(GameMode::Classic), 0);
        assert!((stats.average_accuracy - 0.6).abs() < 1e-9);
    }
}
