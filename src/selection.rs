// src/selection.rs

use crate::catalog::QuestionCatalog;
use crate::error::{Result, TriviaError};
use crate::ledger::ShownQuestionsLedger;
use crate::models::{Difficulty, GameMode, Question};
use crate::policy::{policy_for, ModePolicy};
use crate::rng::{session_seed, XorShift64};
use crate::store::ProfileStore;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::{Arc, Mutex};

/// Non-fatal conditions reported alongside a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionWarning {
    /// Fewer questions than the mode asks for survived the filters.
    InsufficientQuestionPool { requested: usize, available: usize },
    /// A premium mode was requested without entitlement; the free-tier pool
    /// was used.
    PremiumModeWithoutEntitlement(GameMode),
    /// The rotating pool ran out of unseen questions and the ledger restarted.
    RotationReset,
}

#[derive(Debug, Clone)]
pub struct SessionQuestionSet {
    pub mode: GameMode,
    pub questions: Vec<Question>,
    pub requested: usize,
    pub warnings: Vec<SessionWarning>,
}

impl SessionQuestionSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_reduced(&self) -> bool {
        self.questions.len() < self.requested
    }
}

/// Result of one rotating-pool draw.
#[derive(Debug, Clone)]
pub struct RotationOutcome {
    pub questions: Vec<Question>,
    /// Fresh candidates fell short and the ledger was cleared first.
    pub ledger_reset: bool,
    pub evicted: usize,
}

pub struct QuestionSelector<S: ProfileStore> {
    store: Arc<Mutex<S>>,
    catalog: Arc<QuestionCatalog>,
}

// --- Public Interface ---

impl<S: ProfileStore> QuestionSelector<S> {
    pub fn new(store: Arc<Mutex<S>>, catalog: Arc<QuestionCatalog>) -> Self {
        QuestionSelector { store, catalog }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn select_session(&self, mode: GameMode, is_premium: bool) -> Result<SessionQuestionSet> {
        self.select_session_with(mode, is_premium, Utc::now(), &mut rand::thread_rng())
    }

    /// Same as [`select_session`](Self::select_session) with the clock and
    /// the uniform sampler supplied by the caller.
    pub fn select_session_with<R: Rng + ?Sized>(
        &self,
        mode: GameMode,
        is_premium: bool,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<SessionQuestionSet> {
        let policy = policy_for(mode);
        let mut warnings = Vec::new();

        if policy.requires_premium && !is_premium {
            warn!(
                "[Select] {} requires premium; serving free-tier questions",
                mode.display_name()
            );
            warnings.push(SessionWarning::PremiumModeWithoutEntitlement(mode));
        }

        let pool = candidate_pool(&self.catalog, policy, is_premium);
        debug!(
            "[Select] Mode: {:?}, Premium: {}, Pool: {}",
            mode,
            is_premium,
            pool.len()
        );

        let questions = if policy.tracks_repeats {
            let seed = session_seed(now);
            // The ledger cap follows the whole rotating pool, whatever the tier
            let pool_size = self.catalog.pool(policy.pool).len();
            let outcome = self.select_rotating(&pool, pool_size, policy.session_size, seed)?;
            if outcome.ledger_reset {
                warnings.push(SessionWarning::RotationReset);
            }
            outcome.questions
        } else {
            pick_uniform(&pool, policy.session_size, rng)
        };

        if questions.len() < policy.session_size {
            warn!(
                "[Select] Reduced session for {:?}: {} of {} questions available",
                mode,
                questions.len(),
                policy.session_size
            );
            warnings.push(SessionWarning::InsufficientQuestionPool {
                requested: policy.session_size,
                available: questions.len(),
            });
        }

        info!(
            "[Select] Serving {} {} questions",
            questions.len(),
            mode.display_name()
        );

        Ok(SessionQuestionSet {
            mode,
            questions,
            requested: policy.session_size,
            warnings,
        })
    }
}

// --- Internal Plumbing ---

impl<S: ProfileStore> QuestionSelector<S> {
    fn select_rotating(
        &self,
        pool: &[&Question],
        pool_size: usize,
        count: usize,
        seed: u64,
    ) -> Result<RotationOutcome> {
        let mut store = self.store.lock().map_err(|_| TriviaError::LockPoisoned)?;

        // The ledger only steers variety; unreadable data means starting over.
        let mut ledger = store.load_ledger().unwrap_or_else(|e| {
            warn!("[Select] Could not read shown-questions ledger ({}); starting empty", e);
            ShownQuestionsLedger::new()
        });

        let outcome = pick_rotating(pool, pool_size, &mut ledger, seed, count);

        if let Err(e) = store.save_ledger(&ledger) {
            warn!("[Select] Could not save shown-questions ledger: {}", e);
        }
        debug!(
            "[Select] Ledger now tracks {} questions (evicted {})",
            ledger.len(),
            outcome.evicted
        );
        Ok(outcome)
    }
}

// --- Internal Algorithm Logic ---

/// The questions a mode may draw from, after the free-tier filter.
pub fn candidate_pool<'a>(
    catalog: &'a QuestionCatalog,
    policy: &ModePolicy,
    is_premium: bool,
) -> Vec<&'a Question> {
    catalog
        .pool(policy.pool)
        .into_iter()
        .filter(|q| is_premium || q.difficulty() != Difficulty::Hard)
        .collect()
}

/// Up to `count` distinct questions drawn uniformly.
pub fn pick_uniform<R: Rng + ?Sized>(pool: &[&Question], count: usize, rng: &mut R) -> Vec<Question> {
    let mut candidates = pool.to_vec();
    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates.into_iter().cloned().collect()
}

/// Seeded draw from the rotating pool that skips questions in `ledger`, then
/// records the draw in `ledger`. `pool_size` is the unfiltered rotating pool
/// the ledger is sized against; `pool` may be a tier-filtered subset of it.
pub fn pick_rotating(
    pool: &[&Question],
    pool_size: usize,
    ledger: &mut ShownQuestionsLedger,
    seed: u64,
    count: usize,
) -> RotationOutcome {
    let mut candidates: Vec<&Question> = {
        let seen = ledger.key_set();
        pool.iter()
            .copied()
            .filter(|q| !seen.contains(q.ledger_key()))
            .collect()
    };

    let ledger_reset = candidates.len() < count;
    if ledger_reset {
        warn!(
            "[Select] Rotating pool exhausted ({} fresh of {}). Resetting shown questions.",
            candidates.len(),
            pool.len()
        );
        ledger.clear();
        candidates = pool.to_vec();
    }

    XorShift64::new(seed).shuffle(&mut candidates);
    candidates.truncate(count);

    let evicted = ledger.record(candidates.iter().map(|q| q.ledger_key()), pool_size);

    RotationOutcome {
        questions: candidates.into_iter().cloned().collect(),
        ledger_reset,
        evicted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn themed(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                Question::new(
                    format!("Themed question {}", i),
                    vec!["a".into(), "b".into()],
                    0,
                    Difficulty::Medium,
                    Some("the-office".into()),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_rotating_same_seed_same_order() {
        let qs = themed(40);
        let pool: Vec<&Question> = qs.iter().collect();
        let a = pick_rotating(&pool, pool.len(), &mut ShownQuestionsLedger::new(), 77, 10);
        let b = pick_rotating(&pool, pool.len(), &mut ShownQuestionsLedger::new(), 77, 10);
        assert_eq!(a.questions, b.questions);
        assert_eq!(a.questions.len(), 10);
    }

    #[test]
    fn test_rotating_skips_ledger_entries() {
        let qs = themed(40);
        let pool: Vec<&Question> = qs.iter().collect();
        let mut ledger = ShownQuestionsLedger::new();
        let first = pick_rotating(&pool, pool.len(), &mut ledger, 5, 10);
        let second = pick_rotating(&pool, pool.len(), &mut ledger, 5, 10);
        assert!(!second.ledger_reset);
        for q in &second.questions {
            assert!(!first.questions.contains(q));
        }
    }

    #[test]
    fn test_rotating_resets_when_fresh_pool_short() {
        let qs = themed(12);
        let pool: Vec<&Question> = qs.iter().collect();
        let mut ledger =
            ShownQuestionsLedger::from_entries(qs.iter().take(5).map(|q| q.ledger_key()));
        let outcome = pick_rotating(&pool, pool.len(), &mut ledger, 9, 10);
        assert!(outcome.ledger_reset);
        assert_eq!(outcome.questions.len(), 10);
        assert!(ledger.len() <= 6);
    }

    #[test]
    fn test_rotating_caps_ledger_by_full_pool() {
        let qs = themed(42);
        // A tier filter left 36 of the 42 questions
        let filtered: Vec<&Question> = qs.iter().take(36).collect();
        let mut ledger = ShownQuestionsLedger::new();
        pick_rotating(&filtered, qs.len(), &mut ledger, 3, 10);
        let second = pick_rotating(&filtered, qs.len(), &mut ledger, 4, 10);
        assert_eq!(second.evicted, 0);
        assert_eq!(ledger.len(), 20);
    }

    #[test]
    fn test_uniform_no_duplicates() {
        let qs = themed(30);
        let pool: Vec<&Question> = qs.iter().collect();
        let picked = pick_uniform(&pool, 20, &mut rand::thread_rng());
        assert_eq!(picked.len(), 20);
        let unique: std::collections::HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_uniform_small_pool_returns_all() {
        let qs = themed(4);
        let pool: Vec<&Question> = qs.iter().collect();
        assert_eq!(pick_uniform(&pool, 10, &mut rand::thread_rng()).len(), 4);
    }
}
