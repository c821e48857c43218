// src/policy.rs

//! Per-mode rules as data: scoring bonus, question source and session size.

use crate::constants::*;
use crate::models::GameMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSource {
    /// General catalog minus the themed topics.
    General,
    /// Only the themed topics.
    Themed,
    /// The separate IQ bank.
    IqBank,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePolicy {
    pub mode: GameMode,
    pub category_bonus: f64,
    pub pool: PoolSource,
    pub session_size: usize,
    pub requires_premium: bool,
    /// Rotating pools record served questions and avoid them next time.
    pub tracks_repeats: bool,
}

pub static MODE_POLICIES: [ModePolicy; 5] = [
    ModePolicy {
        mode: GameMode::Classic,
        category_bonus: CATEGORY_BONUS_FREE,
        pool: PoolSource::General,
        session_size: SESSION_SIZE_STANDARD,
        requires_premium: false,
        tracks_repeats: false,
    },
    ModePolicy {
        mode: GameMode::WeeklyChallenge,
        category_bonus: CATEGORY_BONUS_PREMIUM,
        pool: PoolSource::Themed,
        session_size: SESSION_SIZE_WEEKLY,
        requires_premium: true,
        tracks_repeats: true,
    },
    ModePolicy {
        mode: GameMode::TimeAttack,
        category_bonus: CATEGORY_BONUS_PREMIUM,
        pool: PoolSource::General,
        session_size: SESSION_SIZE_TIME_ATTACK,
        requires_premium: true,
        tracks_repeats: false,
    },
    ModePolicy {
        mode: GameMode::IqTest,
        category_bonus: CATEGORY_BONUS_PREMIUM,
        pool: PoolSource::IqBank,
        session_size: SESSION_SIZE_IQ,
        requires_premium: true,
        tracks_repeats: false,
    },
    ModePolicy {
        mode: GameMode::Challenge,
        category_bonus: CATEGORY_BONUS_PREMIUM,
        pool: PoolSource::General,
        session_size: SESSION_SIZE_STANDARD,
        requires_premium: true,
        tracks_repeats: false,
    },
];

pub fn policy_for(mode: GameMode) -> &'static ModePolicy {
    match MODE_POLICIES.iter().find(|p| p.mode == mode) {
        Some(p) => p,
        // Every mode has an entry; see test_every_mode_has_policy
        None => &MODE_POLICIES[0],
    }
}

impl GameMode {
    pub fn requires_premium(&self) -> bool {
        policy_for(*self).requires_premium
    }
}

pub fn is_themed_topic(topic: Option<&str>) -> bool {
    topic.map_or(false, |t| THEMED_TOPICS.contains(&t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mode_has_policy() {
        for mode in GameMode::ALL {
            assert_eq!(policy_for(mode).mode, mode);
        }
    }

    #[test]
    fn test_only_classic_is_free() {
        for mode in GameMode::ALL {
            let p = policy_for(mode);
            assert_eq!(p.requires_premium, mode != GameMode::Classic);
            let expected = if mode == GameMode::Classic { 1.0 } else { 1.5 };
            assert_eq!(p.category_bonus, expected);
        }
    }

    #[test]
    fn test_session_sizes() {
        assert_eq!(policy_for(GameMode::Classic).session_size, 10);
        assert_eq!(policy_for(GameMode::TimeAttack).session_size, 20);
        assert_eq!(policy_for(GameMode::WeeklyChallenge).session_size, 10);
        assert!(policy_for(GameMode::WeeklyChallenge).tracks_repeats);
    }
}
