// src/rng.rs

//! Deterministic shuffling for the rotating pool.
//!
//! The weekly pool is shuffled with a xorshift64 generator seeded from a
//! coarse time window, so every call inside one window sees the same ordering.

use crate::constants::{SESSION_WINDOW_SECONDS, XORSHIFT_ZERO_SEED};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        // A zero state never leaves zero
        let state = if seed == 0 { XORSHIFT_ZERO_SEED } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Value in `[0, max)`. `max` must be non-zero.
    pub fn next_below(&mut self, max: u64) -> u64 {
        self.next_u64() % max
    }

    /// Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_below((i + 1) as u64) as usize;
            slice.swap(i, j);
        }
    }
}

/// Identifier of the coarse time window containing `now`.
pub fn session_window(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(SESSION_WINDOW_SECONDS)
}

pub fn session_seed(now: DateTime<Utc>) -> u64 {
    session_window(now) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_xorshift_reference_step() {
        let mut rng = XorShift64::new(1);
        // 1 ^ 1<<13 = 8193; ^ >>7 = 8193 ^ 64 = 8257; ^ <<17
        let expected = 8257u64 ^ (8257u64 << 17);
        assert_eq!(rng.next_u64(), expected);
    }

    #[test]
    fn test_zero_seed_is_not_stuck() {
        let mut rng = XorShift64::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_shuffle_deterministic() {
        let mut a: Vec<u32> = (0..30).collect();
        let mut b = a.clone();
        XorShift64::new(42).shuffle(&mut a);
        XorShift64::new(42).shuffle(&mut b);
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_seed_changes_order() {
        let mut a: Vec<u32> = (0..30).collect();
        let mut b = a.clone();
        XorShift64::new(42).shuffle(&mut a);
        XorShift64::new(43).shuffle(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_window_is_coarse() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let window = session_window(start);
        let same = Utc
            .timestamp_opt(window * SESSION_WINDOW_SECONDS + SESSION_WINDOW_SECONDS - 1, 0)
            .unwrap();
        let next = Utc
            .timestamp_opt((window + 1) * SESSION_WINDOW_SECONDS, 0)
            .unwrap();
        assert_eq!(session_window(same), window);
        assert_eq!(session_window(next), window + 1);
    }
}
