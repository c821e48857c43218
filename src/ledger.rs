// src/ledger.rs

//! Recently served questions for the rotating pool.
//!
//! Entries are kept oldest first. After every append the ledger is trimmed in
//! quarter-pool batches from the front until it holds at most half the pool.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShownQuestionsLedger {
    entries: VecDeque<String>,
}

impl ShownQuestionsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ShownQuestionsLedger {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e == key)
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn key_set(&self) -> HashSet<&str> {
        self.entries().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn capacity_for(pool_size: usize) -> usize {
        pool_size / 2
    }

    /// Appends `keys` and evicts old entries for a pool of `pool_size`
    /// questions. Returns how many entries were evicted.
    pub fn record<I, S>(&mut self, keys: I, pool_size: usize) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.extend(keys.into_iter().map(Into::into));

        let cap = Self::capacity_for(pool_size);
        let batch = (pool_size / 4).max(1);
        let mut evicted = 0;
        while self.entries.len() > cap {
            let n = batch.min(self.entries.len());
            self.entries.drain(..n);
            evicted += n;
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|i| format!("q{}", i)).collect()
    }

    #[test]
    fn test_grows_until_half_pool() {
        let mut ledger = ShownQuestionsLedger::new();
        assert_eq!(ledger.record(keys(0..10), 40), 0);
        assert_eq!(ledger.len(), 10);
        assert!(ledger.contains("q3"));
    }

    #[test]
    fn test_trims_oldest_quarter_batch() {
        let mut ledger = ShownQuestionsLedger::from_entries(keys(0..20));
        // 30 entries, cap 20, batch 10
        let evicted = ledger.record(keys(20..30), 40);
        assert_eq!(evicted, 10);
        assert_eq!(ledger.len(), 20);
        assert!(!ledger.contains("q9"));
        assert!(ledger.contains("q10"));
        assert_eq!(ledger.entries().next(), Some("q10"));
    }

    #[test]
    fn test_repeated_batches_keep_within_cap() {
        let mut ledger = ShownQuestionsLedger::from_entries(keys(0..7));
        ledger.record(keys(7..17), 15);
        assert!(ledger.len() <= 7, "len {}", ledger.len());
        // Newest entries survive
        assert!(ledger.contains("q16"));
    }

    #[test]
    fn test_tiny_pool_does_not_loop() {
        let mut ledger = ShownQuestionsLedger::new();
        ledger.record(keys(0..3), 1);
        assert!(ledger.is_empty());
    }
}
