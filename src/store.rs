// src/store.rs

use crate::database;
use crate::error::StoreError;
use crate::ledger::ShownQuestionsLedger;
use crate::models::{IqTestResult, PlayerProfile};
use crate::repository;
use log::{debug, info};
use rusqlite::Connection;
use std::path::Path;

/// Persistence port for one player's progress.
///
/// Every write must be durable (or fail without side effects) before it
/// returns; the engines rely on this to keep their in-memory snapshot and the
/// stored state in step.
pub trait ProfileStore: Send {
    fn load_profile(&self) -> Result<PlayerProfile, StoreError>;
    fn save_profile(&mut self, profile: &PlayerProfile) -> Result<(), StoreError>;

    fn load_ledger(&self) -> Result<ShownQuestionsLedger, StoreError>;
    fn save_ledger(&mut self, ledger: &ShownQuestionsLedger) -> Result<(), StoreError>;

    fn load_iq_results(&self) -> Result<Vec<IqTestResult>, StoreError>;
    fn append_iq_result(&mut self, result: &IqTestResult) -> Result<(), StoreError>;

    /// Back to a zeroed profile with an empty ledger and no IQ results.
    fn reset(&mut self) -> Result<(), StoreError>;
}

// --- SQLite ---

pub struct SqliteProfileStore {
    conn: Connection,
}

impl SqliteProfileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!("Database path: {:?}", path);
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        database::init_db(&conn)?;
        Ok(SqliteProfileStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ProfileStore for SqliteProfileStore {
    fn load_profile(&self) -> Result<PlayerProfile, StoreError> {
        repository::get_profile(&self.conn)
    }

    fn save_profile(&mut self, profile: &PlayerProfile) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        repository::save_profile(&tx, profile)?;
        tx.commit()?;
        debug!("[DB] Saved profile (total {})", profile.total_score);
        Ok(())
    }

    fn load_ledger(&self) -> Result<ShownQuestionsLedger, StoreError> {
        repository::get_ledger(&self.conn)
    }

    fn save_ledger(&mut self, ledger: &ShownQuestionsLedger) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        repository::replace_ledger(&tx, ledger)?;
        tx.commit()?;
        Ok(())
    }

    fn load_iq_results(&self) -> Result<Vec<IqTestResult>, StoreError> {
        repository::get_iq_results(&self.conn)
    }

    fn append_iq_result(&mut self, result: &IqTestResult) -> Result<(), StoreError> {
        repository::insert_iq_result(&self.conn, result)?;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        repository::clear_all(&tx)?;
        tx.commit()?;
        Ok(())
    }
}

// --- In-memory ---

/// Keeps everything in process memory. Suitable for hosts that sync the
/// profile elsewhere, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profile: PlayerProfile,
    ledger: ShownQuestionsLedger,
    iq_results: Vec<IqTestResult>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: PlayerProfile) -> Self {
        MemoryProfileStore {
            profile,
            ..Self::default()
        }
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load_profile(&self) -> Result<PlayerProfile, StoreError> {
        Ok(self.profile.clone())
    }

    fn save_profile(&mut self, profile: &PlayerProfile) -> Result<(), StoreError> {
        self.profile = profile.clone();
        Ok(())
    }

    fn load_ledger(&self) -> Result<ShownQuestionsLedger, StoreError> {
        Ok(self.ledger.clone())
    }

    fn save_ledger(&mut self, ledger: &ShownQuestionsLedger) -> Result<(), StoreError> {
        self.ledger = ledger.clone();
        Ok(())
    }

    fn load_iq_results(&self) -> Result<Vec<IqTestResult>, StoreError> {
        Ok(self.iq_results.clone())
    }

    fn append_iq_result(&mut self, result: &IqTestResult) -> Result<(), StoreError> {
        self.iq_results.push(result.clone());
        Ok(())
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        *self = Self::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameMode;
    use chrono::{TimeZone, Utc};

    fn sample_profile() -> PlayerProfile {
        let mut p = PlayerProfile {
            total_score: 1234,
            ..Default::default()
        };
        p.stats.total_games_played = 7;
        p.stats.average_accuracy = 0.8;
        p.stats.challenges_won = 2;
        p.stats.mode_high_scores.insert(GameMode::TimeAttack, 17);
        p
    }

    #[test]
    fn test_sqlite_fresh_profile_is_zeroed() {
        let store = SqliteProfileStore::open_in_memory().unwrap();
        assert_eq!(store.load_profile().unwrap(), PlayerProfile::default());
        assert!(store.load_ledger().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_profile_persists() {
        let mut store = SqliteProfileStore::open_in_memory().unwrap();
        let profile = sample_profile();
        store.save_profile(&profile).unwrap();
        assert_eq!(store.load_profile().unwrap(), profile);
    }

    #[test]
    fn test_sqlite_ledger_keeps_order() {
        let mut store = SqliteProfileStore::open_in_memory().unwrap();
        let ledger = ShownQuestionsLedger::from_entries(["b", "a", "c"]);
        store.save_ledger(&ledger).unwrap();
        assert_eq!(store.load_ledger().unwrap(), ledger);
    }

    #[test]
    fn test_sqlite_iq_results() {
        let mut store = SqliteProfileStore::open_in_memory().unwrap();
        let result = IqTestResult {
            score: 118,
            taken_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            category: "General IQ".into(),
            percentile: 88.5,
        };
        store.append_iq_result(&result).unwrap();
        assert_eq!(store.load_iq_results().unwrap(), vec![result]);
    }

    #[test]
    fn test_sqlite_negative_score_is_corrupt() {
        let store = SqliteProfileStore::open_in_memory().unwrap();
        store
            .connection()
            .execute("UPDATE profile SET total_score = -5 WHERE id = 1", [])
            .unwrap();
        assert!(matches!(store.load_profile(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_sqlite_rejects_total_beyond_i64() {
        let mut store = SqliteProfileStore::open_in_memory().unwrap();
        let profile = sample_profile();
        store.save_profile(&profile).unwrap();

        let huge = PlayerProfile {
            total_score: i64::MAX as u64 + 1,
            ..sample_profile()
        };
        assert!(matches!(
            store.save_profile(&huge),
            Err(StoreError::Sqlite(rusqlite::Error::ToSqlConversionFailure(_)))
        ));
        // The rolled back transaction leaves the previous row readable
        assert_eq!(store.load_profile().unwrap(), profile);
    }

    #[test]
    fn test_sqlite_unknown_mode_is_corrupt() {
        let store = SqliteProfileStore::open_in_memory().unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO mode_high_scores (mode, high_score) VALUES ('bogus', 3)",
                [],
            )
            .unwrap();
        assert!(matches!(store.load_profile(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_sqlite_reset() {
        let mut store = SqliteProfileStore::open_in_memory().unwrap();
        store.save_profile(&sample_profile()).unwrap();
        store
            .save_ledger(&ShownQuestionsLedger::from_entries(["x"]))
            .unwrap();
        store.reset().unwrap();
        assert_eq!(store.load_profile().unwrap(), PlayerProfile::default());
        assert!(store.load_ledger().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryProfileStore::new();
        store.save_profile(&sample_profile()).unwrap();
        assert_eq!(store.load_profile().unwrap().total_score, 1234);
        store.reset().unwrap();
        assert_eq!(store.load_profile().unwrap(), PlayerProfile::default());
    }
}
