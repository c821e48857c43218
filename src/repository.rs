// src/repository.rs

use crate::error::StoreError;
use crate::ledger::ShownQuestionsLedger;
use crate::models::{GameMode, GameStats, IqTestResult, PlayerProfile};
use chrono::DateTime;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Type mismatches in stored rows mean the data is corrupt, not that the
/// database is unreachable.
fn classify(err: rusqlite::Error) -> StoreError {
    match err {
        rusqlite::Error::InvalidColumnType(idx, name, ty) => {
            StoreError::Corrupt(format!("column {} ({}) has type {}", idx, name, ty))
        }
        rusqlite::Error::FromSqlConversionFailure(idx, ty, e) => {
            StoreError::Corrupt(format!("column {} ({}): {}", idx, ty, e))
        }
        rusqlite::Error::IntegralValueOutOfRange(idx, v) => {
            StoreError::Corrupt(format!("column {} out of range: {}", idx, v))
        }
        other => StoreError::Sqlite(other),
    }
}

fn non_negative(field: &str, value: i64) -> std::result::Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Corrupt(format!("{} is negative: {}", field, value)))
}

fn counter(field: &str, value: i64) -> std::result::Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::Corrupt(format!("{} out of range: {}", field, value)))
}

/// Loads the profile row and the per-mode high scores.
pub fn get_profile(conn: &Connection) -> std::result::Result<PlayerProfile, StoreError> {
    let row = conn
        .query_row(
            "SELECT total_score, games_played, average_accuracy, challenges_won, daily_challenges_completed
             FROM profile WHERE id = 1",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        )
        .optional()
        .map_err(classify)?;

    let Some((total, games, accuracy, won, daily)) = row else {
        debug!("[DB] No profile row, using zeroed profile");
        return Ok(PlayerProfile::default());
    };

    if !accuracy.is_finite() || !(0.0..=1.0).contains(&accuracy) {
        return Err(StoreError::Corrupt(format!(
            "average_accuracy outside [0, 1]: {}",
            accuracy
        )));
    }

    let mut mode_high_scores = BTreeMap::new();
    let mut stmt = conn
        .prepare("SELECT mode, high_score FROM mode_high_scores")
        .map_err(classify)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
        .map_err(classify)?;
    for r in rows {
        let (mode, score) = r.map_err(classify)?;
        let mode = GameMode::from_str(&mode).map_err(StoreError::Corrupt)?;
        mode_high_scores.insert(mode, counter("high_score", score)?);
    }

    Ok(PlayerProfile {
        total_score: non_negative("total_score", total)?,
        stats: GameStats {
            total_games_played: counter("games_played", games)?,
            average_accuracy: accuracy,
            challenges_won: counter("challenges_won", won)?,
            daily_challenges_completed: counter("daily_challenges_completed", daily)?,
            mode_high_scores,
        },
    })
}

/// Writes the full profile. Callers wrap this in a transaction.
pub fn save_profile(conn: &Connection, profile: &PlayerProfile) -> Result<()> {
    let stats = &profile.stats;
    // SQLite integers are signed; refuse to store a total that would wrap
    let total_score = i64::try_from(profile.total_score)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    conn.execute(
        "INSERT OR REPLACE INTO profile
            (id, total_score, games_played, average_accuracy, challenges_won, daily_challenges_completed)
         VALUES (1, ?, ?, ?, ?, ?)",
        params![
            total_score,
            stats.total_games_played,
            stats.average_accuracy,
            stats.challenges_won,
            stats.daily_challenges_completed
        ],
    )?;

    conn.execute("DELETE FROM mode_high_scores", [])?;
    let mut stmt =
        conn.prepare("INSERT INTO mode_high_scores (mode, high_score) VALUES (?, ?)")?;
    for (mode, score) in &stats.mode_high_scores {
        stmt.execute(params![mode.as_str(), score])?;
    }
    Ok(())
}

pub fn get_ledger(conn: &Connection) -> std::result::Result<ShownQuestionsLedger, StoreError> {
    let mut stmt = conn
        .prepare("SELECT question_key FROM shown_questions ORDER BY seq ASC")
        .map_err(classify)?;
    let keys = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(classify)?
        .collect::<Result<Vec<String>>>()
        .map_err(classify)?;
    Ok(ShownQuestionsLedger::from_entries(keys))
}

/// Replaces the stored ledger. Callers wrap this in a transaction.
pub fn replace_ledger(conn: &Connection, ledger: &ShownQuestionsLedger) -> Result<()> {
    conn.execute("DELETE FROM shown_questions", [])?;
    let mut stmt = conn.prepare("INSERT INTO shown_questions (question_key) VALUES (?)")?;
    for key in ledger.entries() {
        stmt.execute([key])?;
    }
    Ok(())
}

pub fn get_iq_results(conn: &Connection) -> std::result::Result<Vec<IqTestResult>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT score, taken_at, category, percentile FROM iq_results ORDER BY id ASC")
        .map_err(classify)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })
        .map_err(classify)?;

    let mut results = Vec::new();
    for r in rows {
        let (score, taken_at, category, percentile) = r.map_err(classify)?;
        let taken_at = DateTime::from_timestamp(taken_at, 0)
            .ok_or_else(|| StoreError::Corrupt(format!("invalid timestamp {}", taken_at)))?;
        results.push(IqTestResult {
            score: counter("iq score", score)?,
            taken_at,
            category,
            percentile,
        });
    }
    Ok(results)
}

pub fn insert_iq_result(conn: &Connection, result: &IqTestResult) -> Result<()> {
    conn.execute(
        "INSERT INTO iq_results (score, taken_at, category, percentile) VALUES (?, ?, ?, ?)",
        params![
            result.score,
            result.taken_at.timestamp(),
            result.category,
            result.percentile
        ],
    )?;
    Ok(())
}

/// Drops all progress and restores the zeroed profile row.
pub fn clear_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        DELETE FROM mode_high_scores;
        DELETE FROM shown_questions;
        DELETE FROM iq_results;
        DELETE FROM profile;
        INSERT INTO profile (id) VALUES (1);
        ",
    )
}
