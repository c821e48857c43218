// src/database.rs

use log::debug;
use rusqlite::{Connection, Result};

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("init_db: Checking database schema...");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            total_score INTEGER NOT NULL DEFAULT 0,
            games_played INTEGER NOT NULL DEFAULT 0,
            average_accuracy REAL NOT NULL DEFAULT 0.0,
            challenges_won INTEGER NOT NULL DEFAULT 0,
            daily_challenges_completed INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS mode_high_scores (
            mode TEXT PRIMARY KEY,
            high_score INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS shown_questions (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            question_key TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS iq_results (
            id INTEGER PRIMARY KEY,
            score INTEGER NOT NULL,
            taken_at INTEGER NOT NULL,
            category TEXT NOT NULL,
            percentile REAL NOT NULL
        );
        ",
    )?;

    let count: i64 = conn.query_row("SELECT count(*) FROM profile", [], |row| row.get(0))?;
    if count == 0 {
        debug!("init_db: No profile yet. Creating zeroed profile...");
        conn.execute("INSERT OR IGNORE INTO profile (id) VALUES (1)", [])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_db_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        init_db(&conn).unwrap();
        let rows: i64 = conn
            .query_row("SELECT count(*) FROM profile", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
