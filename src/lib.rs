// src/lib.rs

//! Scoring, level progression and question selection for the Triviaholic app.
//!
//! - [`progression`]: turns finished games into points, levels and stats
//! - [`selection`]: builds per-mode question sets, avoiding recent repeats in
//!   the rotating weekly pool
//! - [`store`]: the persistence port plus SQLite and in-memory implementations
//! - [`app`]: wires both engines to one store for a host application

pub mod app;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod iq;
pub mod leaderboard;
pub mod ledger;
pub mod levels;
pub mod models;
pub mod policy;
pub mod progression;
pub mod repository;
pub mod rng;
pub mod selection;
pub mod store;

pub use app::TriviaApp;
pub use catalog::QuestionCatalog;
pub use config::TriviaConfig;
pub use error::{PublishError, Result, StoreError, TriviaError};
pub use leaderboard::{LeaderboardEntry, LeaderboardPublisher};
pub use ledger::ShownQuestionsLedger;
pub use levels::{Level, LEVELS};
pub use models::{Difficulty, GameMode, GameReward, GameStats, IqTestResult, PlayerProfile, Question};
pub use progression::{ProgressEvent, ProgressionEngine};
pub use selection::{QuestionSelector, SessionQuestionSet, SessionWarning};
pub use store::{MemoryProfileStore, ProfileStore, SqliteProfileStore};

/// Installs `env_logger`, honouring `RUST_LOG` and falling back to
/// `default_filter`. Safe to call more than once.
pub fn init_logging(default_filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();
}
