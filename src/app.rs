// src/app.rs

use crate::catalog::QuestionCatalog;
use crate::config::TriviaConfig;
use crate::error::{Result, TriviaError};
use crate::leaderboard::LeaderboardPublisher;
use crate::levels::Level;
use crate::models::{GameMode, GameReward, IqTestResult};
use crate::progression::ProgressionEngine;
use crate::selection::{QuestionSelector, SessionQuestionSet};
use crate::store::{ProfileStore, SqliteProfileStore};
use log::info;
use std::fs;
use std::sync::{Arc, Mutex};

/// Host-facing entry point: one profile store shared by the progression
/// engine and the question selector.
pub struct TriviaApp<S: ProfileStore> {
    engine: ProgressionEngine<S>,
    selector: QuestionSelector<S>,
}

impl TriviaApp<SqliteProfileStore> {
    /// Opens (or creates) the SQLite profile under the configured data dir.
    pub fn open(config: &TriviaConfig) -> Result<Self> {
        crate::init_logging(&config.log_filter);
        if !config.data_dir.exists() {
            fs::create_dir_all(&config.data_dir)?;
        }
        let store = SqliteProfileStore::open(config.database_path())
            .map_err(TriviaError::PersistenceReadFailed)?;
        Self::new(store, QuestionCatalog::builtin()?)
    }
}

impl<S: ProfileStore> TriviaApp<S> {
    pub fn new(store: S, catalog: QuestionCatalog) -> Result<Self> {
        let store = Arc::new(Mutex::new(store));
        let engine = ProgressionEngine::new(Arc::clone(&store))?;
        let selector = QuestionSelector::new(store, Arc::new(catalog));
        info!("Starting Trivia core...");
        Ok(TriviaApp { engine, selector })
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn LeaderboardPublisher>) -> Self {
        self.engine = self.engine.with_publisher(publisher);
        self
    }

    pub fn engine(&self) -> &ProgressionEngine<S> {
        &self.engine
    }

    pub fn selector(&self) -> &QuestionSelector<S> {
        &self.selector
    }

    pub fn select_session(&self, mode: GameMode, is_premium: bool) -> Result<SessionQuestionSet> {
        self.selector.select_session(mode, is_premium)
    }

    pub fn record_game_result(
        &self,
        raw_score: u32,
        accuracy: f64,
        mode: GameMode,
    ) -> Result<GameReward> {
        self.engine.record_game_result(raw_score, accuracy, mode)
    }

    pub fn record_iq_test_result(&self, correct_count: u32) -> Result<IqTestResult> {
        self.engine.record_iq_test_result(correct_count)
    }

    pub fn current_level(&self) -> &'static Level {
        self.engine.current_level()
    }

    pub fn progress_to_next_level(&self) -> f64 {
        self.engine.progress_to_next_level()
    }
}
