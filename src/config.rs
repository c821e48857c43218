// src/config.rs

use crate::constants::{DEFAULT_APP_DIR, DEFAULT_DB_FILE, DEFAULT_LOG_FILTER};
use crate::error::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "TRIVIA_DATA_DIR";
pub const ENV_LOG: &str = "TRIVIA_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriviaConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
    pub log_filter: String,
}

impl Default for TriviaConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join(DEFAULT_APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir,
            database_file: DEFAULT_DB_FILE.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TriviaConfig {
    /// Defaults overridden by `TRIVIA_DATA_DIR` and `TRIVIA_LOG`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = env::var(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(filter) = env::var(ENV_LOG) {
            config.log_filter = filter;
        }
        config
    }

    /// Reads a JSON config file. A missing file yields the defaults; an
    /// unreadable or malformed one is logged and also yields the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                warn!("Could not read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TriviaConfig = serde_json::from_str(r#"{"log_filter": "debug"}"#).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.database_file, DEFAULT_DB_FILE);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = TriviaConfig {
            data_dir: dir.path().to_path_buf(),
            database_file: "profile.db".into(),
            log_filter: "warn".into(),
        };
        config.save(&path).unwrap();
        assert_eq!(TriviaConfig::load(&path), config);
        assert_eq!(config.database_path(), dir.path().join("profile.db"));
    }

    #[test]
    fn test_missing_or_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(TriviaConfig::load(&missing), TriviaConfig::default());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert_eq!(TriviaConfig::load(&bad), TriviaConfig::default());
    }
}
