// src/models.rs

use crate::error::QuestionError;
use crate::iq;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Classic,
    WeeklyChallenge,
    TimeAttack,
    IqTest,
    Challenge,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::Classic,
        GameMode::WeeklyChallenge,
        GameMode::TimeAttack,
        GameMode::IqTest,
        GameMode::Challenge,
    ];

    /// Stable key used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::WeeklyChallenge => "weekly_challenge",
            GameMode::TimeAttack => "time_attack",
            GameMode::IqTest => "iq_test",
            GameMode::Challenge => "challenge",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic Mode",
            GameMode::WeeklyChallenge => "Weekly Challenge",
            GameMode::TimeAttack => "Time Attack",
            GameMode::IqTest => "IQ Test",
            GameMode::Challenge => "Challenge Mode",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::Classic => "Test your knowledge at your own pace",
            GameMode::WeeklyChallenge => "New Office trivia every week",
            GameMode::TimeAttack => "Race against the clock",
            GameMode::IqTest => "Test your Intelligence Quotient",
            GameMode::Challenge => "Challenge friends to a quiz battle",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for GameMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown game mode '{}'", s))
    }
}

// --- Questions ---

/// An immutable trivia question. Identity covers text, answers, the correct
/// index and difficulty; the topic tag is metadata only.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    text: String,
    answers: Vec<String>,
    correct_answer: usize,
    difficulty: Difficulty,
    topic: Option<String>,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        answers: Vec<String>,
        correct_answer: usize,
        difficulty: Difficulty,
        topic: Option<String>,
    ) -> Result<Self, QuestionError> {
        if answers.len() < 2 {
            return Err(QuestionError::TooFewAnswers(answers.len()));
        }
        if correct_answer >= answers.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: answers.len(),
            });
        }
        Ok(Question {
            text: text.into(),
            answers,
            correct_answer,
            difficulty,
            topic,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_answer
    }

    /// Identifier recorded in the shown-questions ledger.
    pub fn ledger_key(&self) -> &str {
        &self.text
    }
}

impl PartialEq for Question {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.answers == other.answers
            && self.correct_answer == other.correct_answer
            && self.difficulty == other.difficulty
    }
}

impl Eq for Question {}

impl Hash for Question {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.answers.hash(state);
        self.correct_answer.hash(state);
        self.difficulty.hash(state);
    }
}

// Used for loading the embedded catalog
#[derive(Deserialize)]
pub struct JsonQuestion {
    pub text: String,
    pub answers: Vec<String>,
    pub correct_answer: usize,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topic: Option<String>,
}

// --- Profile ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    pub total_games_played: u32,
    pub average_accuracy: f64,
    pub challenges_won: u32,
    pub daily_challenges_completed: u32,
    /// Best raw score per mode.
    pub mode_high_scores: BTreeMap<GameMode, u32>,
}

impl GameStats {
    pub fn high_score(&self, mode: GameMode) -> u32 {
        self.mode_high_scores.get(&mode).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub total_score: u64,
    pub stats: GameStats,
}

// --- Results ---

/// Outcome of [`ProgressionEngine::record_game_result`](crate::progression::ProgressionEngine::record_game_result).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameReward {
    pub points_awarded: u64,
    pub leveled_up: bool,
    pub new_level: Option<crate::levels::Level>,
    pub total_score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqTestResult {
    pub score: u32,
    pub taken_at: DateTime<Utc>,
    pub category: String,
    pub percentile: f64,
}

impl IqTestResult {
    pub fn classification(&self) -> &'static str {
        iq::classify(self.score)
    }
}
