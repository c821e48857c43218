// src/constants.rs

// --- Scoring ---
pub const POINTS_PER_CORRECT: f64 = 10.0;
pub const CATEGORY_BONUS_FREE: f64 = 1.0;
pub const CATEGORY_BONUS_PREMIUM: f64 = 1.5;

// Accuracy brackets, lower bound inclusive
pub const ACCURACY_PERFECT: f64 = 0.95;
pub const ACCURACY_EXCELLENT: f64 = 0.90;
pub const ACCURACY_GOOD: f64 = 0.80;
pub const ACCURACY_AVERAGE: f64 = 0.70;
pub const ACCURACY_BELOW_AVERAGE: f64 = 0.60;

pub const MULTIPLIER_PERFECT: f64 = 2.0;
pub const MULTIPLIER_EXCELLENT: f64 = 1.5;
pub const MULTIPLIER_GOOD: f64 = 1.2;
pub const MULTIPLIER_AVERAGE: f64 = 1.0;
pub const MULTIPLIER_BELOW_AVERAGE: f64 = 0.8;
pub const MULTIPLIER_POOR: f64 = 0.5;

// --- Session Sizes ---
pub const SESSION_SIZE_STANDARD: usize = 10;
pub const SESSION_SIZE_TIME_ATTACK: usize = 20;
pub const SESSION_SIZE_WEEKLY: usize = 10;
pub const SESSION_SIZE_IQ: usize = 10;

// --- Rotating Pool ---
pub const SESSION_WINDOW_SECONDS: i64 = 10_000; // ~2.8 hours
pub const XORSHIFT_ZERO_SEED: u64 = 0x9E37_79B9_7F4A_7C15;
pub const THEMED_TOPICS: &[&str] = &["the-office"];

// --- IQ Test ---
pub const IQ_BASE_SCORE: u32 = 100;
pub const IQ_POINTS_PER_CORRECT: u32 = 3;
pub const IQ_MEAN: f64 = 100.0;
pub const IQ_STD_DEV: f64 = 15.0;
pub const IQ_DEFAULT_CATEGORY: &str = "General IQ";

// --- Storage ---
pub const DEFAULT_DB_FILE: &str = "trivia.db";
pub const DEFAULT_APP_DIR: &str = "trivia";
pub const DEFAULT_LOG_FILTER: &str = "info";
