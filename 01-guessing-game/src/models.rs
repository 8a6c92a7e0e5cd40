//! Domain models and the error type for the guessing game.
//! Difficulty tiers, guess outcomes, round status and the persisted high score record.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest number the target can be.
pub const MIN_TARGET: i32 = 1;
/// Highest number the target can be.
pub const MAX_TARGET: i32 = 100;

/// Difficulty tier chosen at the start of a round; fixes the attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [DifficultyLevel::Easy, DifficultyLevel::Medium, DifficultyLevel::Hard];

    /// Number of guesses a round at this tier allows.
    pub fn max_attempts(self) -> u32 {
        match self {
            DifficultyLevel::Easy => 10,
            DifficultyLevel::Medium => 5,
            DifficultyLevel::Hard => 3,
        }
    }

    /// Position of the tier in the difficulty menu, starting at 1.
    pub fn menu_number(self) -> u8 {
        match self {
            DifficultyLevel::Easy => 1,
            DifficultyLevel::Medium => 2,
            DifficultyLevel::Hard => 3,
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl TryFrom<u8> for DifficultyLevel {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DifficultyLevel::ALL
            .into_iter()
            .find(|d| d.menu_number() == value)
            .ok_or_else(|| GameError::Configuration(format!("unknown difficulty: {value}")))
    }
}

/// Accepts the tier name (any case) or its menu number.
impl FromStr for DifficultyLevel {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return DifficultyLevel::try_from(n);
        }
        DifficultyLevel::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| GameError::Configuration(format!("unknown difficulty: {s:?}")))
    }
}

/// Result of a single accepted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    TooLow,
    TooHigh,
    Correct,
    /// The guess was wrong and used up the last attempt.
    OutOfAttempts,
}

impl GuessOutcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, GuessOutcome::Correct | GuessOutcome::OutOfAttempts)
    }
}

/// Where a round is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

/// Best score ever achieved; lower is better.
///
/// Field names are the on-disk contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    /// Attempts used in the winning round.
    #[serde(rename = "Score")]
    pub score: u32,
    #[serde(rename = "DateAchieved")]
    pub achieved_at: DateTime<Utc>,
}

impl HighScoreRecord {
    pub fn new(score: u32, achieved_at: DateTime<Utc>) -> Self {
        Self { score, achieved_at }
    }

    /// True when `attempts` strictly beats this record.
    pub fn is_beaten_by(&self, attempts: u32) -> bool {
        attempts < self.score
    }

    pub fn to_document(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_document(text: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("high score data is corrupt: {0}")]
    CorruptData(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("input error: {0}")]
    Input(String),
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self { GameError::Persistence(e.to_string()) }
}
impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self { GameError::CorruptData(e.to_string()) }
}
impl From<config::ConfigError> for GameError {
    fn from(e: config::ConfigError) -> Self { GameError::Configuration(e.to_string()) }
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;

/// Current time, used as the achievement timestamp for new records.
pub fn now() -> DateTime<Utc> { Utc::now() }
