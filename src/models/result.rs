//! Game results and score-entry validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while accepting a score submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResultError {
    #[error("Malformed result: {field} is missing")]
    MissingScore { field: &'static str },

    #[error("Malformed result: {field} '{value}' is not a whole number")]
    NonNumericScore { field: &'static str, value: String },

    #[error("Malformed result: {field} {value} is outside -1000000000..=1000000000")]
    ScoreOutOfRange { field: &'static str, value: i64 },
}

/// Largest accepted score magnitude. Keeps margins and spreads far from overflow.
pub const MAX_SCORE: i64 = 1_000_000_000;

/// A recorded score pair. `score1` belongs to the pairing's `side1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score1: i64,
    pub score2: i64,
}

impl GameResult {
    pub fn new(score1: i64, score2: i64) -> Self {
        Self { score1, score2 }
    }

    /// Parse raw operator input into a result.
    pub fn parse(score1: &str, score2: &str) -> Result<Self, ResultError> {
        Ok(Self {
            score1: parse_score("score1", score1)?,
            score2: parse_score("score2", score2)?,
        })
    }

    /// Reject scores outside `-MAX_SCORE..=MAX_SCORE`.
    pub fn validate(&self) -> Result<(), ResultError> {
        check_range("score1", self.score1)?;
        check_range("score2", self.score2)?;
        Ok(())
    }

    /// Point difference from side 1's perspective.
    pub fn margin(&self) -> i64 {
        self.score1 - self.score2
    }

    pub fn is_tie(&self) -> bool {
        self.score1 == self.score2
    }

    /// The same result seen from side 2.
    pub fn flipped(&self) -> Self {
        Self {
            score1: self.score2,
            score2: self.score1,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.score1, self.score2)
    }
}

fn parse_score(field: &'static str, raw: &str) -> Result<i64, ResultError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ResultError::MissingScore { field });
    }
    let score = trimmed.parse().map_err(|_| ResultError::NonNumericScore {
        field,
        value: trimmed.to_string(),
    })?;
    check_range(field, score)
}

fn check_range(field: &'static str, score: i64) -> Result<i64, ResultError> {
    if !(-MAX_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ResultError::ScoreOutOfRange { field, value: score });
    }
    Ok(score)
}
