//! Identifiers: tournaments, competitors, pairing sides and match coordinates.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Reserved name of the sentinel opponent used when the roster size is odd.
pub const BYE_NAME: &str = "BYE";

/// A deterministic entity ID derived from content hash.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Generate an EntityId from input fields.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

/// Type alias for tournament IDs
pub type TournamentId = EntityId;

/// Unique competitor identity (the registered name).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(String);

impl CompetitorId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name collides with the BYE sentinel.
    pub fn is_reserved(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case(BYE_NAME)
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompetitorId({})", self.0)
    }
}

impl From<String> for CompetitorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CompetitorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One side of a pairing: a real competitor or the BYE sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Competitor(CompetitorId),
    Bye,
}

impl Side {
    pub fn is_bye(&self) -> bool {
        matches!(self, Side::Bye)
    }

    pub fn competitor(&self) -> Option<&CompetitorId> {
        match self {
            Side::Competitor(id) => Some(id),
            Side::Bye => None,
        }
    }
}

impl From<CompetitorId> for Side {
    fn from(id: CompetitorId) -> Self {
        Side::Competitor(id)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Competitor(id) => write!(f, "{}", id),
            Side::Bye => f.write_str(BYE_NAME),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid match id '{0}' (expected R<round>-M<board>)")]
pub struct MatchIdError(pub String);

/// Coordinate of a single game: round number and 1-based board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId {
    pub round: u32,
    pub board: usize,
}

impl MatchId {
    pub fn new(round: u32, board: usize) -> Self {
        Self { round, board }
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}-M{}", self.round, self.board)
    }
}

fn match_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^R(\d+)-M(\d+)$").unwrap())
}

impl FromStr for MatchId {
    type Err = MatchIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = match_id_pattern()
            .captures(trimmed)
            .ok_or_else(|| MatchIdError(s.to_string()))?;

        let round: u32 = caps[1].parse().map_err(|_| MatchIdError(s.to_string()))?;
        let board: usize = caps[2].parse().map_err(|_| MatchIdError(s.to_string()))?;
        if round == 0 || board == 0 {
            return Err(MatchIdError(s.to_string()));
        }

        Ok(Self { round, board })
    }
}
