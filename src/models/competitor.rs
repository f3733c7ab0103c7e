//! Competitors and their derived records.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CompetitorId, GameResult};

/// Win/loss/tie classification from one competitor's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Win,
    Loss,
    Tie,
}

impl OutcomeKind {
    fn letter(&self) -> char {
        match self {
            OutcomeKind::Win => 'W',
            OutcomeKind::Loss => 'L',
            OutcomeKind::Tie => 'T',
        }
    }
}

/// A game outcome with the score written from the owner's side, e.g. `W 400-350`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub own_score: i64,
    pub opponent_score: i64,
}

impl Outcome {
    /// Outcome for the competitor whose score is `result.score1`.
    pub fn from_result(result: &GameResult) -> Self {
        let kind = match result.score1.cmp(&result.score2) {
            Ordering::Greater => OutcomeKind::Win,
            Ordering::Less => OutcomeKind::Loss,
            Ordering::Equal => OutcomeKind::Tie,
        };
        Self {
            kind,
            own_score: result.score1,
            opponent_score: result.score2,
        }
    }

    /// Spread contribution of this game.
    pub fn margin(&self) -> i64 {
        self.own_score - self.opponent_score
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.kind.letter(),
            self.own_score,
            self.opponent_score
        )
    }
}

/// One line of a competitor's scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardEntry {
    pub round: u32,
    pub opponent: CompetitorId,
    pub outcome: Outcome,
    /// Spread after this round has been applied.
    pub cumulative_spread: i64,
}

/// Derived standing. Wins and losses move in half steps (a tie is 0.5 of each).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub wins: f64,
    pub losses: f64,
    pub spread: i64,
    pub scorecard: Vec<ScorecardEntry>,
}

impl Record {
    /// Apply one game from this competitor's perspective.
    pub fn apply(&mut self, round: u32, opponent: CompetitorId, outcome: Outcome) {
        match outcome.kind {
            OutcomeKind::Win => self.wins += 1.0,
            OutcomeKind::Loss => self.losses += 1.0,
            OutcomeKind::Tie => {
                self.wins += 0.5;
                self.losses += 0.5;
            }
        }
        self.spread += outcome.margin();
        self.scorecard.push(ScorecardEntry {
            round,
            opponent,
            outcome,
            cumulative_spread: self.spread,
        });
    }

    /// Most recent outcome string, or empty before any result.
    pub fn last_result(&self) -> String {
        self.scorecard
            .last()
            .map(|entry| entry.outcome.to_string())
            .unwrap_or_default()
    }

    pub fn games_played(&self) -> usize {
        self.scorecard.len()
    }

    /// Standings order: more wins first, then higher spread.
    pub fn rank_cmp(&self, other: &Record) -> Ordering {
        other
            .wins
            .total_cmp(&self.wins)
            .then_with(|| other.spread.cmp(&self.spread))
    }
}

/// A registered competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,

    /// Informational only; no strategy reads it.
    #[serde(default)]
    pub rating: i32,

    #[serde(default)]
    pub team: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    /// Seat within the team (1-based).
    #[serde(default = "default_player_number")]
    pub player_number: u32,

    #[serde(default)]
    pub record: Record,
}

fn default_player_number() -> u32 {
    1
}

impl Competitor {
    pub fn new(id: impl Into<CompetitorId>, rating: i32) -> Self {
        Self {
            id: id.into(),
            rating,
            team: None,
            country: None,
            player_number: default_player_number(),
            record: Record::default(),
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        let win = Outcome::from_result(&GameResult::new(400, 350));
        assert_eq!(win.to_string(), "W 400-350");

        let loss = Outcome::from_result(&GameResult::new(400, 350).flipped());
        assert_eq!(loss.to_string(), "L 350-400");

        let tie = Outcome::from_result(&GameResult::new(300, 300));
        assert_eq!(tie.to_string(), "T 300-300");
    }

    #[test]
    fn test_record_apply_win_and_tie() {
        let mut record = Record::default();
        record.apply(1, "Bob".into(), Outcome::from_result(&GameResult::new(400, 350)));
        record.apply(2, "Carol".into(), Outcome::from_result(&GameResult::new(320, 320)));

        assert_eq!(record.wins, 1.5);
        assert_eq!(record.losses, 0.5);
        assert_eq!(record.spread, 50);
        assert_eq!(record.scorecard[1].cumulative_spread, 50);
        assert_eq!(record.last_result(), "T 320-320");
    }

    #[test]
    fn test_last_result_empty() {
        assert_eq!(Record::default().last_result(), "");
    }

    #[test]
    fn test_rank_cmp() {
        let leader = Record {
            wins: 2.0,
            spread: 10,
            ..Default::default()
        };
        let chaser = Record {
            wins: 2.0,
            spread: -40,
            ..Default::default()
        };
        let trailer = Record {
            wins: 1.5,
            spread: 300,
            ..Default::default()
        };

        assert_eq!(leader.rank_cmp(&chaser), Ordering::Less);
        assert_eq!(chaser.rank_cmp(&trailer), Ordering::Less);
        assert_eq!(leader.rank_cmp(&leader.clone()), Ordering::Equal);
    }

    #[test]
    fn test_competitor_defaults_from_json() {
        let competitor: Competitor = serde_json::from_str(r#"{"id":"Alice"}"#).unwrap();
        assert_eq!(competitor.player_number, 1);
        assert_eq!(competitor.rating, 0);
        assert_eq!(competitor.record, Record::default());
    }
}
