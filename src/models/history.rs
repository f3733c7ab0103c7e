//! Round history: the caller-owned record of every paired round and its results.
//!
//! Rounds are append-only and contiguous from 1. The only backward step is
//! removing the most recent round, which also discards its results.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{CompetitorId, GameResult, MatchId, Pairing};

/// Errors raised by history mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Round {requested} is out of sequence (expected round {expected})")]
    OutOfSequenceRound { requested: u32, expected: u32 },

    #[error("No rounds have been paired")]
    NothingToUnpair,

    #[error("Round {0} has not been paired")]
    UnknownRound(u32),

    #[error("Round {round} has no board {board}")]
    UnknownBoard { round: u32, board: usize },

    #[error("Board {board} of round {round} is a BYE and takes no result")]
    ByeResult { round: u32, board: usize },

    #[error("Round {round} is malformed: {reason}")]
    InvalidRound { round: u32, reason: String },
}

/// Progress of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Unpaired,
    Paired,
    PartiallyEntered,
    Complete,
}

/// Ordered map of rounds to pairings, plus a parallel map of per-board results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    rounds: BTreeMap<u32, Vec<Pairing>>,

    #[serde(default)]
    results: BTreeMap<u32, Vec<Option<GameResult>>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently paired round, or 0 when nothing has been paired.
    pub fn last_round(&self) -> u32 {
        self.rounds.keys().next_back().copied().unwrap_or(0)
    }

    pub fn next_round(&self) -> u32 {
        self.last_round() + 1
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn pairings(&self, round: u32) -> Option<&[Pairing]> {
        self.rounds.get(&round).map(Vec::as_slice)
    }

    pub fn results(&self, round: u32) -> Option<&[Option<GameResult>]> {
        self.results.get(&round).map(Vec::as_slice)
    }

    /// Result on a 1-based board, if one has been entered.
    pub fn result(&self, round: u32, board: usize) -> Option<&GameResult> {
        board
            .checked_sub(1)
            .and_then(|idx| self.results.get(&round)?.get(idx)?.as_ref())
    }

    /// Rounds in ascending numeric order.
    pub fn rounds(&self) -> impl Iterator<Item = (u32, &[Pairing])> {
        self.rounds.iter().map(|(round, pairings)| (*round, pairings.as_slice()))
    }

    /// Every board with its optional result, in ascending round order.
    pub fn games(&self) -> impl Iterator<Item = (MatchId, &Pairing, Option<&GameResult>)> {
        self.rounds.iter().flat_map(move |(round, pairings)| {
            let results = self.results.get(round);
            pairings.iter().enumerate().map(move |(idx, pairing)| {
                let result = results.and_then(|r| r.get(idx)).and_then(Option::as_ref);
                (MatchId::new(*round, idx + 1), pairing, result)
            })
        })
    }

    /// Append the next round. The round must be exactly `next_round()`.
    pub fn append_round(&mut self, round: u32, pairings: Vec<Pairing>) -> Result<(), HistoryError> {
        let expected = self.next_round();
        if round != expected {
            return Err(HistoryError::OutOfSequenceRound {
                requested: round,
                expected,
            });
        }
        validate_round(round, &pairings)?;

        debug!("Appending round {} with {} pairings", round, pairings.len());
        self.results.insert(round, vec![None; pairings.len()]);
        self.rounds.insert(round, pairings);
        Ok(())
    }

    /// Remove the most recent round and its results.
    pub fn unpair_round(&mut self, round: u32) -> Result<Vec<Pairing>, HistoryError> {
        let last = self.last_round();
        if last == 0 {
            return Err(HistoryError::NothingToUnpair);
        }
        if round != last {
            return Err(HistoryError::OutOfSequenceRound {
                requested: round,
                expected: last,
            });
        }

        self.results.remove(&round);
        let removed = self.rounds.remove(&round).unwrap_or_default();
        debug!("Unpaired round {}", round);
        Ok(removed)
    }

    /// Store (or overwrite) the result on a 1-based board. Returns the previous result.
    pub fn record_result(
        &mut self,
        round: u32,
        board: usize,
        result: GameResult,
    ) -> Result<Option<GameResult>, HistoryError> {
        let idx = self.board_index(round, board)?;
        let boards = self.rounds.get(&round).map_or(0, Vec::len);
        let slots = self
            .results
            .entry(round)
            .or_insert_with(|| vec![None; boards]);
        if slots.len() <= idx {
            slots.resize(idx + 1, None);
        }
        Ok(slots[idx].replace(result))
    }

    /// Clear the result on a 1-based board. Returns the removed result.
    pub fn clear_result(&mut self, round: u32, board: usize) -> Result<Option<GameResult>, HistoryError> {
        let idx = self.board_index(round, board)?;
        Ok(self
            .results
            .get_mut(&round)
            .and_then(|slots| slots.get_mut(idx))
            .and_then(Option::take))
    }

    fn board_index(&self, round: u32, board: usize) -> Result<usize, HistoryError> {
        let pairings = self
            .rounds
            .get(&round)
            .ok_or(HistoryError::UnknownRound(round))?;
        let idx = board
            .checked_sub(1)
            .filter(|idx| *idx < pairings.len())
            .ok_or(HistoryError::UnknownBoard { round, board })?;
        if pairings[idx].is_bye() {
            return Err(HistoryError::ByeResult { round, board });
        }
        Ok(idx)
    }

    /// Whether `a` and `b` met in any recorded round. BYE boards never count.
    pub fn has_played(&self, a: &CompetitorId, b: &CompetitorId) -> bool {
        self.rounds
            .values()
            .flatten()
            .any(|pairing| pairing.involves(a, b))
    }

    pub fn status(&self, round: u32) -> RoundStatus {
        let Some(pairings) = self.rounds.get(&round) else {
            return RoundStatus::Unpaired;
        };

        let mut needed = 0;
        let mut entered = 0;
        for (idx, pairing) in pairings.iter().enumerate() {
            if pairing.is_bye() {
                continue;
            }
            needed += 1;
            if self.result(round, idx + 1).is_some() {
                entered += 1;
            }
        }

        if entered == needed {
            RoundStatus::Complete
        } else if entered == 0 {
            RoundStatus::Paired
        } else {
            RoundStatus::PartiallyEntered
        }
    }

    /// Structural check for histories loaded from disk.
    pub fn validate(&self) -> Result<(), HistoryError> {
        for (expected, (round, pairings)) in (1u32..).zip(self.rounds.iter()) {
            if *round != expected {
                return Err(HistoryError::OutOfSequenceRound {
                    requested: *round,
                    expected,
                });
            }
            validate_round(*round, pairings)?;
        }
        if let Some(round) = self.results.keys().find(|r| !self.rounds.contains_key(r)) {
            return Err(HistoryError::UnknownRound(*round));
        }
        Ok(())
    }
}

fn validate_round(round: u32, pairings: &[Pairing]) -> Result<(), HistoryError> {
    let mut seen: HashSet<&CompetitorId> = HashSet::new();
    let mut byes = 0;

    for pairing in pairings {
        pairing
            .validate()
            .map_err(|reason| HistoryError::InvalidRound { round, reason })?;
        if pairing.is_bye() {
            byes += 1;
        }
        for side in [&pairing.side1, &pairing.side2] {
            if let Some(id) = side.competitor() {
                if !seen.insert(id) {
                    return Err(HistoryError::InvalidRound {
                        round,
                        reason: format!("{} appears on more than one board", id),
                    });
                }
            }
        }
    }

    if byes > 1 {
        return Err(HistoryError::InvalidRound {
            round,
            reason: format!("{} BYE boards (at most one allowed)", byes),
        });
    }
    Ok(())
}
