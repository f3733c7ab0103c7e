//! Pairing strategies.
//!
//! Every strategy turns a roster snapshot (plus, where relevant, the round
//! history) into one round's list of pairings. Round Robin is the exception:
//! it produces the first `count` rounds of a full schedule in one call.
//!
//! | System | Ordering | First mover |
//! |---|---|---|
//! | Round Robin | registration order | balanced |
//! | Random | shuffled | random |
//! | King of the Hill | (wins, spread) desc | higher ranked |
//! | Australian Draw | (wins, spread) desc | random |
//! | Lagged Australian | (wins, spread) desc, lagged results | random |

mod australian;
mod king_of_the_hill;
mod random;
mod round_robin;

pub use australian::*;
pub use king_of_the_hill::*;
pub use random::*;
pub use round_robin::*;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculate::CalculateError;
use crate::models::{Competitor, CompetitorId, History, HistoryError, Pairing};

/// Errors raised by pairing calls. History is never modified when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    #[error("At least 2 competitors are required to pair a round (got {count})")]
    InvalidRoster { count: usize },

    #[error("Competitor '{0}' appears more than once in the roster")]
    DuplicateCompetitor(CompetitorId),

    #[error("Competitor name '{0}' is reserved")]
    ReservedName(CompetitorId),

    #[error("Round robin count {requested} is outside 1..={max}")]
    InvalidRoundRobinCount { requested: usize, max: usize },

    #[error("Team size must be at least 1 (got {0})")]
    InvalidTeamSize(usize),

    #[error("Unknown pairing system: {0}")]
    UnknownSystem(String),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Standings(#[from] CalculateError),
}

/// Reportable conditions that do not fail the pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingWarning {
    /// Every remaining candidate had already played this competitor.
    ForcedRepeat {
        round: u32,
        competitor: CompetitorId,
        opponent: CompetitorId,
    },
}

impl fmt::Display for PairingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingWarning::ForcedRepeat {
                round,
                competitor,
                opponent,
            } => write!(
                f,
                "Round {}: {} and {} have already played (forced repeat)",
                round, competitor, opponent
            ),
        }
    }
}

/// The selectable pairing systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingSystem {
    RoundRobin,
    Random,
    KingOfTheHill,
    Australian,
    LaggedAustralian,
}

impl PairingSystem {
    pub const ALL: [PairingSystem; 5] = [
        PairingSystem::RoundRobin,
        PairingSystem::Random,
        PairingSystem::KingOfTheHill,
        PairingSystem::Australian,
        PairingSystem::LaggedAustralian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PairingSystem::RoundRobin => "round-robin",
            PairingSystem::Random => "random",
            PairingSystem::KingOfTheHill => "king-of-the-hill",
            PairingSystem::Australian => "australian",
            PairingSystem::LaggedAustralian => "lagged-australian",
        }
    }

    /// Human-facing name.
    pub fn label(&self) -> &'static str {
        match self {
            PairingSystem::RoundRobin => "Round Robin",
            PairingSystem::Random => "Random Pairing",
            PairingSystem::KingOfTheHill => "King of the Hills Pairing",
            PairingSystem::Australian => "Australian Draw",
            PairingSystem::LaggedAustralian => "Lagged Australian",
        }
    }
}

impl fmt::Display for PairingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PairingSystem {
    type Err = PairingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PairingSystem::ALL
            .into_iter()
            .find(|system| {
                system.as_str().eq_ignore_ascii_case(wanted)
                    || system.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| PairingError::UnknownSystem(s.to_string()))
    }
}

/// Tunables for a pairing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingOptions {
    /// Round Robin: how many rounds of the schedule to commit. `None` = all.
    pub round_robin_rounds: Option<usize>,
    /// Lagged Australian reads results through round `N - lag_rounds`.
    pub lag_rounds: u32,
    /// Lagged Australian pairs randomly while the round is below this.
    pub lagged_random_until: u32,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            round_robin_rounds: None,
            lag_rounds: 1,
            lagged_random_until: 3,
        }
    }
}

/// Output of a pairing call: one or more consecutive rounds starting at `first_round`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingReport {
    pub system: PairingSystem,
    pub first_round: u32,
    pub rounds: Vec<Vec<Pairing>>,
    pub warnings: Vec<PairingWarning>,
}

impl PairingReport {
    pub fn single(system: PairingSystem, round: u32, pairings: Vec<Pairing>) -> Self {
        Self {
            system,
            first_round: round,
            rounds: vec![pairings],
            warnings: Vec::new(),
        }
    }

    pub fn rounds_committed(&self) -> usize {
        self.rounds.len()
    }

    /// Round numbers covered by this report.
    pub fn round_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        (self.first_round..).take(self.rounds.len())
    }
}

/// Reject rosters too small to pair, duplicate identities and the reserved BYE name.
pub fn validate_roster(ids: &[CompetitorId]) -> Result<(), PairingError> {
    if ids.len() < 2 {
        return Err(PairingError::InvalidRoster { count: ids.len() });
    }

    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if id.is_reserved() {
            return Err(PairingError::ReservedName(id.clone()));
        }
        if !seen.insert(id) {
            return Err(PairingError::DuplicateCompetitor(id.clone()));
        }
    }
    Ok(())
}

/// Pair `round` with the selected system. `round` must be the history's next round.
pub fn pair_round<R: Rng + ?Sized>(
    system: PairingSystem,
    roster: &[Competitor],
    history: &History,
    round: u32,
    options: &PairingOptions,
    rng: &mut R,
) -> Result<PairingReport, PairingError> {
    let expected = history.next_round();
    if round != expected {
        return Err(HistoryError::OutOfSequenceRound {
            requested: round,
            expected,
        }
        .into());
    }

    let ids: Vec<CompetitorId> = roster.iter().map(|c| c.id.clone()).collect();
    validate_roster(&ids)?;
    debug!(
        "Pairing round {} with {} for {} competitors",
        round,
        system,
        ids.len()
    );

    let report = match system {
        PairingSystem::RoundRobin => {
            let rounds = round_robin_pairings(&ids, options.round_robin_rounds, rng)?;
            PairingReport {
                system,
                first_round: round,
                rounds,
                warnings: Vec::new(),
            }
        }
        PairingSystem::Random => PairingReport::single(system, round, random_pairings(&ids, rng)),
        PairingSystem::KingOfTheHill => {
            PairingReport::single(system, round, king_of_the_hill_pairings(roster))
        }
        PairingSystem::Australian => {
            let (pairings, warnings) = australian_draw_pairings(roster, history, round, rng);
            PairingReport {
                warnings,
                ..PairingReport::single(system, round, pairings)
            }
        }
        PairingSystem::LaggedAustralian => {
            let (pairings, warnings) = lagged_australian_pairings(roster, history, round, options, rng)?;
            PairingReport {
                warnings,
                ..PairingReport::single(system, round, pairings)
            }
        }
    };

    for warning in &report.warnings {
        warn!("{}", warning);
    }
    Ok(report)
}
