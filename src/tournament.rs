//! The tournament aggregate: roster, round history and the operations that
//! move them forward together.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::calculate::{rank, recalculate, CalculateError};
use crate::models::{
    Competitor, CompetitorId, GameResult, History, HistoryError, Pairing, ResultError,
    RoundStatus, TournamentId,
};
use crate::pairing::{pair_round, PairingError, PairingOptions, PairingReport, PairingSystem};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TournamentError {
    #[error("Competitor '{0}' is already registered")]
    DuplicateCompetitor(CompetitorId),

    #[error("Competitor name '{0}' is reserved")]
    ReservedName(CompetitorId),

    #[error("Registration is closed once round 1 has been paired")]
    RosterLocked,

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    InvalidResult(#[from] ResultError),

    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error(transparent)]
    Standings(#[from] CalculateError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub roster: Vec<Competitor>,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub last_system: Option<PairingSystem>,
}

impl Tournament {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        let name = name.into();
        let id = TournamentId::generate(&[&name, &date.to_string()]);
        Self {
            id,
            name,
            date,
            venue: None,
            roster: Vec::new(),
            history: History::new(),
            last_system: None,
        }
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    pub fn competitor(&self, id: &CompetitorId) -> Option<&Competitor> {
        self.roster.iter().find(|c| &c.id == id)
    }

    /// Add a competitor. Only allowed before any round is paired.
    pub fn register(&mut self, competitor: Competitor) -> Result<(), TournamentError> {
        if !self.history.is_empty() {
            return Err(TournamentError::RosterLocked);
        }
        if competitor.id.is_reserved() {
            return Err(TournamentError::ReservedName(competitor.id));
        }
        if self.competitor(&competitor.id).is_some() {
            return Err(TournamentError::DuplicateCompetitor(competitor.id));
        }

        info!("Registered {} in {}", competitor.id, self.name);
        self.roster.push(competitor);
        Ok(())
    }

    /// Pair the next round and commit it. Round Robin may commit several rounds.
    ///
    /// Nothing is committed when an error is returned.
    pub fn pair_next_round<R: Rng + ?Sized>(
        &mut self,
        system: PairingSystem,
        options: &PairingOptions,
        rng: &mut R,
    ) -> Result<PairingReport, TournamentError> {
        let round = self.history.next_round();
        let report = pair_round(system, &self.roster, &self.history, round, options, rng)?;

        let mut staged = self.history.clone();
        for (number, pairings) in report.round_numbers().zip(report.rounds.iter()) {
            staged.append_round(number, pairings.clone())?;
        }
        self.history = staged;
        self.last_system = Some(system);

        info!(
            "Committed {} round(s) from round {} with {}",
            report.rounds_committed(),
            report.first_round,
            system.label()
        );
        Ok(report)
    }

    /// Remove the most recent round and refresh standings.
    pub fn unpair_round(&mut self, round: u32) -> Result<Vec<Pairing>, TournamentError> {
        let removed = self.history.unpair_round(round)?;
        self.recalculate()?;
        info!("Unpaired round {} of {}", round, self.name);
        Ok(removed)
    }

    /// Store a result on a 1-based board, replacing any earlier one, then refresh standings.
    pub fn record_result(
        &mut self,
        round: u32,
        board: usize,
        result: GameResult,
    ) -> Result<Option<GameResult>, TournamentError> {
        result.validate()?;
        let previous = self.history.record_result(round, board, result)?;
        if let Err(e) = self.recalculate() {
            // Keep history and standings consistent with each other.
            match previous {
                Some(old) => {
                    self.history.record_result(round, board, old)?;
                }
                None => {
                    self.history.clear_result(round, board)?;
                }
            }
            return Err(e);
        }
        Ok(previous)
    }

    pub fn recalculate(&mut self) -> Result<(), TournamentError> {
        self.roster = recalculate(&self.roster, &self.history)?;
        Ok(())
    }

    /// Roster in standings order.
    pub fn standings(&self) -> Vec<&Competitor> {
        rank(&self.roster)
    }

    pub fn round_status(&self, round: u32) -> RoundStatus {
        self.history.status(round)
    }

    pub fn roster_ids(&self) -> Vec<CompetitorId> {
        self.roster.iter().map(|c| c.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tournament(names: &[&str]) -> Tournament {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let mut t = Tournament::new("Spring Open", date);
        for name in names {
            t.register(Competitor::new(*name, 1500)).unwrap();
        }
        t
    }

    #[test]
    fn test_id_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let a = Tournament::new("Spring Open", date);
        let b = Tournament::new("Spring Open", date);
        let c = Tournament::new("Autumn Open", date);

        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(a.id.as_str().len(), 16);
    }

    #[test]
    fn test_register_rejects_duplicates_and_bye() {
        let mut t = tournament(&["A"]);
        assert_eq!(
            t.register(Competitor::new("A", 1200)),
            Err(TournamentError::DuplicateCompetitor("A".into()))
        );
        assert_eq!(
            t.register(Competitor::new("Bye", 1200)),
            Err(TournamentError::ReservedName("Bye".into()))
        );
    }

    #[test]
    fn test_roster_locks_after_pairing() {
        let mut t = tournament(&["A", "B"]);
        let mut rng = StdRng::seed_from_u64(3);
        t.pair_next_round(PairingSystem::Random, &PairingOptions::default(), &mut rng)
            .unwrap();

        assert_eq!(
            t.register(Competitor::new("Late", 1500)),
            Err(TournamentError::RosterLocked)
        );
    }

    #[test]
    fn test_round_robin_commits_requested_rounds() {
        let mut t = tournament(&["A", "B", "C", "D"]);
        let mut rng = StdRng::seed_from_u64(3);
        let options = PairingOptions {
            round_robin_rounds: Some(2),
            ..Default::default()
        };

        let report = t
            .pair_next_round(PairingSystem::RoundRobin, &options, &mut rng)
            .unwrap();

        assert_eq!(report.rounds_committed(), 2);
        assert_eq!(t.history.last_round(), 2);
        assert_eq!(t.last_system, Some(PairingSystem::RoundRobin));
        assert_eq!(t.round_status(3), RoundStatus::Unpaired);
    }

    #[test]
    fn test_failed_pairing_commits_nothing() {
        let mut t = tournament(&["A", "B", "C"]);
        let mut rng = StdRng::seed_from_u64(3);
        let options = PairingOptions {
            round_robin_rounds: Some(9),
            ..Default::default()
        };

        let err = t
            .pair_next_round(PairingSystem::RoundRobin, &options, &mut rng)
            .unwrap_err();

        assert!(matches!(
            err,
            TournamentError::Pairing(PairingError::InvalidRoundRobinCount { .. })
        ));
        assert!(t.history.is_empty());
        assert_eq!(t.last_system, None);
    }

    #[test]
    fn test_record_result_updates_standings() {
        let mut t = tournament(&["A", "B", "C", "D"]);
        let mut rng = StdRng::seed_from_u64(3);
        t.pair_next_round(PairingSystem::KingOfTheHill, &PairingOptions::default(), &mut rng)
            .unwrap();

        // King of the Hill on a fresh roster keeps registration order: A v B, C v D.
        t.record_result(1, 1, GameResult::new(350, 400)).unwrap();
        assert_eq!(t.round_status(1), RoundStatus::PartiallyEntered);

        let top = t.standings()[0];
        assert_eq!(top.id.as_str(), "B");
        assert_eq!(top.record.spread, 50);

        // Corrections overwrite.
        let previous = t.record_result(1, 1, GameResult::new(400, 350)).unwrap();
        assert_eq!(previous, Some(GameResult::new(350, 400)));
        assert_eq!(t.standings()[0].id.as_str(), "A");

        t.record_result(1, 2, GameResult::new(300, 300)).unwrap();
        assert_eq!(t.round_status(1), RoundStatus::Complete);
    }

    #[test]
    fn test_out_of_range_score_is_rejected() {
        let mut t = tournament(&["A", "B"]);
        let mut rng = StdRng::seed_from_u64(3);
        t.pair_next_round(PairingSystem::KingOfTheHill, &PairingOptions::default(), &mut rng)
            .unwrap();

        assert!(matches!(
            t.record_result(1, 1, GameResult::new(i64::MAX, -1)),
            Err(TournamentError::InvalidResult(ResultError::ScoreOutOfRange { field: "score1", .. }))
        ));
        assert_eq!(t.round_status(1), RoundStatus::Paired);
        assert!(t.roster.iter().all(|c| c.record.games_played() == 0));
    }

    #[test]
    fn test_bye_board_takes_no_result() {
        let mut t = tournament(&["A", "B", "C"]);
        let mut rng = StdRng::seed_from_u64(3);
        t.pair_next_round(PairingSystem::KingOfTheHill, &PairingOptions::default(), &mut rng)
            .unwrap();

        assert_eq!(
            t.record_result(1, 2, GameResult::new(1, 0)),
            Err(TournamentError::History(HistoryError::ByeResult { round: 1, board: 2 }))
        );
        assert_eq!(t.round_status(1), RoundStatus::Paired);
    }

    #[test]
    fn test_unpair_discards_results() {
        let mut t = tournament(&["A", "B"]);
        let mut rng = StdRng::seed_from_u64(3);
        t.pair_next_round(PairingSystem::KingOfTheHill, &PairingOptions::default(), &mut rng)
            .unwrap();
        t.record_result(1, 1, GameResult::new(10, 0)).unwrap();

        let removed = t.unpair_round(1).unwrap();

        assert_eq!(removed.len(), 1);
        assert!(t.history.is_empty());
        assert!(t.roster.iter().all(|c| c.record.games_played() == 0));
    }
}
