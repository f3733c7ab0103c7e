//! Standings recalculation engine.
//!
//! Records are never patched incrementally. Every call resets each
//! competitor and replays all recorded results in ascending round order:
//! - Winner: +1 win, +margin spread
//! - Loser: +1 loss, -margin spread
//! - Tie: +0.5 win and +0.5 loss each, spread unchanged
//!
//! BYE boards and boards without a result are skipped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Competitor, CompetitorId, History, Outcome, Record};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculateError {
    #[error("Round {round} references '{competitor}', who is not on the roster")]
    UnknownCompetitor { round: u32, competitor: CompetitorId },
}

/// Replay the whole history onto a fresh copy of the roster.
pub fn recalculate(roster: &[Competitor], history: &History) -> Result<Vec<Competitor>, CalculateError> {
    let updated = recalculate_through(roster, history, u32::MAX)?;
    info!(
        "Recalculated standings for {} competitors through round {}",
        updated.len(),
        history.last_round()
    );
    Ok(updated)
}

/// Replay results from rounds `1..=through` only.
pub fn recalculate_through(
    roster: &[Competitor],
    history: &History,
    through: u32,
) -> Result<Vec<Competitor>, CalculateError> {
    let mut records: HashMap<&CompetitorId, Record> =
        roster.iter().map(|c| (&c.id, Record::default())).collect();
    let mut applied = 0usize;

    for (match_id, pairing, result) in history.games() {
        if match_id.round > through {
            break;
        }
        let Some(result) = result else {
            continue;
        };
        let Some((a, b)) = pairing.competitors() else {
            continue;
        };

        for (me, opponent, seen_from) in [(a, b, *result), (b, a, result.flipped())] {
            records
                .get_mut(me)
                .ok_or_else(|| CalculateError::UnknownCompetitor {
                    round: match_id.round,
                    competitor: me.clone(),
                })?
                .apply(match_id.round, opponent.clone(), Outcome::from_result(&seen_from));
        }
        applied += 1;
    }
    debug!("Applied {} results through round {}", applied, through);

    Ok(roster
        .iter()
        .map(|c| Competitor {
            record: records.remove(&c.id).unwrap_or_default(),
            ..c.clone()
        })
        .collect())
}

/// Roster in standings order: wins, then spread, both descending.
/// Equal records keep registration order.
pub fn rank(roster: &[Competitor]) -> Vec<&Competitor> {
    let mut ranked: Vec<&Competitor> = roster.iter().collect();
    ranked.sort_by(|a, b| a.record.rank_cmp(&b.record));
    ranked
}

/// One printable standings line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub position: usize,
    pub competitor: CompetitorId,
    pub rating: i32,
    pub wins: f64,
    pub losses: f64,
    pub spread: i64,
    pub last_result: String,
}

pub fn standings_table(roster: &[Competitor]) -> Vec<StandingRow> {
    rank(roster)
        .into_iter()
        .enumerate()
        .map(|(idx, c)| StandingRow {
            position: idx + 1,
            competitor: c.id.clone(),
            rating: c.rating,
            wins: c.record.wins,
            losses: c.record.losses,
            spread: c.record.spread,
            last_result: c.record.last_result(),
        })
        .collect()
}
