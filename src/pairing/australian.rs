//! Australian Draw and its lagged variant.
//!
//! Walk the standings top-down; each unpaired competitor meets the nearest
//! unpaired competitor below them that they have not played yet. When every
//! remaining candidate is a repeat, the nearest one is taken anyway and a
//! `ForcedRepeat` warning is reported. The greedy pass does not try to
//! minimise repeats across the whole round.

use rand::Rng;
use tracing::debug;

use super::random::{random_first, random_pairings};
use super::{PairingError, PairingOptions, PairingWarning};
use crate::calculate::{rank, recalculate_through};
use crate::models::{Competitor, CompetitorId, History, Pairing, PlayedIndex};

/// Greedy repeat-avoiding draw over an already ranked list.
///
/// Only real competitors are scanned. With an odd count the one competitor
/// left unpaired after the pass receives the BYE.
pub fn greedy_draw<R: Rng + ?Sized>(
    ranked: &[CompetitorId],
    played: &PlayedIndex,
    round: u32,
    rng: &mut R,
) -> (Vec<Pairing>, Vec<PairingWarning>) {
    let mut used = vec![false; ranked.len()];
    let mut pairings = Vec::with_capacity(ranked.len().div_ceil(2));
    let mut warnings = Vec::new();

    for i in 0..ranked.len() {
        if used[i] {
            continue;
        }

        let mut fresh = None;
        let mut nearest = None;
        for j in (i + 1)..ranked.len() {
            if used[j] {
                continue;
            }
            nearest.get_or_insert(j);
            if !played.has_played(&ranked[i], &ranked[j]) {
                fresh = Some(j);
                break;
            }
        }

        // Nobody left below: `i` is the leftover and sits out after the pass.
        let Some(j) = fresh.or(nearest) else {
            continue;
        };
        used[i] = true;
        used[j] = true;

        let (a, b) = (&ranked[i], &ranked[j]);
        if fresh.is_none() {
            warnings.push(PairingWarning::ForcedRepeat {
                round,
                competitor: a.clone(),
                opponent: b.clone(),
            });
        }
        pairings.push(Pairing::game(a.clone(), b.clone(), random_first(rng)));
    }

    if let Some(idx) = used.iter().position(|u| !u) {
        debug!("Round {}: {} receives the BYE", round, ranked[idx]);
        pairings.push(Pairing::bye(ranked[idx].clone()));
    }

    (pairings, warnings)
}

/// Australian Draw on the roster's current records.
pub fn australian_draw_pairings<R: Rng + ?Sized>(
    roster: &[Competitor],
    history: &History,
    round: u32,
    rng: &mut R,
) -> (Vec<Pairing>, Vec<PairingWarning>) {
    let ranked: Vec<CompetitorId> = rank(roster).into_iter().map(|c| c.id.clone()).collect();
    let played = PlayedIndex::from_history(history);
    greedy_draw(&ranked, &played, round, rng)
}

/// Australian Draw on standings that trail the round being paired.
///
/// Early rounds (below `options.lagged_random_until`) are paired randomly and
/// never read standings. Later rounds rank on results through round
/// `round - options.lag_rounds`; repeat checks still cover the whole history.
pub fn lagged_australian_pairings<R: Rng + ?Sized>(
    roster: &[Competitor],
    history: &History,
    round: u32,
    options: &PairingOptions,
    rng: &mut R,
) -> Result<(Vec<Pairing>, Vec<PairingWarning>), PairingError> {
    if round < options.lagged_random_until {
        debug!("Round {} is too early for lagged standings; pairing randomly", round);
        let ids: Vec<CompetitorId> = roster.iter().map(|c| c.id.clone()).collect();
        return Ok((random_pairings(&ids, rng), Vec::new()));
    }

    let through = round.saturating_sub(options.lag_rounds);
    debug!("Round {} ranks on results through round {}", round, through);

    let lagged = recalculate_through(roster, history, through)?;
    let ranked: Vec<CompetitorId> = rank(&lagged).into_iter().map(|c| c.id.clone()).collect();
    let played = PlayedIndex::from_history(history);
    Ok(greedy_draw(&ranked, &played, round, rng))
}
