//! King of the Hill: adjacent ranks meet, 1v2, 3v4, ...

use crate::calculate::rank;
use crate::models::{Competitor, FirstMover, Pairing};

/// Pair adjacent competitors in standings order. The higher-ranked side
/// always goes first; with an odd roster the bottom competitor gets the BYE.
pub fn king_of_the_hill_pairings(roster: &[Competitor]) -> Vec<Pairing> {
    let ranked = rank(roster);
    let mut pairings = Vec::with_capacity(ranked.len().div_ceil(2));

    let mut iter = ranked.into_iter();
    while let Some(higher) = iter.next() {
        match iter.next() {
            Some(lower) => pairings.push(Pairing::game(
                higher.id.clone(),
                lower.id.clone(),
                FirstMover::Side1,
            )),
            None => pairings.push(Pairing::bye(higher.id.clone())),
        }
    }
    pairings
}
