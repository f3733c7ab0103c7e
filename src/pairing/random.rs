//! Random pairing: shuffle, then pair neighbours.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{CompetitorId, FirstMover, Pairing};

/// Shuffle the roster and pair consecutive entries. With an odd roster the
/// last competitor after the shuffle gets the BYE.
pub fn random_pairings<R: Rng + ?Sized>(ids: &[CompetitorId], rng: &mut R) -> Vec<Pairing> {
    let mut shuffled = ids.to_vec();
    shuffled.shuffle(rng);

    let mut pairings = Vec::with_capacity(shuffled.len().div_ceil(2));
    let mut iter = shuffled.into_iter();
    while let Some(a) = iter.next() {
        match iter.next() {
            Some(b) => pairings.push(Pairing::game(a, b, random_first(rng))),
            None => pairings.push(Pairing::bye(a)),
        }
    }
    pairings
}

/// Coin flip for the first mover.
pub(crate) fn random_first<R: Rng + ?Sized>(rng: &mut R) -> FirstMover {
    if rng.gen_bool(0.5) {
        FirstMover::Side1
    } else {
        FirstMover::Side2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ids(names: &[&str]) -> Vec<CompetitorId> {
        names.iter().map(|n| CompetitorId::from(*n)).collect()
    }

    #[test]
    fn test_even_roster_no_bye() {
        let mut rng = StdRng::seed_from_u64(42);
        let pairings = random_pairings(&ids(&["A", "B", "C", "D"]), &mut rng);

        assert_eq!(pairings.len(), 2);
        assert!(pairings.iter().all(|p| !p.is_bye()));
    }

    #[test]
    fn test_odd_roster_bye_is_last_board() {
        let mut rng = StdRng::seed_from_u64(42);
        let pairings = random_pairings(&ids(&["A", "B", "C", "D", "E"]), &mut rng);

        assert_eq!(pairings.len(), 3);
        assert!(pairings[2].is_bye());
        assert_eq!(pairings[2].first_mover(), pairings[2].bye_recipient());
        assert!(pairings[..2].iter().all(|p| !p.is_bye()));
    }

    #[test]
    fn test_same_seed_same_draw() {
        let roster = ids(&["A", "B", "C", "D", "E", "F", "G"]);
        let first = random_pairings(&roster, &mut StdRng::seed_from_u64(7));
        let second = random_pairings(&roster, &mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
    }
}
