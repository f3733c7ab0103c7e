//! Cached repeat-opponent lookup.

use std::collections::HashSet;

use super::{CompetitorId, History};

/// Symmetric "has played" set keyed by unordered competitor pair.
///
/// Built from a history snapshot; rebuild after any round is added or removed.
#[derive(Debug, Clone, Default)]
pub struct PlayedIndex {
    pairs: HashSet<(CompetitorId, CompetitorId)>,
}

impl PlayedIndex {
    pub fn from_history(history: &History) -> Self {
        let pairs = history
            .rounds()
            .flat_map(|(_, pairings)| pairings.iter())
            .filter_map(|pairing| pairing.competitors())
            .map(|(a, b)| key(a, b))
            .collect();
        Self { pairs }
    }

    pub fn has_played(&self, a: &CompetitorId, b: &CompetitorId) -> bool {
        self.pairs.contains(&key(a, b))
    }

    /// Number of distinct pairs that have met.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn key(a: &CompetitorId, b: &CompetitorId) -> (CompetitorId, CompetitorId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}
