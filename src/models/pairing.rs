//! Pairing model: two sides of a board and who moves first.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CompetitorId, Side};

/// Which side of a pairing plays first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstMover {
    Side1,
    Side2,
}

/// A single board in a round.
///
/// `side1`/`side2` order is significant: a result's `score1` belongs to `side1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub side1: Side,
    pub side2: Side,
    pub first: FirstMover,
}

impl Pairing {
    /// A real game between two competitors.
    pub fn game(a: CompetitorId, b: CompetitorId, first: FirstMover) -> Self {
        Self {
            side1: Side::Competitor(a),
            side2: Side::Competitor(b),
            first,
        }
    }

    /// A BYE board. The real competitor always goes first.
    pub fn bye(competitor: CompetitorId) -> Self {
        Self {
            side1: Side::Competitor(competitor),
            side2: Side::Bye,
            first: FirstMover::Side1,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.side1.is_bye() || self.side2.is_bye()
    }

    /// The competitor who goes first, if the pairing is well-formed.
    pub fn first_mover(&self) -> Option<&CompetitorId> {
        match self.first {
            FirstMover::Side1 => self.side1.competitor(),
            FirstMover::Side2 => self.side2.competitor(),
        }
    }

    /// The real competitor sitting out, for BYE boards.
    pub fn bye_recipient(&self) -> Option<&CompetitorId> {
        match (&self.side1, &self.side2) {
            (Side::Competitor(id), Side::Bye) | (Side::Bye, Side::Competitor(id)) => Some(id),
            _ => None,
        }
    }

    /// Both competitors of a real game.
    pub fn competitors(&self) -> Option<(&CompetitorId, &CompetitorId)> {
        match (&self.side1, &self.side2) {
            (Side::Competitor(a), Side::Competitor(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn contains(&self, id: &CompetitorId) -> bool {
        self.side1.competitor() == Some(id) || self.side2.competitor() == Some(id)
    }

    /// Unordered match against `{a, b}`. BYE boards never match.
    pub fn involves(&self, a: &CompetitorId, b: &CompetitorId) -> bool {
        match self.competitors() {
            Some((x, y)) => (x == a && y == b) || (x == b && y == a),
            None => false,
        }
    }

    pub fn opponent_of(&self, id: &CompetitorId) -> Option<&Side> {
        if self.side1.competitor() == Some(id) {
            Some(&self.side2)
        } else if self.side2.competitor() == Some(id) {
            Some(&self.side1)
        } else {
            None
        }
    }

    /// Check the shape invariants: no double BYE, no self-pairing,
    /// and the first mover of a BYE board is the real competitor.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.side1, &self.side2) {
            (Side::Bye, Side::Bye) => Err("both sides are BYE".to_string()),
            (Side::Competitor(a), Side::Competitor(b)) if a == b => {
                Err(format!("{} is paired against themselves", a))
            }
            _ if self.first_mover().is_none() => {
                Err("BYE cannot be the first mover".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.side1, self.side2)?;
        if let Some(first) = self.first_mover() {
            write!(f, " (First: {})", first)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> CompetitorId {
        CompetitorId::from(name)
    }

    #[test]
    fn test_game_pairing() {
        let pairing = Pairing::game(id("Alice"), id("Bob"), FirstMover::Side2);

        assert!(!pairing.is_bye());
        assert_eq!(pairing.first_mover(), Some(&id("Bob")));
        assert!(pairing.involves(&id("Bob"), &id("Alice")));
        assert_eq!(pairing.opponent_of(&id("Alice")), Some(&Side::from(id("Bob"))));
        assert!(pairing.validate().is_ok());
    }

    #[test]
    fn test_bye_pairing_first_mover_is_real() {
        let pairing = Pairing::bye(id("Carol"));

        assert!(pairing.is_bye());
        assert_eq!(pairing.first_mover(), Some(&id("Carol")));
        assert_eq!(pairing.bye_recipient(), Some(&id("Carol")));
        assert!(pairing.competitors().is_none());
        assert!(!pairing.involves(&id("Carol"), &id("BYE")));
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let self_pair = Pairing::game(id("Alice"), id("Alice"), FirstMover::Side1);
        assert!(self_pair.validate().is_err());

        let bye_first = Pairing {
            side1: Side::Competitor(id("Alice")),
            side2: Side::Bye,
            first: FirstMover::Side2,
        };
        assert!(bye_first.validate().is_err());

        let double_bye = Pairing {
            side1: Side::Bye,
            side2: Side::Bye,
            first: FirstMover::Side1,
        };
        assert!(double_bye.validate().is_err());
    }

    #[test]
    fn test_display() {
        let pairing = Pairing::game(id("Alice"), id("Bob"), FirstMover::Side1);
        assert_eq!(pairing.to_string(), "Alice vs Bob (First: Alice)");
        assert_eq!(Pairing::bye(id("Carol")).to_string(), "Carol vs BYE (First: Carol)");
    }

    #[test]
    fn test_pairing_serialization() {
        let pairing = Pairing::bye(id("Carol"));
        let json = serde_json::to_string(&pairing).unwrap();
        let deserialized: Pairing = serde_json::from_str(&json).unwrap();
        assert_eq!(pairing, deserialized);
    }
}
