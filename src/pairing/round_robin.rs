//! Round Robin: a full circle-method schedule with balanced first movers.

use rand::Rng;
use tracing::debug;

use super::{validate_roster, PairingError};
use crate::models::{CompetitorId, Pairing};
use crate::schedule::{assign_first_movers, full_round_robin_rounds, round_robin_schedule};

/// The first `count` rounds of a round robin in registration order.
///
/// `count` defaults to the full schedule and must lie in `1..=N′−1`. It is
/// checked before any schedule is generated.
pub fn round_robin_pairings<R: Rng + ?Sized>(
    ids: &[CompetitorId],
    count: Option<usize>,
    rng: &mut R,
) -> Result<Vec<Vec<Pairing>>, PairingError> {
    validate_roster(ids)?;

    let max = full_round_robin_rounds(ids.len());
    let count = count.unwrap_or(max);
    if count == 0 || count > max {
        return Err(PairingError::InvalidRoundRobinCount {
            requested: count,
            max,
        });
    }

    let mut schedule = round_robin_schedule(ids)?;
    schedule.truncate(count);
    debug!("Committing {} of {} round robin rounds", count, max);

    Ok(assign_first_movers(schedule, rng))
}
