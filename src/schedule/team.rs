//! Team round robin.
//!
//! Teams are formed from the roster's `team` field in first-registration
//! order. Each full team fields its first `team_size` members; short teams
//! are left out and reported. Teams then meet on the same circle rotation as
//! individuals, and every member of one team plays every member of the other.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::circle_rounds;
use crate::models::{Competitor, CompetitorId};
use crate::pairing::PairingError;

/// Which team opens a team match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartingSide {
    First,
    Second,
}

impl fmt::Display for StartingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartingSide::First => write!(f, "first"),
            StartingSide::Second => write!(f, "second"),
        }
    }
}

/// A team and the members it fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLineup {
    pub team: String,
    pub members: Vec<CompetitorId>,
}

/// One team match. `opponent` is `None` when the team sits out the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMatch {
    pub team: TeamLineup,
    pub opponent: Option<TeamLineup>,
    pub starting: StartingSide,
    /// Every member of `team` against every member of `opponent`.
    pub boards: Vec<(CompetitorId, CompetitorId)>,
}

/// Conditions reported alongside a team schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamWarning {
    ShortTeam {
        team: String,
        members: usize,
        required: usize,
    },
}

impl fmt::Display for TeamWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamWarning::ShortTeam {
                team,
                members,
                required,
            } => write!(
                f,
                "Team '{}' has only {} of {} players and was left out",
                team, members, required
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSchedule {
    pub rounds: Vec<Vec<TeamMatch>>,
    pub warnings: Vec<TeamWarning>,
}

/// Group the roster into lineups of exactly `team_size`, in first-seen team order.
pub fn team_lineups(roster: &[Competitor], team_size: usize) -> (Vec<TeamLineup>, Vec<TeamWarning>) {
    let mut groups: Vec<TeamLineup> = Vec::new();
    for competitor in roster {
        let Some(team) = competitor.team.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            continue;
        };
        match groups.iter_mut().find(|g| g.team == team) {
            Some(group) => group.members.push(competitor.id.clone()),
            None => groups.push(TeamLineup {
                team: team.to_string(),
                members: vec![competitor.id.clone()],
            }),
        }
    }

    let mut lineups = Vec::new();
    let mut warnings = Vec::new();
    for mut group in groups {
        if group.members.len() < team_size {
            warn!(
                "Team '{}' has only {} players; skipping it (need {})",
                group.team,
                group.members.len(),
                team_size
            );
            warnings.push(TeamWarning::ShortTeam {
                team: group.team,
                members: group.members.len(),
                required: team_size,
            });
            continue;
        }
        group.members.truncate(team_size);
        lineups.push(group);
    }

    (lineups, warnings)
}

/// Build a full team round robin. The starting team of each match is random.
pub fn team_round_robin<R: Rng + ?Sized>(
    roster: &[Competitor],
    team_size: usize,
    rng: &mut R,
) -> Result<TeamSchedule, PairingError> {
    if team_size == 0 {
        return Err(PairingError::InvalidTeamSize(team_size));
    }

    let (lineups, warnings) = team_lineups(roster, team_size);
    if lineups.len() < 2 {
        return Err(PairingError::InvalidRoster {
            count: lineups.len(),
        });
    }

    let mut slots: Vec<Option<TeamLineup>> = lineups.into_iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let rounds = circle_rounds(slots)
        .into_iter()
        .map(|round| {
            round
                .into_iter()
                .filter_map(|slots| match slots {
                    (Some(a), Some(b)) => {
                        let starting = if rng.gen_bool(0.5) {
                            StartingSide::First
                        } else {
                            StartingSide::Second
                        };
                        let boards = a
                            .members
                            .iter()
                            .flat_map(|x| b.members.iter().map(move |y| (x.clone(), y.clone())))
                            .collect();
                        Some(TeamMatch {
                            team: a,
                            opponent: Some(b),
                            starting,
                            boards,
                        })
                    }
                    (Some(team), None) | (None, Some(team)) => Some(TeamMatch {
                        team,
                        opponent: None,
                        starting: StartingSide::First,
                        boards: Vec::new(),
                    }),
                    (None, None) => None,
                })
                .collect()
        })
        .collect();

    Ok(TeamSchedule { rounds, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn member(name: &str, team: &str) -> Competitor {
        Competitor::new(name, 1500).with_team(team)
    }

    fn league() -> Vec<Competitor> {
        vec![
            member("A1", "Aces"),
            member("B1", "Bolts"),
            member("A2", "Aces"),
            member("C1", "Comets"),
            member("B2", "Bolts"),
            member("C2", "Comets"),
            member("A3", "Aces"),
            member("D1", "Drifters"),
            Competitor::new("Solo", 1200),
        ]
    }

    #[test]
    fn test_lineups_keep_first_seen_order_and_skip_short_teams() {
        let (lineups, warnings) = team_lineups(&league(), 2);

        let names: Vec<&str> = lineups.iter().map(|l| l.team.as_str()).collect();
        assert_eq!(names, vec!["Aces", "Bolts", "Comets"]);
        assert_eq!(lineups[0].members, vec!["A1".into(), "A2".into()]);
        assert_eq!(
            warnings,
            vec![TeamWarning::ShortTeam {
                team: "Drifters".to_string(),
                members: 1,
                required: 2
            }]
        );
    }

    #[test]
    fn test_team_round_robin_odd_team_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let schedule = team_round_robin(&league(), 2, &mut rng).unwrap();

        assert_eq!(schedule.rounds.len(), 3);
        for round in &schedule.rounds {
            assert_eq!(round.len(), 2);
            assert_eq!(round.iter().filter(|m| m.opponent.is_none()).count(), 1);
            for team_match in round.iter().filter(|m| m.opponent.is_some()) {
                assert_eq!(team_match.boards.len(), 4);
            }
        }
    }

    #[test]
    fn test_team_round_robin_needs_two_full_teams() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            team_round_robin(&league(), 3, &mut rng),
            Err(PairingError::InvalidRoster { count: 1 })
        );
        assert_eq!(
            team_round_robin(&league(), 0, &mut rng),
            Err(PairingError::InvalidTeamSize(0))
        );
    }
}
