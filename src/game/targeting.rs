//! Target ranking policies

use std::fmt;
use std::str::FromStr;

use super::state::{Arena, PlayerState};

/// How to rank opposing players when picking whom to engage.
/// Ties always go to the first player in arena iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPolicy {
    /// Chase the leader
    #[default]
    HighestScore,
    /// Chase whoever is closest by Manhattan distance
    Nearest,
}

impl TargetPolicy {
    /// Pick a target among every player except `self_id`
    pub fn select<'a>(
        self,
        arena: &'a Arena,
        self_id: &str,
        me: &PlayerState,
    ) -> Option<(&'a str, &'a PlayerState)> {
        let candidates = arena
            .players
            .iter()
            .filter(|(id, _)| id.as_str() != self_id)
            .map(|(id, state)| (id.as_str(), state));

        match self {
            // `max_by_key` keeps the last maximum, so fold by hand to keep the first
            TargetPolicy::HighestScore => candidates.reduce(|best, candidate| {
                if candidate.1.score > best.1.score {
                    candidate
                } else {
                    best
                }
            }),
            TargetPolicy::Nearest => {
                candidates.min_by_key(|(_, state)| me.position.manhattan(&state.position))
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetPolicy::HighestScore => "highest_score",
            TargetPolicy::Nearest => "nearest",
        }
    }
}

impl fmt::Display for TargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown target policy: {0} (expected highest_score or nearest)")]
pub struct ParsePolicyError(String);

impl FromStr for TargetPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "highest_score" | "score" => Ok(TargetPolicy::HighestScore),
            "nearest" | "closest" => Ok(TargetPolicy::Nearest),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Heading;

    fn arena() -> Arena {
        Arena::new(10, 10)
            .with_player("me", PlayerState::new(0, 0, Heading::East, 1, false))
            .with_player("far", PlayerState::new(9, 9, Heading::North, 7, false))
            .with_player("near", PlayerState::new(1, 1, Heading::North, 2, false))
            .with_player("tied", PlayerState::new(5, 5, Heading::North, 7, false))
    }

    #[test]
    fn highest_score_keeps_first_on_tie() {
        let arena = arena();
        let me = &arena.players["me"];
        let (id, target) = TargetPolicy::HighestScore.select(&arena, "me", me).unwrap();
        assert_eq!(id, "far");
        assert_eq!(target.score, 7);
    }

    #[test]
    fn ties_follow_listing_order_not_id_order() {
        let arena = Arena::new(10, 10)
            .with_player("me", PlayerState::new(0, 0, Heading::East, 0, false))
            .with_player("zeta", PlayerState::new(5, 0, Heading::North, 5, false))
            .with_player("alpha", PlayerState::new(0, 5, Heading::North, 5, false));
        let me = &arena.players["me"];

        let (id, _) = TargetPolicy::HighestScore.select(&arena, "me", me).unwrap();
        assert_eq!(id, "zeta");
        let (id, _) = TargetPolicy::Nearest.select(&arena, "me", me).unwrap();
        assert_eq!(id, "zeta");
    }

    #[test]
    fn nearest_by_manhattan_distance() {
        let arena = arena();
        let me = &arena.players["me"];
        let (id, _) = TargetPolicy::Nearest.select(&arena, "me", me).unwrap();
        assert_eq!(id, "near");
    }

    #[test]
    fn nearest_keeps_first_on_tie() {
        let arena = Arena::new(10, 10)
            .with_player("me", PlayerState::new(5, 5, Heading::East, 0, false))
            .with_player("a", PlayerState::new(5, 3, Heading::East, 0, false))
            .with_player("b", PlayerState::new(7, 5, Heading::East, 0, false));
        let me = &arena.players["me"];
        let (id, _) = TargetPolicy::Nearest.select(&arena, "me", me).unwrap();
        assert_eq!(id, "a");
    }

    #[test]
    fn self_is_never_a_target() {
        let arena = Arena::new(3, 3).with_player("me", PlayerState::new(0, 0, Heading::East, 99, false));
        let me = &arena.players["me"];
        assert!(TargetPolicy::HighestScore.select(&arena, "me", me).is_none());
        assert!(TargetPolicy::Nearest.select(&arena, "me", me).is_none());
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("highest_score".parse::<TargetPolicy>().unwrap(), TargetPolicy::HighestScore);
        assert_eq!("Nearest".parse::<TargetPolicy>().unwrap(), TargetPolicy::Nearest);
        assert_eq!("highest-score".parse::<TargetPolicy>().unwrap(), TargetPolicy::HighestScore);
        assert!("random".parse::<TargetPolicy>().is_err());
    }
}
