//! Arena data model shared by every stage of the decision pipeline

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Grid coordinate. `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance |dx| + |dy|
    pub fn manhattan(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The neighboring cell one step along `heading`
    pub fn step(&self, heading: Heading) -> Position {
        match heading {
            Heading::North => Position::new(self.x, self.y - 1),
            Heading::West => Position::new(self.x - 1, self.y),
            Heading::South => Position::new(self.x, self.y + 1),
            Heading::East => Position::new(self.x + 1, self.y),
        }
    }
}

/// Facing of a player on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
}

impl Heading {
    #[cfg(test)]
    pub const ALL: [Heading; 4] = [Heading::North, Heading::West, Heading::South, Heading::East];

    /// Position in the clockwise cycle N → E → S → W
    pub fn clockwise_index(self) -> u8 {
        match self {
            Heading::North => 0,
            Heading::East => 1,
            Heading::South => 2,
            Heading::West => 3,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Heading::North => "N",
            Heading::West => "W",
            Heading::South => "S",
            Heading::East => "E",
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown heading: {0}")]
pub struct ParseHeadingError(String);

impl FromStr for Heading {
    type Err = ParseHeadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Ok(Heading::North),
            "W" | "WEST" => Ok(Heading::West),
            "S" | "SOUTH" => Ok(Heading::South),
            "E" | "EAST" => Ok(Heading::East),
            _ => Err(ParseHeadingError(s.to_string())),
        }
    }
}

/// The single action emitted per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Advance one cell
    Forward,
    TurnLeft,
    TurnRight,
    /// Stay in place (the game's "throw" move)
    Hold,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Forward, Action::TurnRight, Action::TurnLeft, Action::Hold];

    /// Wire letter understood by the game server
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Forward => "F",
            Action::TurnLeft => "L",
            Action::TurnRight => "R",
            Action::Hold => "T",
        }
    }

    /// Uniform draw over all four actions
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Action {
        Action::ALL[rng.gen_range(0..Action::ALL.len())]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participant as seen in a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub position: Position,
    pub heading: Heading,
    pub score: i32,
    pub was_hit: bool,
}

impl PlayerState {
    pub fn new(x: i32, y: i32, heading: Heading, score: i32, was_hit: bool) -> Self {
        Self {
            position: Position::new(x, y),
            heading,
            score,
            was_hit,
        }
    }
}

/// Arena dimensions plus every player keyed by id.
///
/// Players iterate in the order the game server listed them; every
/// tie-break in the engine relies on that order.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    pub width: usize,
    pub height: usize,
    pub players: IndexMap<String, PlayerState>,
}

impl Arena {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            players: IndexMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with_player(mut self, id: impl Into<String>, player: PlayerState) -> Self {
        self.players.insert(id.into(), player);
        self
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }
}

/// Input to one decision
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub self_id: String,
    pub arena: Arena,
}

impl Snapshot {
    pub fn new(self_id: impl Into<String>, arena: Arena) -> Self {
        Self {
            self_id: self_id.into(),
            arena,
        }
    }

    /// Our own state, if the id keys into the player map
    pub fn me(&self) -> Option<&PlayerState> {
        self.arena.players.get(&self.self_id)
    }
}
