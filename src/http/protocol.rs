//! Wire types for the arena update posted by the game server

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::game::{Arena, Heading, PlayerState, Snapshot};

/// Largest grid the engine will allocate for a single decision
pub const MAX_ARENA_CELLS: usize = 1 << 20;

/// Body of every decision request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaUpdate {
    #[serde(rename = "_links")]
    pub links: Links,
    pub arena: ArenaState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: SelfLink,
}

/// Our own player id lives in the link's href
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfLink {
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaState {
    /// `[width, height]`
    pub dims: [i64; 2],
    /// Keeps the order players appear in the document
    pub state: IndexMap<String, PlayerSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub x: i32,
    pub y: i32,
    pub direction: Heading,
    pub score: i32,
    pub was_hit: bool,
}

impl From<PlayerSnapshot> for PlayerState {
    fn from(p: PlayerSnapshot) -> Self {
        PlayerState::new(p.x, p.y, p.direction, p.score, p.was_hit)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Arena dims must be positive, got {0:?}")]
    InvalidDims([i64; 2]),

    #[error("Arena of {width}x{height} exceeds {max} cells", max = MAX_ARENA_CELLS)]
    TooLarge { width: usize, height: usize },

    #[error("Player {id} at ({x}, {y}) is outside the {width}x{height} arena")]
    OutOfBounds {
        id: String,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

impl TryFrom<ArenaUpdate> for Snapshot {
    type Error = ProtocolError;

    fn try_from(update: ArenaUpdate) -> Result<Self, Self::Error> {
        let (width, height) = match update.arena.dims {
            [w, h] if w > 0 && h > 0 && w <= i32::MAX as i64 && h <= i32::MAX as i64 => {
                (w as usize, h as usize)
            }
            dims => return Err(ProtocolError::InvalidDims(dims)),
        };

        if width.saturating_mul(height) > MAX_ARENA_CELLS {
            return Err(ProtocolError::TooLarge { width, height });
        }

        let mut arena = Arena::new(width, height);
        for (id, player) in update.arena.state {
            let state = PlayerState::from(player);
            if !arena.contains(state.position) {
                return Err(ProtocolError::OutOfBounds {
                    id,
                    x: state.position.x,
                    y: state.position.y,
                    width,
                    height,
                });
            }
            arena.players.insert(id, state);
        }

        Ok(Snapshot::new(update.links.self_link.href, arena))
    }
}
