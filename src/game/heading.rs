//! Quarter-turn resolution from current facing to desired facing

use super::state::{Action, Heading};

/// Resolve the action that brings `current` toward `desired`.
///
/// One clockwise quarter turn is `TurnRight`, one counter-clockwise quarter
/// turn is `TurnLeft`. An about-face starts with `TurnRight`. When already
/// facing `desired`, `fallback` is returned unchanged.
pub fn turn_toward(current: Heading, desired: Heading, fallback: Action) -> Action {
    let steps = (desired.clockwise_index() + 4 - current.clockwise_index()) % 4;
    match steps {
        0 => fallback,
        3 => Action::TurnLeft,
        _ => Action::TurnRight,
    }
}

/// Heading along an offset `(dx, dy)`. Any horizontal offset wins over a
/// vertical one.
pub fn heading_toward(dx: i32, dy: i32) -> Heading {
    if dx > 0 {
        Heading::East
    } else if dx < 0 {
        Heading::West
    } else if dy > 0 {
        Heading::South
    } else if dy < 0 {
        Heading::North
    } else {
        // Only reachable when two players share a cell
        Heading::East
    }
}
