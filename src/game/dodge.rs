//! Evasive response after being hit

use super::grid::OccupancyGrid;
use super::heading::turn_toward;
use super::state::{Action, Heading, PlayerState};

/// Heading taken against a horizontal threat when in the lower half of the
/// arena. The upper half turns South, so North would be the mirror image;
/// West is what the live bot has always done.
pub const HORIZONTAL_DODGE_LOWER_HALF: Heading = Heading::West;

/// Which way to run for each kind of threat, split by arena half
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DodgeTable {
    /// Vertical threat, self in the western half
    pub vertical_west_half: Heading,
    /// Vertical threat, self in the eastern half
    pub vertical_east_half: Heading,
    /// Horizontal threat, self in the northern half
    pub horizontal_upper_half: Heading,
    /// Horizontal threat, self in the southern half
    pub horizontal_lower_half: Heading,
}

impl Default for DodgeTable {
    fn default() -> Self {
        Self {
            vertical_west_half: Heading::East,
            vertical_east_half: Heading::West,
            horizontal_upper_half: Heading::South,
            horizontal_lower_half: HORIZONTAL_DODGE_LOWER_HALF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatKind {
    /// Shooter above or below, facing our row
    Vertical,
    /// Shooter in our row, facing us
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threat {
    pub kind: ThreatKind,
    pub from: String,
    pub escape: Heading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DodgeOutcome {
    pub action: Action,
    pub threat: Option<Threat>,
}

impl DodgeTable {
    /// Scan our row for a player lined up on us and turn away from it.
    ///
    /// The first threatening row-mate, west to east, decides the response.
    /// With nobody lined up the outcome is `Hold`.
    pub fn evaluate(&self, self_id: &str, me: &PlayerState, grid: &OccupancyGrid<'_>) -> DodgeOutcome {
        let pos = me.position;
        let half_width = grid.width() as i32 / 2;
        let half_height = grid.height() as i32 / 2;

        for other in grid.row(pos.y) {
            if other.id == self_id {
                continue;
            }
            let theirs = other.state.position;
            let facing = other.state.heading;

            let kind = if (theirs.y > pos.y && facing == Heading::North)
                || (theirs.y < pos.y && facing == Heading::South)
            {
                ThreatKind::Vertical
            } else if (theirs.x > pos.x && facing == Heading::West)
                || (theirs.x < pos.x && facing == Heading::East)
            {
                ThreatKind::Horizontal
            } else {
                continue;
            };

            let escape = match kind {
                ThreatKind::Vertical if pos.x < half_width => self.vertical_west_half,
                ThreatKind::Vertical => self.vertical_east_half,
                ThreatKind::Horizontal if pos.y < half_height => self.horizontal_upper_half,
                ThreatKind::Horizontal => self.horizontal_lower_half,
            };

            let action = turn_toward(me.heading, escape, grid.forward(pos, me.heading));
            return DodgeOutcome {
                action,
                threat: Some(Threat {
                    kind,
                    from: other.id.to_string(),
                    escape,
                }),
            };
        }

        DodgeOutcome {
            action: Action::Hold,
            threat: None,
        }
    }
}
