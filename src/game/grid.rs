//! Dense occupancy grid built fresh for every decision

use super::state::{Action, Arena, Heading, PlayerState, Position};

/// A player standing in a cell, borrowed from the arena
#[derive(Debug, Clone, Copy)]
pub struct Occupant<'a> {
    pub id: &'a str,
    pub state: &'a PlayerState,
}

/// Row-major `height × width` table of optional occupants
#[derive(Debug)]
pub struct OccupancyGrid<'a> {
    width: usize,
    height: usize,
    cells: Vec<Option<Occupant<'a>>>,
}

impl<'a> OccupancyGrid<'a> {
    /// Place every player at its cell. When two players share a cell the
    /// later one in iteration order wins.
    pub fn build(arena: &'a Arena) -> Self {
        let mut grid = Self {
            width: arena.width,
            height: arena.height,
            cells: vec![None; arena.width * arena.height],
        };

        for (id, state) in &arena.players {
            if let Some(idx) = grid.index(state.position) {
                grid.cells[idx] = Some(Occupant { id, state });
            }
        }

        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Occupant of `pos`; `None` for empty or out-of-bounds cells
    #[cfg(test)]
    pub fn get(&self, pos: Position) -> Option<Occupant<'a>> {
        self.index(pos).and_then(|idx| self.cells[idx])
    }

    /// Occupants of row `y`, west to east
    pub fn row(&self, y: i32) -> impl Iterator<Item = Occupant<'a>> + '_ {
        let row = usize::try_from(y)
            .ok()
            .filter(|y| *y < self.height)
            .map(|y| &self.cells[y * self.width..(y + 1) * self.width])
            .unwrap_or(&[]);
        row.iter().flatten().copied()
    }

    /// Forward if the cell ahead is inside the grid and empty, otherwise Hold
    pub fn forward(&self, pos: Position, heading: Heading) -> Action {
        let ahead = pos.step(heading);
        match self.index(ahead) {
            Some(idx) if self.cells[idx].is_none() => Action::Forward,
            _ => Action::Hold,
        }
    }
}
