//! Diamond arena geometry
//!
//! The playable area is a diamond inscribed in a 28x28 box. Rows below
//! `HALF_ARENA` belong to us, rows at or above it to the opponent; the two
//! halves mirror each other.

pub mod constants;
pub mod pathfinding;

pub use constants::{ARENA_SIZE, HALF_ARENA, MAX_INDEX};
pub use pathfinding::find_path_to_edge;

use serde::{Deserialize, Serialize};

use crate::core::types::Coord;

/// The four diagonal borders of the diamond
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArenaEdge {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ArenaEdge {
    /// Whether `cell` lies on this edge
    pub fn contains(self, cell: Coord) -> bool {
        if !in_arena(cell) {
            return false;
        }
        match self {
            ArenaEdge::TopLeft => cell.x < HALF_ARENA && cell.y == HALF_ARENA + cell.x,
            ArenaEdge::TopRight => {
                cell.x >= HALF_ARENA && cell.y == MAX_INDEX - (cell.x - HALF_ARENA)
            }
            ArenaEdge::BottomLeft => cell.x < HALF_ARENA && cell.y == HALF_ARENA - 1 - cell.x,
            ArenaEdge::BottomRight => cell.x >= HALF_ARENA && cell.y == cell.x - HALF_ARENA,
        }
    }

    /// Row direction a unit heading for this edge moves in (+1 up, -1 down)
    pub fn row_step(self) -> i32 {
        match self {
            ArenaEdge::TopLeft | ArenaEdge::TopRight => 1,
            ArenaEdge::BottomLeft | ArenaEdge::BottomRight => -1,
        }
    }

    /// Column direction a unit heading for this edge moves in
    pub fn column_step(self) -> i32 {
        match self {
            ArenaEdge::TopRight | ArenaEdge::BottomRight => 1,
            ArenaEdge::TopLeft | ArenaEdge::BottomLeft => -1,
        }
    }
}

/// Check whether a cell lies inside the diamond
pub fn in_arena(cell: Coord) -> bool {
    if cell.y < 0 || cell.y > MAX_INDEX {
        return false;
    }
    let (low, high) = if cell.y < HALF_ARENA {
        (HALF_ARENA - 1 - cell.y, HALF_ARENA + cell.y)
    } else {
        (cell.y - HALF_ARENA, MAX_INDEX - (cell.y - HALF_ARENA))
    };
    cell.x >= low && cell.x <= high
}

/// Check whether a cell is inside the diamond and on our half
pub fn is_own_half(cell: Coord) -> bool {
    cell.y < HALF_ARENA && in_arena(cell)
}

/// Cells we may build on, column by column
///
/// Columns left of centre own rows `[HALF_ARENA - x - 1, HALF_ARENA)`,
/// the rest own rows `[x - HALF_ARENA, HALF_ARENA)`.
pub fn friendly_side_locations() -> Vec<Coord> {
    let mut locations = Vec::new();
    for x in 0..ARENA_SIZE {
        let first_row = if x < HALF_ARENA {
            HALF_ARENA - x - 1
        } else {
            x - HALF_ARENA
        };
        for y in first_row..HALF_ARENA {
            locations.push(Coord::new(x, y));
        }
    }
    locations
}

/// Horizontal reflection `x' = ARENA_SIZE - 1 - x`
pub fn mirror(cell: Coord) -> Coord {
    Coord::new(MAX_INDEX - cell.x, cell.y)
}

/// Horizontal reflection of a continuous point
pub fn mirror_point(point: [f64; 2]) -> [f64; 2] {
    [f64::from(MAX_INDEX) - point[0], point[1]]
}
