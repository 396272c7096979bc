//! Breadth-first path search toward an arena edge
//!
//! Stand-in for the engine's own routing, used by the in-memory oracle. All
//! steps cost the same, so plain BFS with a fixed neighbour order gives a
//! deterministic shortest route.

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::arena::{in_arena, ArenaEdge};
use crate::core::types::Coord;

/// How far along the diagonal toward `target` a cell is
fn progress(cell: Coord, target: ArenaEdge) -> i32 {
    target.row_step() * cell.y + target.column_step() * cell.x
}

/// Neighbour order: toward the target row, toward the target column,
/// away from it, then back
fn neighbors(cell: Coord, target: ArenaEdge) -> [Coord; 4] {
    let dy = target.row_step();
    let dx = target.column_step();
    [
        Coord::new(cell.x, cell.y + dy),
        Coord::new(cell.x + dx, cell.y),
        Coord::new(cell.x - dx, cell.y),
        Coord::new(cell.x, cell.y - dy),
    ]
}

/// Find the route a unit starting at `start` would take to `target`
///
/// The path includes `start`. When the edge cannot be reached the route ends
/// at the reachable cell closest to it. An invalid or occupied start cell
/// yields an empty path.
pub fn find_path_to_edge<F>(start: Coord, target: ArenaEdge, is_blocked: F) -> Vec<Coord>
where
    F: Fn(Coord) -> bool,
{
    if !in_arena(start) || is_blocked(start) {
        return Vec::new();
    }

    let mut came_from: AHashMap<Coord, Coord> = AHashMap::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);
    came_from.insert(start, start);

    let mut deepest = start;
    let mut goal = None;

    while let Some(current) = queue.pop_front() {
        if target.contains(current) {
            goal = Some(current);
            break;
        }
        if progress(current, target) > progress(deepest, target) {
            deepest = current;
        }

        for next in neighbors(current, target) {
            if !in_arena(next) || is_blocked(next) || came_from.contains_key(&next) {
                continue;
            }
            came_from.insert(next, current);
            queue.push_back(next);
        }
    }

    reconstruct_path(&came_from, start, goal.unwrap_or(deepest))
}

fn reconstruct_path(came_from: &AHashMap<Coord, Coord>, start: Coord, end: Coord) -> Vec<Coord> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
