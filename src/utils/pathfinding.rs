//! # Reachability
//!
//! Breadth-first connectivity checks over a generated grid. Every connectivity
//! guarantee the generator makes reduces to [`path_exists`].

use crate::{Grid, Position};
use ::pathfinding::prelude::bfs;

/// Checks whether `goal` can be reached from `start` by cardinal steps.
///
/// The search only enters passable cells (floor, chest, exit) or the goal cell
/// itself, so the start may sit on a non-passable cell such as the player's
/// entrance in the wall ring. Returns false if either endpoint is missing or lies
/// outside the grid.
///
/// # Examples
///
/// ```
/// use dungeon_forge::{build_base_grid, path_exists, CellType, Position};
///
/// let mut grid = build_base_grid(5, 5);
/// let start = Position::new(0, 2);
/// let goal = Position::new(3, 3);
/// grid.set(start, CellType::Player).unwrap();
/// assert!(path_exists(&grid, Some(start), Some(goal)));
/// assert!(!path_exists(&grid, Some(start), None));
/// ```
pub fn path_exists(grid: &Grid, start: Option<Position>, goal: Option<Position>) -> bool {
    let (Some(start), Some(goal)) = (start, goal) else {
        return false;
    };
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return false;
    }

    bfs(
        &start,
        |pos: &Position| passable_neighbours(grid, *pos, goal),
        |pos: &Position| *pos == goal,
    )
    .is_some()
}

fn passable_neighbours(grid: &Grid, pos: Position, goal: Position) -> Vec<Position> {
    pos.cardinal_adjacent_positions()
        .into_iter()
        .filter(|next| {
            *next == goal || grid.get(*next).is_some_and(|cell| cell.is_passable())
        })
        .collect()
}
