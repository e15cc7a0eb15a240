//! # Game Module
//!
//! Grid primitives shared by the generator and its consumers:
//! - Coordinates and the 4-neighbourhood
//! - Cell types and the rectangular grid
//! - The initial player record handed to the movement layer

pub mod grid;
pub mod player;

pub use grid::*;
pub use player::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a cell coordinate as `(row, col)`.
///
/// Rows grow downwards and columns grow to the right, matching the layout of
/// [`Grid`].
///
/// # Examples
///
/// ```
/// use dungeon_forge::Position;
///
/// let pos = Position::new(2, 5);
/// assert_eq!(pos.row, 2);
/// assert_eq!(pos.col, 5);
///
/// let neighbours = pos.cardinal_adjacent_positions();
/// assert_eq!(neighbours.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_forge::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Returns the 4 cardinal adjacent positions (no diagonals).
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        Direction::cardinal()
            .into_iter()
            .map(|direction| self + direction.to_delta())
            .collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.row + other.row, self.col + other.col)
    }
}

/// Cardinal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_forge::{Direction, Position};
    ///
    /// assert_eq!(Direction::North.to_delta(), Position::new(-1, 0));
    /// assert_eq!(Direction::East.to_delta(), Position::new(0, 1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(-1, 0),
            Direction::South => Position::new(1, 0),
            Direction::East => Position::new(0, 1),
            Direction::West => Position::new(0, -1),
        }
    }

    /// Returns the 4 cardinal directions in search order.
    pub fn cardinal() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::West,
            Direction::East,
        ]
    }
}
