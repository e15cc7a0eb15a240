//! # Grid Mathematics
//!
//! Distance helpers that tolerate entities which have not been placed yet.

use crate::Position;

/// Manhattan distance between two optional positions.
///
/// Returns 0 when either position is absent. A 0 from this function therefore
/// means "nothing to compare against", not "same cell"; rule checks must test for
/// presence before comparing distances.
///
/// # Examples
///
/// ```
/// use dungeon_forge::{manhattan, Position};
///
/// let a = Position::new(1, 1);
/// let b = Position::new(4, 3);
/// assert_eq!(manhattan(Some(a), Some(b)), 5);
/// assert_eq!(manhattan(Some(a), None), 0);
/// ```
pub fn manhattan(p1: Option<Position>, p2: Option<Position>) -> u32 {
    match (p1, p2) {
        (Some(a), Some(b)) => a.manhattan_distance(b),
        _ => 0,
    }
}
