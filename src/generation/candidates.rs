//! # Candidate Positions
//!
//! Cells the solver may try for an entity. Portals go into the wall ring, all
//! other entities onto interior floor.

use crate::{CellType, EntityId, Grid, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Wall-ring positions that can hold a portal, corners excluded.
///
/// Ordered top and bottom rows first, then left and right columns.
///
/// # Examples
///
/// ```
/// use dungeon_forge::portal_positions;
///
/// // 2 * (6 - 2) + 2 * (5 - 2)
/// assert_eq!(portal_positions(5, 6).len(), 14);
/// ```
pub fn portal_positions(rows: u32, cols: u32) -> Vec<Position> {
    let last_row = rows as i32 - 1;
    let last_col = cols as i32 - 1;
    let mut positions = Vec::new();

    for col in 1..last_col {
        positions.push(Position::new(0, col));
        positions.push(Position::new(last_row, col));
    }
    for row in 1..last_row {
        positions.push(Position::new(row, 0));
        positions.push(Position::new(row, last_col));
    }

    positions
}

/// Interior positions currently holding floor, in random order.
///
/// Placements consume floor cells, so the list must be rebuilt after every
/// placement rather than cached.
pub fn floor_positions(grid: &Grid, rng: &mut StdRng) -> Vec<Position> {
    let mut positions: Vec<Position> = grid
        .interior_positions()
        .filter(|pos| grid.get(*pos) == Some(CellType::Floor))
        .collect();
    positions.shuffle(rng);
    positions
}

/// Shuffled candidate positions for the given entity.
pub fn candidates_for(entity: EntityId, grid: &Grid, rng: &mut StdRng) -> Vec<Position> {
    if entity.is_portal() {
        let mut positions = portal_positions(grid.rows(), grid.cols());
        positions.shuffle(rng);
        positions
    } else {
        floor_positions(grid, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_base_grid;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_portal_positions_skip_corners() {
        let grid = build_base_grid(7, 9);
        let positions = portal_positions(7, 9);
        assert_eq!(positions.len(), 2 * 7 + 2 * 5);

        let unique: HashSet<_> = positions.iter().copied().collect();
        assert_eq!(unique.len(), positions.len());
        for pos in positions {
            assert!(grid.is_outer_ring(pos), "{pos} should be on the ring");
            assert!(!grid.is_corner(pos), "{pos} should not be a corner");
        }
    }

    #[test]
    fn test_floor_positions_track_grid_contents() {
        let mut grid = build_base_grid(6, 6);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(floor_positions(&grid, &mut rng).len(), 16);

        grid.set(Position::new(2, 2), CellType::Chest).unwrap();
        grid.set(Position::new(3, 4), CellType::Enemy).unwrap();
        let positions = floor_positions(&grid, &mut rng);
        assert_eq!(positions.len(), 14);
        assert!(!positions.contains(&Position::new(2, 2)));
        assert!(positions
            .iter()
            .all(|pos| grid.get(*pos) == Some(CellType::Floor)));
    }

    #[test]
    fn test_floor_positions_are_shuffled() {
        let grid = build_base_grid(12, 12);
        let mut rng = StdRng::seed_from_u64(11);
        let ordered: Vec<Position> = grid.interior_positions().collect();
        let shuffled = floor_positions(&grid, &mut rng);

        assert_ne!(shuffled, ordered);
        let mut sorted = shuffled.clone();
        sorted.sort();
        assert_eq!(sorted, ordered);
    }

    #[test]
    fn test_candidates_follow_entity_kind() {
        let grid = build_base_grid(8, 8);
        let mut rng = StdRng::seed_from_u64(1);

        let portal = candidates_for(EntityId::Exit, &grid, &mut rng);
        assert!(portal.iter().all(|pos| grid.is_outer_ring(*pos)));

        let items = candidates_for(EntityId::Trap(0), &grid, &mut rng);
        assert!(items.iter().all(|pos| !grid.is_outer_ring(*pos)));
        assert_eq!(items.len(), 36);
    }
}
