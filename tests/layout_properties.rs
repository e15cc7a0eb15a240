//! Property tests for the generation engine.

use dungeon_forge::{
    build_base_grid, build_request_list, check_distribution, manhattan, path_exists,
    CellType, EntityCounts, EntityId, EntityRequest, ForgeError, GenerationConfig,
    LayoutGenerator, PlacementRecord, PlacementSolver, Position, SearchOutcome, SpacingRules,
    Trial,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn position() -> impl Strategy<Value = Position> {
    (-50i32..50, -50i32..50).prop_map(|(row, col)| Position::new(row, col))
}

fn item_entity() -> impl Strategy<Value = EntityId> {
    prop_oneof![
        (0u32..4).prop_map(EntityId::Chest),
        (0u32..4).prop_map(EntityId::Enemy),
        (0u32..2).prop_map(EntityId::Trap),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn manhattan_is_symmetric(a in position(), b in position()) {
        prop_assert_eq!(manhattan(Some(a), Some(b)), manhattan(Some(b), Some(a)));
        prop_assert_eq!(manhattan(Some(a), Some(a)), 0);
        prop_assert_eq!(a.manhattan_distance(b), b.manhattan_distance(a));
    }

    #[test]
    fn rejected_trials_restore_grid_and_record(
        seed in any::<u64>(),
        entity in item_entity(),
        row in 1i32..9,
        col in 1i32..9,
    ) {
        let rules = SpacingRules::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = build_base_grid(10, 10);
        let mut placements = PlacementRecord::new();

        // Place the essentials plus one extra item so the spacing rules have
        // something to compare against.
        let counts = EntityCounts { extra_chests: 2, enemies: 2, traps: 0 };
        let pending = build_request_list(&counts, &mut rng);
        let mut solver = PlacementSolver::new(&rules, &mut rng, 500);
        let outcome = solver.solve(&mut grid, &mut placements, &pending[..5]).unwrap();
        prop_assume!(outcome == SearchOutcome::Solved);
        prop_assume!(placements.get(entity).is_none());

        let target = Position::new(row, col);
        let request = EntityRequest::new(entity);
        prop_assume!(request.accepts(grid.get(target)));

        let grid_before = grid.clone();
        let placements_before = placements.clone();

        let trial = Trial::commit(&mut grid, &mut placements, &request, target).unwrap();
        let verdict = check_distribution(&placements, entity, target, &rules);
        trial.rollback(&mut grid, &mut placements).unwrap();

        prop_assert_eq!(&grid, &grid_before, "verdict {:?}", verdict);
        prop_assert_eq!(&placements, &placements_before);
    }

    #[test]
    fn solver_rejections_restore_grid_and_record(seed in any::<u64>()) {
        let rules = SpacingRules::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = build_base_grid(10, 10);
        let mut placements = PlacementRecord::new();

        let no_extras = EntityCounts { extra_chests: 0, enemies: 0, traps: 0 };
        let essentials = build_request_list(&no_extras, &mut rng);
        let outcome = PlacementSolver::new(&rules, &mut rng, 500)
            .solve(&mut grid, &mut placements, &essentials)
            .unwrap();
        prop_assume!(outcome == SearchOutcome::Solved);

        let grid_before = grid.clone();
        let placements_before = placements.clone();

        // The key chest is already placed, so no chest can keep this distance.
        // Every enemy cell is committed, then undone once the chest frame runs dry.
        let strict = SpacingRules { min_chest_spacing: 100, ..SpacingRules::default() };
        let pending = [
            EntityRequest::new(EntityId::Enemy(0)),
            EntityRequest::new(EntityId::Chest(0)),
        ];
        let mut solver = PlacementSolver::new(&strict, &mut rng, 500);
        let outcome = solver.solve(&mut grid, &mut placements, &pending).unwrap();

        prop_assert_eq!(outcome, SearchOutcome::Exhausted);
        prop_assert!(solver.governor().steps() > 1);
        prop_assert_eq!(&grid, &grid_before);
        prop_assert_eq!(&placements, &placements_before);
    }

    #[test]
    fn fuse_bounds_search_steps(
        seed in any::<u64>(),
        step_limit in 0u32..300,
        enemies in 0u32..30,
    ) {
        let rules = SpacingRules::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let counts = EntityCounts { extra_chests: 3, enemies, traps: 2 };
        let pending = build_request_list(&counts, &mut rng);
        let mut grid = build_base_grid(6, 6);
        let mut placements = PlacementRecord::new();
        let mut solver = PlacementSolver::new(&rules, &mut rng, step_limit);

        let outcome = solver.solve(&mut grid, &mut placements, &pending).unwrap();

        prop_assert!(solver.governor().steps() <= step_limit + 1);
        if outcome == SearchOutcome::Aborted {
            prop_assert_eq!(solver.governor().steps(), step_limit + 1);
        }
        if outcome != SearchOutcome::Solved {
            prop_assert_eq!(&grid, &build_base_grid(6, 6));
            prop_assert!(placements.is_empty());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn generated_layouts_keep_invariants(
        seed in any::<u64>(),
        rows in 8u32..=14,
        cols in 8u32..=14,
        chests in 0u32..=2,
        enemies in 0u32..=4,
    ) {
        let config = GenerationConfig::new(seed)
            .with_dimensions(rows, cols)
            .with_counts(chests, enemies)
            .with_max_attempts(30);

        let layout = match LayoutGenerator::new().generate_layout(&config) {
            Ok(layout) => layout,
            Err(ForgeError::GenerationFailed { .. }) => return Ok(()),
            Err(other) => return Err(TestCaseError::fail(other.to_string())),
        };
        let grid = &layout.grid;

        let portals = [layout.player.position, layout.exit];
        for (pos, cell) in grid.iter() {
            if grid.is_outer_ring(pos) && !portals.contains(&pos) {
                prop_assert_eq!(cell, CellType::Wall, "ring cell {} opened", pos);
            }
        }
        prop_assert_eq!(grid.get(layout.player.position), Some(CellType::Player));
        prop_assert_eq!(grid.get(layout.exit), Some(CellType::Exit));

        let cells: HashSet<_> = layout.placements.iter().map(|(_, pos)| pos).collect();
        prop_assert_eq!(cells.len(), layout.placements.len());
        prop_assert_eq!(
            layout.placements.len(),
            config.entity_counts().total_requests()
        );

        prop_assert!(path_exists(grid, Some(layout.player.position), Some(layout.key_chest)));
        prop_assert!(path_exists(grid, Some(layout.key_chest), Some(layout.exit)));
    }
}
