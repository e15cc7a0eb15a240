//! End-to-end generation scenarios.

use dungeon_forge::generation::utils::validate_layout;
use dungeon_forge::{
    path_exists, AttemptOutcome, CellType, DungeonLayout, EntityId, ForgeError, ForgeResult,
    GenerationConfig, LayoutGenerator,
};
use std::collections::HashSet;

fn assert_layout_invariants(layout: &DungeonLayout) {
    let grid = &layout.grid;

    let ring_openings: Vec<_> = grid
        .iter()
        .filter(|(pos, cell)| grid.is_outer_ring(*pos) && *cell != CellType::Wall)
        .map(|(pos, _)| pos)
        .collect();
    assert_eq!(ring_openings.len(), 2, "only the two portals open the ring");
    assert!(ring_openings.contains(&layout.player.position));
    assert!(ring_openings.contains(&layout.exit));

    let cells: HashSet<_> = layout.placements.iter().map(|(_, pos)| pos).collect();
    assert_eq!(cells.len(), layout.placements.len(), "entities share a cell");

    assert!(path_exists(
        grid,
        Some(layout.player.position),
        Some(layout.key_chest)
    ));
    assert!(path_exists(grid, Some(layout.key_chest), Some(layout.exit)));

    validate_layout(layout).expect("layout should pass validation");
}

#[test]
fn test_small_grid_scenario() -> ForgeResult<()> {
    let config = GenerationConfig::new(2024)
        .with_dimensions(7, 7)
        .with_counts(0, 1)
        .with_step_limit(500)
        .with_max_attempts(20);

    let layout = LayoutGenerator::new().generate_layout(&config)?;

    assert_layout_invariants(&layout);
    assert_eq!(layout.placements.len(), 7);
    assert_eq!(layout.grid.count(CellType::Chest), 2);
    assert_eq!(layout.grid.count(CellType::Enemy), 1);
    assert_eq!(layout.grid.count(CellType::Trap), 2);
    assert_eq!(layout.grid.count(CellType::Player), 1);
    assert_eq!(layout.grid.count(CellType::Exit), 1);
    assert!(layout.key_chest.manhattan_distance(layout.weapon_chest) >= 5);
    Ok(())
}

#[test]
fn test_small_grid_scenario_across_seeds() {
    let generator = LayoutGenerator::new();
    for seed in 0..10 {
        let config = GenerationConfig::new(seed)
            .with_dimensions(7, 7)
            .with_counts(0, 1)
            .with_max_attempts(20);
        let layout = generator
            .generate_layout(&config)
            .unwrap_or_else(|e| panic!("seed {seed} failed: {e}"));
        assert_layout_invariants(&layout);
    }
}

#[test]
fn test_overfull_grid_fails_terminally() {
    // 5x5 leaves nine interior cells for four chests and twenty enemies.
    let config = GenerationConfig::new(5)
        .with_dimensions(5, 5)
        .with_counts(2, 20)
        .with_max_attempts(4);

    match LayoutGenerator::new().generate_layout(&config) {
        Err(ForgeError::GenerationFailed {
            attempts,
            last_outcome,
        }) => {
            assert_eq!(attempts, 4);
            assert!(matches!(
                last_outcome,
                AttemptOutcome::FuseAbort { .. } | AttemptOutcome::PlacementExhausted { .. }
            ));
        }
        Ok(layout) => panic!("overfull grid produced a layout:\n{}", layout.grid),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_huge_chest_count_fails_terminally() {
    let config = GenerationConfig::new(1)
        .with_dimensions(12, 12)
        .with_counts(u32::MAX, 1);

    match LayoutGenerator::new().generate_layout(&config) {
        Err(ForgeError::GenerationFailed {
            attempts,
            last_outcome,
        }) => {
            assert_eq!(attempts, config.max_attempts);
            assert!(matches!(
                last_outcome,
                AttemptOutcome::PlacementExhausted { .. }
            ));
        }
        Ok(_) => panic!("huge chest count produced a layout"),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_player_record_starts_fresh() -> ForgeResult<()> {
    let layout = LayoutGenerator::new().generate_layout(&GenerationConfig::for_testing(31))?;

    assert_eq!(
        layout.placements.get(EntityId::PlayerStart),
        Some(layout.player.position)
    );
    assert!(!layout.player.has_key);
    assert!(!layout.player.has_weapon);
    assert_eq!(layout.player.health, 3);
    assert_eq!(layout.player.weapon_durability, 3);
    Ok(())
}

#[test]
fn test_density_driven_default_grid() -> ForgeResult<()> {
    let config = GenerationConfig::new(8)
        .with_dimensions(15, 15)
        .with_max_attempts(20);
    let layout = LayoutGenerator::new().generate_layout(&config)?;

    let counts = config.entity_counts();
    assert_eq!(
        layout.grid.count(CellType::Enemy),
        counts.enemies as usize
    );
    assert_eq!(
        layout.grid.count(CellType::Chest),
        counts.extra_chests as usize + 2
    );
    assert_layout_invariants(&layout);
    Ok(())
}

#[test]
fn test_default_density_fits_every_random_size() {
    let generator = LayoutGenerator::new();
    for size in 12..=18 {
        for seed in 0..3 {
            let config = GenerationConfig::new(seed)
                .with_dimensions(size, size)
                .with_max_attempts(20);
            let layout = generator
                .generate_layout(&config)
                .unwrap_or_else(|e| panic!("{size}x{size} seed {seed} failed: {e}"));

            let counts = config.entity_counts();
            assert_eq!(layout.grid.count(CellType::Enemy), counts.enemies as usize);
            assert_layout_invariants(&layout);
        }
    }
}

#[test]
fn test_config_file_round_trip() -> ForgeResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("forge.json");

    let config = GenerationConfig::for_testing(404).with_dimensions(10, 12);
    config.to_json_file(&path)?;
    let loaded = GenerationConfig::from_json_file(&path)?;
    assert_eq!(loaded, config);

    let layout = LayoutGenerator::new().generate_layout(&loaded)?;
    assert_eq!(layout.grid.rows(), 10);
    assert_eq!(layout.grid.cols(), 12);
    Ok(())
}

#[test]
fn test_missing_config_file_is_io_error() {
    let result = GenerationConfig::from_json_file("/nonexistent/forge.json");
    assert!(matches!(result, Err(ForgeError::Io(_))));
}

#[test]
fn test_malformed_config_file_is_serde_error() -> ForgeResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ rows: twelve }")?;

    let result = GenerationConfig::from_json_file(&path);
    assert!(matches!(result, Err(ForgeError::Serde(_))));
    Ok(())
}

#[test]
fn test_layout_json_round_trip() -> ForgeResult<()> {
    let layout = LayoutGenerator::new().generate_layout(&GenerationConfig::for_testing(55))?;

    let json = serde_json::to_string(&layout)?;
    let parsed: DungeonLayout = serde_json::from_str(&json)?;
    assert_eq!(parsed, layout);
    Ok(())
}
