//! # Generation Module
//!
//! Constraint-driven layout generation.
//!
//! A layout is produced by repeated attempts. Each attempt builds a fresh walled
//! grid, assembles the list of entities to place, and hands both to a backtracking
//! solver that assigns every entity a cell while honouring the spacing rules. A
//! complete placement is then checked for the critical path (start to key, key to
//! exit) before it is accepted.

pub mod candidates;
pub mod constraints;
pub mod dungeon;
pub mod entities;
pub mod solver;

pub use candidates::*;
pub use constraints::*;
pub use dungeon::*;
pub use entities::*;
pub use solver::*;

use crate::{config, ForgeError, ForgeResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for layout generation.
///
/// Controls the grid size, how many entities are placed, how far apart they must
/// be, and how much search effort a single request may spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Number of grid rows, including the wall ring
    pub rows: u32,
    /// Number of grid columns, including the wall ring
    pub cols: u32,
    /// Smallest accepted value for `rows` and `cols`
    pub min_dimension: u32,
    /// Largest accepted value for `rows` and `cols`
    pub max_dimension: u32,
    /// Extra chests besides the key and weapon chests; derived from density when unset
    pub chest_count: Option<u32>,
    /// Enemies to place; derived from density when unset
    pub enemy_count: Option<u32>,
    /// Traps to place
    pub trap_count: u32,
    /// Density used for unset entity counts
    pub density: DensityConfig,
    /// Minimum distances between placed entities
    pub spacing: SpacingRules,
    /// Search steps allowed per attempt before the attempt is aborted
    pub step_limit: u32,
    /// Attempts made before generation fails
    pub max_attempts: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_forge::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rows: 15,
            cols: 15,
            min_dimension: config::DEFAULT_MIN_DIMENSION,
            max_dimension: config::DEFAULT_MAX_DIMENSION,
            chest_count: None,
            enemy_count: None,
            trap_count: config::DEFAULT_TRAP_COUNT,
            density: DensityConfig::default(),
            spacing: SpacingRules::default(),
            step_limit: config::DEFAULT_STEP_LIMIT,
            max_attempts: config::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Creates a configuration for testing with a small, sparse grid.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            rows: 9,
            cols: 9,
            chest_count: Some(1),
            enemy_count: Some(2),
            max_attempts: 20,
            ..Self::new(seed)
        }
    }

    /// Sets the grid dimensions.
    pub fn with_dimensions(mut self, rows: u32, cols: u32) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Sets explicit extra-chest and enemy counts.
    pub fn with_counts(mut self, chest_count: u32, enemy_count: u32) -> Self {
        self.chest_count = Some(chest_count);
        self.enemy_count = Some(enemy_count);
        self
    }

    /// Sets the per-attempt search step ceiling.
    pub fn with_step_limit(mut self, step_limit: u32) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Sets the number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Total number of grid cells.
    pub fn area(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }

    /// Number of cells inside the wall ring.
    pub fn interior_area(&self) -> usize {
        self.rows.saturating_sub(2) as usize * self.cols.saturating_sub(2) as usize
    }

    /// Resolves how many of each entity kind an attempt places.
    ///
    /// Explicit counts win; unset counts come from the density function.
    pub fn entity_counts(&self) -> EntityCounts {
        let area = self.area();
        EntityCounts {
            extra_chests: self
                .chest_count
                .unwrap_or_else(|| self.density.chests_for_area(area)),
            enemies: self
                .enemy_count
                .unwrap_or_else(|| self.density.enemies_for_area(area)),
            traps: self.trap_count,
        }
    }

    /// Rejects configurations the engine cannot run.
    pub fn validate(&self) -> ForgeResult<()> {
        if self.min_dimension < 3 {
            return Err(ForgeError::InvalidConfig(format!(
                "min_dimension must be at least 3, got {}",
                self.min_dimension
            )));
        }
        if self.min_dimension > self.max_dimension {
            return Err(ForgeError::InvalidConfig(format!(
                "min_dimension {} exceeds max_dimension {}",
                self.min_dimension, self.max_dimension
            )));
        }

        let bounds = self.min_dimension..=self.max_dimension;
        for (name, value) in [("rows", self.rows), ("cols", self.cols)] {
            if !bounds.contains(&value) {
                return Err(ForgeError::InvalidConfig(format!(
                    "{name} must be within {}..={}, got {value}",
                    self.min_dimension, self.max_dimension
                )));
            }
        }

        if self.step_limit == 0 {
            return Err(ForgeError::InvalidConfig(
                "step_limit must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ForgeError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        self.density.validate()
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to [`GenerationConfig::default`].
    pub fn from_json_file(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the configuration to a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> ForgeResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Entity density used when counts are not given explicitly.
///
/// Counts are proportional to the full grid area, wall ring included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    /// Enemies per grid cell
    pub enemies_per_cell: f64,
    /// Extra chests per grid cell
    pub chests_per_cell: f64,
}

impl DensityConfig {
    /// Number of enemies for a grid of the given area.
    pub fn enemies_for_area(&self, area: u32) -> u32 {
        (f64::from(area) * self.enemies_per_cell).round() as u32
    }

    /// Number of extra chests for a grid of the given area.
    pub fn chests_for_area(&self, area: u32) -> u32 {
        (f64::from(area) * self.chests_per_cell).round() as u32
    }

    fn validate(&self) -> ForgeResult<()> {
        for (name, value) in [
            ("enemies_per_cell", self.enemies_per_cell),
            ("chests_per_cell", self.chests_per_cell),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ForgeError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for DensityConfig {
    /// One extra chest per ten cells and ten percent more enemies than chests.
    fn default() -> Self {
        Self {
            enemies_per_cell: 0.11,
            chests_per_cell: 0.10,
        }
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> ForgeResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> ForgeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use crate::{path_exists, CellType, DungeonLayout};
    use rand::SeedableRng;
    use std::collections::HashSet;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates that a finished layout keeps every generation invariant.
    ///
    /// Checks the wall ring, that every placed entity sits on its own cell with the
    /// matching cell type, and that the critical path is walkable.
    pub fn validate_layout(layout: &DungeonLayout) -> ForgeResult<()> {
        let grid = &layout.grid;
        let portals = [layout.player.position, layout.exit];

        for (pos, cell) in grid.iter() {
            if grid.is_outer_ring(pos) && cell != CellType::Wall && !portals.contains(&pos) {
                return Err(ForgeError::InvalidLayout(format!(
                    "wall ring cell {pos} holds {cell:?}"
                )));
            }
        }
        for portal in portals {
            if !grid.is_outer_ring(portal) || grid.is_corner(portal) {
                return Err(ForgeError::InvalidLayout(format!(
                    "portal {portal} is not on a wall ring edge"
                )));
            }
        }

        let mut seen = HashSet::new();
        for (entity, pos) in layout.placements.iter() {
            if !seen.insert(pos) {
                return Err(ForgeError::InvalidLayout(format!(
                    "{entity} shares cell {pos} with another entity"
                )));
            }
            if grid.get(pos) != Some(entity.cell_type()) {
                return Err(ForgeError::InvalidLayout(format!(
                    "{entity} at {pos} is not drawn on the grid"
                )));
            }
        }

        let start = Some(layout.player.position);
        let key = Some(layout.key_chest);
        if !path_exists(grid, start, key) {
            return Err(ForgeError::InvalidLayout(
                "key chest is unreachable from the player start".to_string(),
            ));
        }
        if !path_exists(grid, key, Some(layout.exit)) {
            return Err(ForgeError::InvalidLayout(
                "exit is unreachable from the key chest".to_string(),
            ));
        }

        Ok(())
    }
}
