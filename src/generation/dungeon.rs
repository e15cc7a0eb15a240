//! # Dungeon Generation
//!
//! Attempt-bounded orchestration of the placement solver.
//!
//! Each attempt:
//! 1. Builds a fresh walled grid
//! 2. Assembles the request list with a reshuffled tail
//! 3. Runs the backtracking solver under a fresh step budget
//! 4. Checks the critical path (start to key, key to exit) on the result
//!
//! Aborted, exhausted and unwalkable attempts are all retried. Running out of
//! attempts is the only fatal outcome.

use super::utils;
use crate::{
    build_base_grid, build_request_list, manhattan, path_exists, EntityId, ForgeError,
    ForgeResult, GenerationConfig, Generator, Grid, PlacementRecord, PlacementSolver,
    PlayerRecord, Position, SearchOutcome,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A finished, validated layout ready for rendering and play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonLayout {
    /// The final grid
    pub grid: Grid,
    /// Starting player state
    pub player: PlayerRecord,
    /// Chest holding the exit key
    pub key_chest: Position,
    /// Chest holding the weapon
    pub weapon_chest: Position,
    /// The exit cut into the wall ring
    pub exit: Position,
    /// Every placed entity
    pub placements: PlacementRecord,
    /// Attempts used, including the successful one
    pub attempts: u32,
}

/// One of the two reachability relations a playable layout needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalPath {
    StartToKey,
    KeyToExit,
}

impl fmt::Display for CriticalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriticalPath::StartToKey => f.write_str("player start to key chest"),
            CriticalPath::KeyToExit => f.write_str("key chest to exit"),
        }
    }
}

/// Why an attempt did not produce a layout.
///
/// All three are retried the same way; they differ only in what gets logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The step ceiling was exceeded
    FuseAbort { steps: u32 },
    /// No consistent placement exists within the step budget
    PlacementExhausted { steps: u32 },
    /// A full placement was found but the critical path is blocked
    ValidationFailed { missing: CriticalPath },
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::FuseAbort { steps } => {
                write!(f, "search aborted after {steps} steps")
            }
            AttemptOutcome::PlacementExhausted { steps } => {
                write!(f, "no placement found in {steps} steps")
            }
            AttemptOutcome::ValidationFailed { missing } => {
                write!(f, "no path from {missing}")
            }
        }
    }
}

/// Layout generator driving the backtracking solver.
#[derive(Debug, Clone, Default)]
pub struct LayoutGenerator;

impl LayoutGenerator {
    /// Creates a new layout generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_forge::{GenerationConfig, LayoutGenerator};
    ///
    /// let config = GenerationConfig::for_testing(7);
    /// let layout = LayoutGenerator::new().generate_layout(&config).unwrap();
    /// assert_eq!(layout.grid.rows(), config.rows);
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Generates a layout with an RNG seeded from the config.
    pub fn generate_layout(&self, config: &GenerationConfig) -> ForgeResult<DungeonLayout> {
        let mut rng = utils::create_rng(config);
        self.generate(config, &mut rng)
    }

    /// Runs a single attempt.
    ///
    /// The outer `Result` carries engine errors; the inner one tells a layout
    /// apart from a retryable failure.
    fn run_attempt(
        &self,
        attempt: u32,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> ForgeResult<Result<DungeonLayout, AttemptOutcome>> {
        let counts = config.entity_counts();
        let interior = config.interior_area();
        if counts.floor_requests() > interior {
            debug!(
                "Attempt {}: {} floor entities cannot fit in {} interior cells",
                attempt,
                counts.floor_requests(),
                interior
            );
            return Ok(Err(AttemptOutcome::PlacementExhausted { steps: 0 }));
        }

        let mut grid = build_base_grid(config.rows, config.cols);
        let requests = build_request_list(&counts, rng);
        let mut placements = PlacementRecord::new();

        let mut solver = PlacementSolver::new(&config.spacing, rng, config.step_limit);
        let outcome = solver.solve(&mut grid, &mut placements, &requests)?;
        let steps = solver.governor().steps();

        if solver.governor().is_tripped() {
            return Ok(Err(AttemptOutcome::FuseAbort { steps }));
        }
        if outcome != SearchOutcome::Solved {
            return Ok(Err(AttemptOutcome::PlacementExhausted { steps }));
        }
        if let Err(missing) = check_critical_paths(&grid, &placements) {
            return Ok(Err(AttemptOutcome::ValidationFailed { missing }));
        }

        let (Some(start), Some(exit), Some(key_chest), Some(weapon_chest)) = (
            placements.get(EntityId::PlayerStart),
            placements.get(EntityId::Exit),
            placements.get(EntityId::KeyChest),
            placements.get(EntityId::WeaponChest),
        ) else {
            return Err(ForgeError::InvalidLayout(
                "solver finished without placing every essential entity".to_string(),
            ));
        };

        debug!(
            "Attempt {} placed {} entities in {} steps",
            attempt,
            placements.len(),
            steps
        );

        Ok(Ok(DungeonLayout {
            grid,
            player: PlayerRecord::new(start),
            key_chest,
            weapon_chest,
            exit,
            placements,
            attempts: attempt,
        }))
    }
}

/// Checks that the key is reachable from the start and the exit from the key.
pub fn check_critical_paths(grid: &Grid, placements: &PlacementRecord) -> Result<(), CriticalPath> {
    let start = placements.get(EntityId::PlayerStart);
    let key = placements.get(EntityId::KeyChest);
    let exit = placements.get(EntityId::Exit);

    if !path_exists(grid, start, key) {
        return Err(CriticalPath::StartToKey);
    }
    if !path_exists(grid, key, exit) {
        return Err(CriticalPath::KeyToExit);
    }
    Ok(())
}

impl Generator<DungeonLayout> for LayoutGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> ForgeResult<DungeonLayout> {
        config.validate()?;

        let counts = config.entity_counts();
        info!(
            "{}: generating {}x{} layout with {} extra chests, {} enemies, {} traps",
            self.generator_type(),
            config.rows,
            config.cols,
            counts.extra_chests,
            counts.enemies,
            counts.traps
        );

        let mut last_outcome = None;
        for attempt in 1..=config.max_attempts {
            debug!(
                "Attempt {}/{} (step limit {})",
                attempt, config.max_attempts, config.step_limit
            );

            match self.run_attempt(attempt, config, rng)? {
                Ok(layout) => {
                    self.validate(&layout, config)?;
                    info!(
                        "Layout ready after {} attempt(s); key and weapon {} cells apart",
                        attempt,
                        manhattan(Some(layout.key_chest), Some(layout.weapon_chest))
                    );
                    return Ok(layout);
                }
                Err(outcome) => {
                    match outcome {
                        AttemptOutcome::PlacementExhausted { .. } => {
                            debug!("Attempt {} failed: {}", attempt, outcome)
                        }
                        _ => warn!("Attempt {} failed: {}", attempt, outcome),
                    }
                    last_outcome = Some(outcome);
                }
            }
        }

        let last_outcome = last_outcome.ok_or_else(|| {
            ForgeError::InvalidConfig("max_attempts must be at least 1".to_string())
        })?;
        Err(ForgeError::GenerationFailed {
            attempts: config.max_attempts,
            last_outcome,
        })
    }

    fn validate(&self, layout: &DungeonLayout, config: &GenerationConfig) -> ForgeResult<()> {
        if layout.grid.rows() != config.rows || layout.grid.cols() != config.cols {
            return Err(ForgeError::InvalidLayout(format!(
                "grid is {}x{}, expected {}x{}",
                layout.grid.rows(),
                layout.grid.cols(),
                config.rows,
                config.cols
            )));
        }

        let expected = config.entity_counts().total_requests();
        if layout.placements.len() != expected {
            return Err(ForgeError::InvalidLayout(format!(
                "{} entities placed, expected {}",
                layout.placements.len(),
                expected
            )));
        }

        utils::validate_layout(layout)
    }

    fn generator_type(&self) -> &'static str {
        "LayoutGenerator"
    }
}
