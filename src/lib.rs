//! # Dungeon Forge
//!
//! Constraint-driven generation of small grid dungeons: a walled rectangle with a
//! player entrance and an exit cut into the outer ring, and chests, enemies and
//! traps spread over the interior.
//!
//! ## Architecture Overview
//!
//! The crate is organised around a single generation pipeline:
//!
//! - **Game**: grid primitives, cell types, and the initial player record
//! - **Generation**: candidate providers, spacing rules, the backtracking
//!   placement solver, and the attempt-bounded orchestrator
//! - **Utils**: distance helpers and the reachability checker
//!
//! Rendering, input handling and movement resolution are left to the caller. They
//! consume a finished [`DungeonLayout`] as read-only data.

pub mod game;
pub mod generation;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use utils::*;

/// Core error type for the generation engine.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration rejected before generation started
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A grid access fell outside the grid
    #[error("Position {0} is outside the grid")]
    OutOfBounds(Position),

    /// Every attempt ended without a validated layout
    #[error("Generation failed after {attempts} attempts (last attempt: {last_outcome})")]
    GenerationFailed {
        attempts: u32,
        last_outcome: AttemptOutcome,
    },

    /// A finished layout broke one of its invariants
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

/// Result type used throughout the crate.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Smallest grid side accepted by default
    pub const DEFAULT_MIN_DIMENSION: u32 = 5;

    /// Largest grid side accepted by default
    pub const DEFAULT_MAX_DIMENSION: u32 = 64;

    /// Dimension range the command line draws from when no size is given
    pub const RANDOM_DIMENSION_RANGE: std::ops::RangeInclusive<u32> = 12..=18;

    /// Default number of generation attempts
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    /// Default search step ceiling per attempt
    pub const DEFAULT_STEP_LIMIT: u32 = 500;

    /// Traps placed on every layout
    pub const DEFAULT_TRAP_COUNT: u32 = 2;

    /// Starting player health
    pub const DEFAULT_PLAYER_HEALTH: u32 = 3;

    /// Durability of the weapon once picked up
    pub const DEFAULT_WEAPON_DURABILITY: u32 = 3;
}
