//! # Utilities Module
//!
//! Distance helpers and the reachability checker used by generation.

pub mod math;
pub mod pathfinding;

pub use self::math::*;
pub use self::pathfinding::*;
