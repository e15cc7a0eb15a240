//! # Player Record
//!
//! The starting status handed to the movement layer once a layout is ready.

use crate::{config, Position};
use serde::{Deserialize, Serialize};

/// Initial player state for a freshly generated layout.
///
/// The generator only creates this record; the movement layer owns every later
/// change to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Where the player enters the dungeon
    pub position: Position,
    /// Whether the key chest has been opened
    pub has_key: bool,
    /// Whether the weapon chest has been opened
    pub has_weapon: bool,
    /// Enemies the weapon can still defeat
    pub weapon_durability: u32,
    /// Remaining health
    pub health: u32,
}

impl PlayerRecord {
    /// Creates a player record at the starting values.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_forge::{PlayerRecord, Position};
    ///
    /// let player = PlayerRecord::new(Position::new(0, 4));
    /// assert!(!player.has_key);
    /// assert_eq!(player.health, 3);
    /// ```
    pub fn new(position: Position) -> Self {
        Self {
            position,
            has_key: false,
            has_weapon: false,
            weapon_durability: config::DEFAULT_WEAPON_DURABILITY,
            health: config::DEFAULT_PLAYER_HEALTH,
        }
    }
}
