//! # Spacing Rules
//!
//! Local distribution checks run after every trial placement. They prune the
//! search but do not guarantee reachability; the orchestrator checks the critical
//! path once a full placement exists.

use crate::{EntityId, PlacementRecord, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum Manhattan distances between placed entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingRules {
    /// Distance every non-portal entity keeps from the player start
    pub min_player_distance: u32,
    /// Distance between the key chest and the weapon chest
    pub min_key_weapon_distance: u32,
    /// Distance between any two chests
    pub min_chest_spacing: u32,
}

impl Default for SpacingRules {
    fn default() -> Self {
        Self {
            min_player_distance: 3,
            min_key_weapon_distance: 5,
            min_chest_spacing: 3,
        }
    }
}

/// The rule a trial placement broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingViolation {
    /// Too close to the player start
    PlayerProximity { distance: u32 },
    /// Key and weapon chests too close together
    KeyWeaponSeparation { distance: u32 },
    /// Too close to another chest
    ChestClustering { other: EntityId, distance: u32 },
}

impl fmt::Display for SpacingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpacingViolation::PlayerProximity { distance } => {
                write!(f, "{distance} cells from the player start")
            }
            SpacingViolation::KeyWeaponSeparation { distance } => {
                write!(f, "key and weapon only {distance} cells apart")
            }
            SpacingViolation::ChestClustering { other, distance } => {
                write!(f, "{distance} cells from {other}")
            }
        }
    }
}

/// Checks a trial placement against every spacing rule.
///
/// `placements` may already contain `entity` at `position`; the entity is never
/// compared against itself.
pub fn check_distribution(
    placements: &PlacementRecord,
    entity: EntityId,
    position: Position,
    rules: &SpacingRules,
) -> Result<(), SpacingViolation> {
    if !entity.is_portal() {
        if let Some(start) = placements.get(EntityId::PlayerStart) {
            let distance = position.manhattan_distance(start);
            if distance < rules.min_player_distance {
                return Err(SpacingViolation::PlayerProximity { distance });
            }
        }
    }

    let partner = match entity {
        EntityId::KeyChest => Some(EntityId::WeaponChest),
        EntityId::WeaponChest => Some(EntityId::KeyChest),
        _ => None,
    };
    if let Some(other) = partner.and_then(|partner| placements.get(partner)) {
        let distance = position.manhattan_distance(other);
        if distance < rules.min_key_weapon_distance {
            return Err(SpacingViolation::KeyWeaponSeparation { distance });
        }
    }

    if entity.is_chest_class() {
        for (other, other_pos) in placements.iter() {
            if other == entity || !other.is_chest_class() {
                continue;
            }
            let distance = position.manhattan_distance(other_pos);
            if distance < rules.min_chest_spacing {
                return Err(SpacingViolation::ChestClustering { other, distance });
            }
        }
    }

    Ok(())
}

/// Boolean form of [`check_distribution`].
///
/// # Examples
///
/// ```
/// use dungeon_forge::{is_valid_distribution, EntityId, PlacementRecord, Position, SpacingRules};
///
/// let mut placements = PlacementRecord::new();
/// placements.insert(EntityId::PlayerStart, Position::new(0, 4));
///
/// let rules = SpacingRules::default();
/// assert!(!is_valid_distribution(&placements, EntityId::Enemy(0), Position::new(1, 4), &rules));
/// assert!(is_valid_distribution(&placements, EntityId::Enemy(0), Position::new(3, 4), &rules));
/// ```
pub fn is_valid_distribution(
    placements: &PlacementRecord,
    entity: EntityId,
    position: Position,
    rules: &SpacingRules,
) -> bool {
    check_distribution(placements, entity, position, rules).is_ok()
}
