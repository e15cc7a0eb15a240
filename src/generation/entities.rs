//! # Entities
//!
//! Typed identifiers for everything the generator places, the request list that
//! drives the solver, and the placement record it fills in.

use crate::{CellType, ForgeError, ForgeResult, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Broad class of an entity, used by the spacing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    /// Player start or exit, cut into the wall ring
    Portal,
    /// The chest holding the exit key
    Key,
    /// The chest holding the weapon
    Weapon,
    /// An ordinary chest
    Chest,
    Enemy,
    Trap,
}

/// Stable identifier of a single placed entity.
///
/// Serialized by its display name (`PLAYER_START`, `CHEST_2`, ...), which also
/// makes it usable as a JSON map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EntityId {
    PlayerStart,
    Exit,
    KeyChest,
    WeaponChest,
    Chest(u32),
    Enemy(u32),
    Trap(u32),
}

impl EntityId {
    /// The category this entity belongs to.
    pub fn category(self) -> EntityCategory {
        match self {
            EntityId::PlayerStart | EntityId::Exit => EntityCategory::Portal,
            EntityId::KeyChest => EntityCategory::Key,
            EntityId::WeaponChest => EntityCategory::Weapon,
            EntityId::Chest(_) => EntityCategory::Chest,
            EntityId::Enemy(_) => EntityCategory::Enemy,
            EntityId::Trap(_) => EntityCategory::Trap,
        }
    }

    /// The cell type this entity is drawn with.
    pub fn cell_type(self) -> CellType {
        match self {
            EntityId::PlayerStart => CellType::Player,
            EntityId::Exit => CellType::Exit,
            EntityId::KeyChest | EntityId::WeaponChest | EntityId::Chest(_) => CellType::Chest,
            EntityId::Enemy(_) => CellType::Enemy,
            EntityId::Trap(_) => CellType::Trap,
        }
    }

    /// Whether this entity sits in the wall ring.
    pub fn is_portal(self) -> bool {
        self.category() == EntityCategory::Portal
    }

    /// Whether this entity is a chest of any kind.
    pub fn is_chest_class(self) -> bool {
        matches!(
            self.category(),
            EntityCategory::Key | EntityCategory::Weapon | EntityCategory::Chest
        )
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::PlayerStart => f.write_str("PLAYER_START"),
            EntityId::Exit => f.write_str("EXIT"),
            EntityId::KeyChest => f.write_str("KEY"),
            EntityId::WeaponChest => f.write_str("WEAPON"),
            EntityId::Chest(index) => write!(f, "CHEST_{index}"),
            EntityId::Enemy(index) => write!(f, "ENEMY_{index}"),
            EntityId::Trap(index) => write!(f, "TRAP_{index}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = ForgeError;

    fn from_str(name: &str) -> ForgeResult<Self> {
        match name {
            "PLAYER_START" => return Ok(EntityId::PlayerStart),
            "EXIT" => return Ok(EntityId::Exit),
            "KEY" => return Ok(EntityId::KeyChest),
            "WEAPON" => return Ok(EntityId::WeaponChest),
            _ => {}
        }

        let invalid = || ForgeError::InvalidLayout(format!("unknown entity '{name}'"));
        let (prefix, index) = name.rsplit_once('_').ok_or_else(invalid)?;
        let index: u32 = index.parse().map_err(|_| invalid())?;
        match prefix {
            "CHEST" => Ok(EntityId::Chest(index)),
            "ENEMY" => Ok(EntityId::Enemy(index)),
            "TRAP" => Ok(EntityId::Trap(index)),
            _ => Err(invalid()),
        }
    }
}

impl From<EntityId> for String {
    fn from(entity: EntityId) -> Self {
        entity.to_string()
    }
}

impl TryFrom<String> for EntityId {
    type Error = ForgeError;

    fn try_from(name: String) -> ForgeResult<Self> {
        name.parse()
    }
}

/// One entry of the request list: an entity and the cell type to draw it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRequest {
    pub cell: CellType,
    pub entity: EntityId,
}

impl EntityRequest {
    /// Creates a request drawing the entity with its own cell type.
    pub fn new(entity: EntityId) -> Self {
        Self {
            cell: entity.cell_type(),
            entity,
        }
    }

    /// Whether the entity may be placed on a cell currently holding `current`.
    ///
    /// Portals replace a wall; everything else replaces a floor.
    pub fn accepts(&self, current: Option<CellType>) -> bool {
        match current {
            Some(CellType::Wall) => self.entity.is_portal(),
            Some(CellType::Floor) => !self.entity.is_portal(),
            _ => false,
        }
    }
}

/// How many of each non-essential entity an attempt places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub extra_chests: u32,
    pub enemies: u32,
    pub traps: u32,
}

impl EntityCounts {
    /// Number of requests in a list built from these counts.
    pub fn total_requests(&self) -> usize {
        // Player start and exit.
        self.floor_requests().saturating_add(2)
    }

    /// Number of requests that need an interior floor cell, key and weapon chests included.
    ///
    /// Summed in `usize` so arbitrarily large counts saturate instead of overflowing.
    pub fn floor_requests(&self) -> usize {
        [self.extra_chests, self.enemies, self.traps]
            .into_iter()
            .fold(2usize, |total, count| total.saturating_add(count as usize))
    }
}

/// Entities placed first, in this order, on every attempt.
pub const ESSENTIAL_ENTITIES: [EntityId; 4] = [
    EntityId::PlayerStart,
    EntityId::Exit,
    EntityId::KeyChest,
    EntityId::WeaponChest,
];

/// Assembles the ordered request list for one attempt.
///
/// The essential entities come first in fixed order. Extra chests, enemies and
/// traps follow in a shuffled order, which varies layouts between attempts.
pub fn build_request_list(counts: &EntityCounts, rng: &mut StdRng) -> Vec<EntityRequest> {
    let mut tail: Vec<EntityRequest> = (0..counts.extra_chests)
        .map(EntityId::Chest)
        .chain((0..counts.enemies).map(EntityId::Enemy))
        .chain((0..counts.traps).map(EntityId::Trap))
        .map(EntityRequest::new)
        .collect();
    tail.shuffle(rng);

    ESSENTIAL_ENTITIES
        .into_iter()
        .map(EntityRequest::new)
        .chain(tail)
        .collect()
}

/// Where each placed entity ended up.
///
/// Owned by a single search; entries are added on trial placement and removed on
/// rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementRecord {
    entries: BTreeMap<EntityId, Position>,
}

impl PlacementRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a position, returning the previous one for that entity.
    pub fn insert(&mut self, entity: EntityId, position: Position) -> Option<Position> {
        self.entries.insert(entity, position)
    }

    /// Removes an entity, returning its position.
    pub fn remove(&mut self, entity: EntityId) -> Option<Position> {
        self.entries.remove(&entity)
    }

    /// Gets the position of an entity if it has been placed.
    pub fn get(&self, entity: EntityId) -> Option<Position> {
        self.entries.get(&entity).copied()
    }

    /// Number of placed entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been placed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(entity, position)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Position)> + '_ {
        self.entries.iter().map(|(entity, pos)| (*entity, *pos))
    }
}
