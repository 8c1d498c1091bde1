//! Grid cell contents: the tile itself, ground items and rooms.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::Point;

/// An item lying on the ground. Owned by the cell it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// `ItemDef` ident
    pub def: i32,
}

impl Item {
    pub fn new(def: i32) -> Self {
        Self { def }
    }
}

/// One grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// `TileDef` ident, `-1` only on the bad tile
    pub terrain: i32,
    /// Optional building overlay (`TileDef` ident)
    pub building: Option<i32>,
    pub room: Option<Entity>,
    pub actor: Option<Entity>,
    pub item: Option<Item>,
}

impl Tile {
    /// Returned for out-of-grid lookups
    pub const BAD: Tile = Tile {
        terrain: -1,
        building: None,
        room: None,
        actor: None,
        item: None,
    };

    pub fn new(terrain: i32) -> Self {
        Self {
            terrain,
            building: None,
            room: None,
            actor: None,
            item: None,
        }
    }

    pub fn is_bad(&self) -> bool {
        self.terrain < 0
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Room component - a flood-filled enclosed region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// `RoomDef` ident, unset until first classified
    pub def: Option<i32>,
    pub points: Vec<Point>,
}

impl Room {
    pub fn new(points: Vec<Point>) -> Self {
        Self { def: None, points }
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.points.contains(point)
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }
}
