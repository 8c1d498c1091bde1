//! Component definitions for the tile world.
//!
//! Components are plain data. Actors and rooms live in the registry's
//! arena; tiles and ground items live in the grid.

mod actor;
mod common;
mod inventory;
mod tile;

pub use actor::*;
pub use common::*;
pub use inventory::*;
pub use tile::*;
