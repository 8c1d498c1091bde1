//! CraftRL Core - Tile World Simulation Engine
//!
//! A grid of terrain cells occupied by actors and ground items, advanced
//! one discrete tick at a time.
//!
//! # Architecture
//!
//! Actors and rooms live in a `hecs` arena owned by the [`World`]; grid
//! cells hold their handles:
//! - **Definitions**: immutable templates for actors, items, tiles, recipes
//!   and rooms, loaded once and looked up by ident
//! - **Components**: plain data (Position, Vitals, Inventory, Room, ...)
//! - **Systems**: `impl World` blocks for placement, AI, combat, rooms and
//!   player actions
//!
//! # Example
//!
//! ```rust,no_run
//! use craftrl_core::prelude::*;
//!
//! let json = std::fs::read_to_string("data/definitions.json").unwrap();
//! let defs = Definitions::from_json_str(&json).unwrap();
//!
//! let mut world = World::new(defs);
//! world.seed(42);
//! world.alloc_map(64, 64);
//! world.spawn_actor(0, Point::new(10, 10));
//!
//! // One tick per accepted player action
//! if world.player_move(Direction::East) {
//!     world.tick();
//! }
//! world.save_to_path("world.sav").unwrap();
//! ```

pub mod clock;
pub mod components;
pub mod config;
pub mod crafting;
pub mod definitions;
pub mod error;
pub mod grid;
pub mod messages;
pub mod persistence;
pub mod random;
pub mod registry;
pub mod systems;
pub mod world;

#[cfg(test)]
pub mod testing;

pub use world::World;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::WorldConfig;
    pub use crate::definitions::{ActorKind, Definitions};
    pub use crate::error::{CraftError, DefinitionError, SaveError};
    pub use crate::world::World;
}
