//! Systems - logic that operates on the world
//!
//! Each module adds an `impl World` block for one concern.

mod actions;
mod behavior;
mod combat;
mod placement;
mod rooms;
