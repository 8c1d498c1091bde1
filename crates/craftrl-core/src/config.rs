//! Simulation tunables. The defaults are the game's standard rules.

use serde::{Deserialize, Serialize};

/// Configuration for a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Radius of prey, threat and food searches
    pub search_radius: i32,
    /// A monster attacks a target closer than this (Euclidean)
    pub attack_range: f64,
    /// Flood fills larger than this are "not enclosed"
    pub max_room_size: usize,
    /// Simulated minutes per tick
    pub minutes_per_tick: u32,
    /// Combat messages are only logged this close to the player
    pub message_radius: f64,
    pub start_day: u32,
    pub start_hour: u32,
    pub start_minute: u32,
    /// Age given to a plant whose growth target is missing
    pub frozen_age: i32,
    /// Largest width or height accepted from a save file
    pub max_map_dimension: u32,
    /// Random attempts at a respawn point before scanning the map in order
    pub respawn_attempts: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            search_radius: 8,
            attack_range: 2.0,
            max_room_size: 100,
            minutes_per_tick: 3,
            message_radius: 10.0,
            start_day: 1,
            start_hour: 12,
            start_minute: 0,
            frozen_age: -9999,
            max_map_dimension: 4096,
            respawn_attempts: 10_000,
        }
    }
}

impl WorldConfig {
    /// Parse a JSON config; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
