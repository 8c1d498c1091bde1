//! Turn counter and in-game wall clock.

use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;

const MINUTES_PER_HOUR: u32 = 60;
const HOURS_PER_DAY: u32 = 24;

/// Turn count plus day/hour/minute, advanced only by ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    pub turn: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl GameClock {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            turn: 0,
            day: config.start_day,
            hour: config.start_hour,
            minute: config.start_minute,
        }
    }

    /// One tick: bump the turn and carry minutes into hours and days
    pub fn advance(&mut self, minutes: u32) {
        self.turn = self.turn.wrapping_add(1);
        self.minute += minutes;
        self.hour += self.minute / MINUTES_PER_HOUR;
        self.minute %= MINUTES_PER_HOUR;
        self.day += self.hour / HOURS_PER_DAY;
        self.hour %= HOURS_PER_DAY;
    }

    /// (day, hour, minute)
    pub fn time(&self) -> (u32, u32, u32) {
        (self.day, self.hour, self.minute)
    }
}
