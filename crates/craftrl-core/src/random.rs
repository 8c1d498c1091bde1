//! Deterministic random number generator (xorshift+).
//!
//! Every random decision in the simulation (AI moves, loot rolls, respawn
//! points, world painting) draws from one seeded `Random` owned by the
//! world, so a seed always reproduces the same run. `Random` implements
//! `rand::RngCore`, which lets population code use the `rand::Rng`
//! helpers on the same stream.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const DEFAULT_V1: u64 = 203_594;
const DEFAULT_V2: u64 = 708_952;

/// Two-word xorshift+ generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Random {
    v1: u64,
    v2: u64,
}

impl Default for Random {
    fn default() -> Self {
        Self {
            v1: DEFAULT_V1,
            v2: DEFAULT_V2,
        }
    }
}

impl Random {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = Self::default();
        rng.seed(seed);
        rng
    }

    /// Replace both internal words. A zero seed gives a stream of zeros.
    pub fn seed(&mut self, seed: u64) {
        self.v1 = seed << 1;
        self.v2 = seed >> 2;
    }

    pub fn next64(&mut self) -> u64 {
        let t1 = self.v2;
        self.v1 ^= self.v1 << 23;
        let t2 = self.v1 ^ self.v2 ^ (self.v1 >> 17) ^ (self.v2 >> 26);
        let result = t2.wrapping_add(self.v2);
        self.v1 = t1;
        self.v2 = t2;
        result
    }

    /// Low 32 bits of the next 64-bit output
    pub fn next32(&mut self) -> u32 {
        self.next64() as u32
    }

    /// Uniform value in `low..=high`. Always consumes one draw; returns
    /// `low` when `high < low`.
    pub fn between(&mut self, low: u32, high: u32) -> u32 {
        let value = self.next32();
        if high < low {
            return low;
        }
        match (high - low).checked_add(1) {
            Some(range) => low + value % range,
            None => value,
        }
    }

    /// Signed variant of [`Random::between`]
    pub fn between_i32(&mut self, low: i32, high: i32) -> i32 {
        let value = self.next32();
        if high < low {
            return low;
        }
        let range = (i64::from(high) - i64::from(low) + 1) as u64;
        (i64::from(low) + (u64::from(value) % range) as i64) as i32
    }

    /// Sum of `dice` independent `between(1, sides)` draws
    pub fn roll(&mut self, dice: u32, sides: u32) -> u32 {
        (0..dice).fold(0u32, |total, _| total.wrapping_add(self.between(1, sides)))
    }

    /// `true` with probability `per_mille / 1000`
    pub fn chance_per_mille(&mut self, per_mille: u32) -> bool {
        self.next32() % 1000 < per_mille
    }
}

impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        self.next32()
    }

    fn next_u64(&mut self) -> u64 {
        self.next64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Random {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::with_seed(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::with_seed(state)
    }
}
