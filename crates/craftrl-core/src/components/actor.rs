//! Actor components. An actor entity carries `Actor`, `Position`, `Vitals`
//! and `Inventory`.

use serde::{Deserialize, Serialize};

use super::common::Point;
use crate::definitions::ActorDef;

/// Identity of a live actor: which definition it was built from and which
/// side it fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// `ActorDef` ident
    pub def: i32,
    pub faction: i32,
}

impl Actor {
    pub fn new(def: &ActorDef) -> Self {
        Self {
            def: def.ident,
            faction: def.faction,
        }
    }
}

/// Where an actor stands. `Point::NOWHERE` while off the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub point: Point,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            point: Point::NOWHERE,
        }
    }
}

impl Position {
    pub fn new(point: Point) -> Self {
        Self { point }
    }
}

/// Health and age (ticks survived)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: i32,
    pub age: i32,
}

impl Vitals {
    /// Full health, age zero
    pub fn fresh(def: &ActorDef) -> Self {
        Self {
            health: def.health,
            age: 0,
        }
    }

    pub fn reset(&mut self, def: &ActorDef) {
        self.health = def.health;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// "the wolf", or "the wolf (40%)" while wounded
pub fn actor_display_name(def: &ActorDef, vitals: &Vitals) -> String {
    let mut name = format!("the {}", def.name);
    if vitals.health < def.health && vitals.health > 0 && def.health > 0 {
        let percent = vitals.health * 100 / def.health;
        name.push_str(&format!(" ({}%)", percent));
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::standard_definitions;
    use crate::testing::actors::WOLF;

    #[test]
    fn test_fresh_vitals() {
        let defs = standard_definitions();
        let wolf = defs.actor(WOLF).unwrap();
        let vitals = Vitals::fresh(wolf);
        assert_eq!(vitals.health, wolf.health);
        assert_eq!(vitals.age, 0);
        assert!(!vitals.is_dead());
    }

    #[test]
    fn test_display_name_shows_wounds() {
        let defs = standard_definitions();
        let wolf = defs.actor(WOLF).unwrap();
        let mut vitals = Vitals::fresh(wolf);
        assert_eq!(actor_display_name(wolf, &vitals), "the wolf");

        vitals.health = wolf.health / 2;
        assert_eq!(actor_display_name(wolf, &vitals), "the wolf (50%)");

        vitals.health = 0;
        assert_eq!(actor_display_name(wolf, &vitals), "the wolf");
    }

    #[test]
    fn test_position_defaults_off_grid() {
        assert_eq!(Position::default().point, Point::NOWHERE);
    }
}
