//! Behavior system - advances time and runs each actor's AI.
//!
//! One tick:
//! 1. advance the turn counter and the clock
//! 2. walk the actors in registry order; each acts with probability
//!    `move_chance / 1000`, ages by one, then runs the behavior for its kind
//! 3. settle the actors that were removed during the walk

use hecs::Entity;

use crate::components::{Direction, Point};
use crate::definitions::ActorKind;
use crate::world::World;

/// What an actor's definition says about how it behaves, copied out so the
/// world can be mutated while acting on it
#[derive(Debug, Clone, Copy)]
struct Traits {
    kind: ActorKind,
    faction: i32,
    move_chance: u32,
    food_item: Option<i32>,
    grow_to: Option<i32>,
    grow_time: i32,
}

impl World {
    /// Advance the simulation by one step
    pub fn tick(&mut self) {
        self.clock.advance(self.config.minutes_per_tick);

        let mut index = 0;
        while let Some(entity) = self.registry.actor_at(index) {
            index += 1;
            if self.pending_removal.contains(&entity) {
                continue;
            }
            let Some(traits) = self.traits_of(entity) else {
                log::warn!("tick: actor {:?} has no definition, skipping", entity);
                continue;
            };
            if !self.rng.chance_per_mille(traits.move_chance) {
                continue;
            }
            if let Some(vitals) = self.registry.vitals_mut(entity) {
                vitals.age += 1;
            }

            match traits.kind {
                ActorKind::Player => {}
                ActorKind::Villager => villager_behavior(self, entity),
                ActorKind::Monster => monster_behavior(self, entity, traits.faction),
                ActorKind::Animal => animal_behavior(self, entity, traits.food_item),
                ActorKind::Plant => plant_behavior(self, entity, &traits),
            }
        }

        self.settle_removals();
    }

    fn traits_of(&self, entity: Entity) -> Option<Traits> {
        let actor = self.registry.actor(entity)?;
        let def = self.defs.actor(actor.def)?;
        Some(Traits {
            kind: def.kind,
            faction: actor.faction,
            move_chance: def.move_chance,
            food_item: def.food_item,
            grow_to: def.grow_to,
            grow_time: def.grow_time,
        })
    }

    /// End-of-tick sweep: the player comes back at full health somewhere
    /// open, everyone else is destroyed.
    fn settle_removals(&mut self) {
        let removed = std::mem::take(&mut self.pending_removal);
        for entity in removed {
            let is_player = self
                .registry
                .actor(entity)
                .and_then(|a| self.defs.actor_kind(a.def))
                == Some(ActorKind::Player);
            if is_player {
                self.respawn_player(entity);
            } else {
                self.registry.despawn_actor(entity);
            }
        }
    }

    fn respawn_player(&mut self, entity: Entity) {
        if let Some(def) = self.actor_def(entity).cloned() {
            if let Some(vitals) = self.registry.vitals_mut(entity) {
                vitals.reset(&def);
            }
        }
        let Some(p) = self.find_open_tile(true) else {
            log::warn!("no open cell to respawn the player");
            return;
        };
        if self.move_actor(entity, p) {
            self.add_log_msg("You have died! Respawning...");
            log::info!("respawning player at {}", p);
        }
    }

    /// Step in `dir`, sidestepping if blocked
    fn step_actor(&mut self, entity: Entity, dir: Direction) -> bool {
        self.try_move_actor(entity, dir, true)
    }

    fn wander(&mut self, entity: Entity) {
        let dir = Direction::from_index(self.rng.next32() % 8);
        self.step_actor(entity, dir);
    }
}

/// Villagers wander
fn villager_behavior(world: &mut World, entity: Entity) {
    world.wander(entity);
}

/// Monsters hunt the nearest mobile actor outside their faction: attack it
/// when in reach, close in otherwise, wander when there is nothing to hunt.
fn monster_behavior(world: &mut World, entity: Entity, faction: i32) {
    let Some(pos) = world.registry.position(entity) else {
        return;
    };
    let target = world.find_actor_nearest(pos, Some(faction), world.config.search_radius);
    if !world.valid(&target) {
        world.wander(entity);
        return;
    }
    if target.distance(&pos) < world.config.attack_range {
        if let Some(victim) = world.actor_at(&target) {
            world.do_damage(entity, victim);
        }
    } else {
        world.step_actor(entity, pos.direction_to(&target));
    }
}

/// Animals head for the nearest food item and eat it on arrival, otherwise
/// wander.
fn animal_behavior(world: &mut World, entity: Entity, food_item: Option<i32>) {
    let Some(pos) = world.registry.position(entity) else {
        return;
    };
    if let Some(food) = food_item {
        let target = world.find_item_nearest(pos, food, world.config.search_radius);
        if world.valid(&target) {
            match pos.direction_to(&target) {
                Direction::None => {
                    world.remove_item(target);
                }
                dir => {
                    world.step_actor(entity, dir);
                }
            }
            return;
        }
    }
    world.wander(entity);
}

/// Plants grow into their next definition once old enough. A missing
/// growth target freezes the plant's age.
fn plant_behavior(world: &mut World, entity: Entity, traits: &Traits) {
    let Some(grow_to) = traits.grow_to else {
        return;
    };
    let age = world.registry.vitals(entity).map(|v| v.age).unwrap_or(0);
    if age < traits.grow_time {
        return;
    }
    let pos = world.registry.position(entity).unwrap_or(Point::NOWHERE);
    let Some(next) = world.defs.actor(grow_to) else {
        let name = world
            .actor_def(entity)
            .map(|d| d.name.clone())
            .unwrap_or_default();
        log::warn!("{} at {} has invalid next growth state {}", name, pos, grow_to);
        let frozen = world.config.frozen_age;
        if let Some(vitals) = world.registry.vitals_mut(entity) {
            vitals.age = frozen;
        }
        return;
    };
    let Some(grown) = world.registry.replace_actor(entity, next) else {
        return;
    };
    if let Some(tile) = world.grid.at_mut(&pos) {
        if tile.actor == Some(entity) {
            tile.actor = Some(grown);
        }
    }
    log::debug!("plant at {} grew into definition {}", pos, grow_to);
}
