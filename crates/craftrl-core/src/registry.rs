//! Entity registry - owns every live actor and room.
//!
//! Actors and rooms are `hecs` entities; the grid only holds their
//! `Entity` handles. Dispatch order is the order in which entities were
//! registered, so alongside the ECS world we keep the handles in two
//! ordered lists.

use hecs::{Entity, Ref};

use crate::components::{Actor, Inventory, Point, Position, Room, Vitals};
use crate::definitions::ActorDef;

#[derive(Default)]
pub struct Registry {
    ecs: hecs::World,
    actors: Vec<Entity>,
    rooms: Vec<Entity>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("actors", &self.actors.len())
            .field("rooms", &self.rooms.len())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy every actor and room
    pub fn clear(&mut self) {
        self.ecs.clear();
        self.actors.clear();
        self.rooms.clear();
    }

    /// Build a fresh actor (full health, age zero, empty inventory, off the
    /// grid) and append it to the dispatch order.
    pub fn spawn_actor(&mut self, def: &ActorDef) -> Entity {
        let entity = self.ecs.spawn((
            Actor::new(def),
            Position::default(),
            Vitals::fresh(def),
            Inventory::new(),
        ));
        self.actors.push(entity);
        entity
    }

    /// Swap `old` for a freshly built actor of `def`, keeping its slot in
    /// the dispatch order and its position. `old` is destroyed.
    pub fn replace_actor(&mut self, old: Entity, def: &ActorDef) -> Option<Entity> {
        let slot = self.actors.iter().position(|&e| e == old)?;
        let point = self.position(old).unwrap_or(Point::NOWHERE);
        let entity = self.ecs.spawn((
            Actor::new(def),
            Position::new(point),
            Vitals::fresh(def),
            Inventory::new(),
        ));
        self.actors[slot] = entity;
        let _ = self.ecs.despawn(old);
        Some(entity)
    }

    /// Destroy an actor and drop it from the dispatch order
    pub fn despawn_actor(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.actors.iter().position(|&e| e == entity) else {
            return false;
        };
        self.actors.remove(slot);
        self.ecs.despawn(entity).is_ok()
    }

    pub fn spawn_room(&mut self, room: Room) -> Entity {
        let entity = self.ecs.spawn((room,));
        self.rooms.push(entity);
        entity
    }

    /// Destroy a room, handing back its contents
    pub fn despawn_room(&mut self, entity: Entity) -> Option<Room> {
        let slot = self.rooms.iter().position(|&e| e == entity)?;
        self.rooms.remove(slot);
        let room = self.ecs.remove_one::<Room>(entity).ok();
        let _ = self.ecs.despawn(entity);
        room
    }

    /// Actors in dispatch order
    pub fn actors(&self) -> &[Entity] {
        &self.actors
    }

    pub fn rooms(&self) -> &[Entity] {
        &self.rooms
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The actor in dispatch slot `index`
    pub fn actor_at(&self, index: usize) -> Option<Entity> {
        self.actors.get(index).copied()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.ecs.contains(entity)
    }

    pub fn actor(&self, entity: Entity) -> Option<Actor> {
        self.ecs.get::<&Actor>(entity).ok().map(|a| *a)
    }

    pub fn position(&self, entity: Entity) -> Option<Point> {
        self.ecs.get::<&Position>(entity).ok().map(|p| p.point)
    }

    pub fn set_position(&mut self, entity: Entity, point: Point) -> bool {
        match self.ecs.query_one_mut::<&mut Position>(entity) {
            Ok(pos) => {
                pos.point = point;
                true
            }
            Err(_) => false,
        }
    }

    pub fn vitals(&self, entity: Entity) -> Option<Vitals> {
        self.ecs.get::<&Vitals>(entity).ok().map(|v| *v)
    }

    pub fn vitals_mut(&mut self, entity: Entity) -> Option<&mut Vitals> {
        self.ecs.query_one_mut::<&mut Vitals>(entity).ok()
    }

    pub fn inventory(&self, entity: Entity) -> Option<Ref<'_, Inventory>> {
        self.ecs.get::<&Inventory>(entity).ok()
    }

    pub fn inventory_mut(&mut self, entity: Entity) -> Option<&mut Inventory> {
        self.ecs.query_one_mut::<&mut Inventory>(entity).ok()
    }

    pub fn room(&self, entity: Entity) -> Option<Ref<'_, Room>> {
        self.ecs.get::<&Room>(entity).ok()
    }

    pub fn room_mut(&mut self, entity: Entity) -> Option<&mut Room> {
        self.ecs.query_one_mut::<&mut Room>(entity).ok()
    }

    /// Underlying ECS world, for ad-hoc queries
    pub fn ecs(&self) -> &hecs::World {
        &self.ecs
    }
}
