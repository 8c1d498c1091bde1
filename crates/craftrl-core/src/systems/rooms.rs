//! Room detection - bounded flood fill and requirement-based
//! classification.

use std::collections::HashSet;

use hecs::Entity;

use crate::components::{Direction, Point, Room};
use crate::world::World;

impl World {
    /// Every cell reachable from `seed` through the eight neighbours
    /// without crossing a wall. Regions larger than `max_room_size` are not
    /// enclosed and come back empty, as does an off-map seed.
    pub fn find_room_extents(&self, seed: Point) -> Vec<Point> {
        if !self.grid.valid(&seed) {
            return Vec::new();
        }
        let limit = self.config.max_room_size;
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut todo = vec![seed];

        while let Some(pos) = todo.pop() {
            if !seen.insert(pos) {
                continue;
            }
            result.push(pos);
            if result.len() > limit {
                return Vec::new();
            }
            for dir in Direction::ALL {
                let next = pos.step(dir);
                if self.grid.valid(&next)
                    && !seen.contains(&next)
                    && !self.defs.is_wall(self.grid.at(&next).terrain)
                {
                    todo.push(next);
                }
            }
        }
        result
    }

    /// Flood fill from `seed` and register the region as a new, classified
    /// room. Rooms overlapping the region are removed first. `None` when the
    /// region is not enclosed.
    pub fn create_room(&mut self, seed: Point) -> Option<Entity> {
        let points = self.find_room_extents(seed);
        if points.is_empty() {
            return None;
        }
        let overlapping: HashSet<Entity> = points
            .iter()
            .filter_map(|p| self.grid.at(p).room)
            .collect();
        for room in overlapping {
            self.remove_room(room);
        }
        let room = self.add_room(Room::new(points))?;
        self.update_room(room);
        Some(room)
    }

    /// Register `room` and point each of its cells at it. Refused, with
    /// nothing changed, when a point is off the map or already in a room.
    pub fn add_room(&mut self, room: Room) -> Option<Entity> {
        let mut unique = HashSet::new();
        for p in &room.points {
            if !self.grid.valid(p) || self.grid.at(p).room.is_some() || !unique.insert(*p) {
                return None;
            }
        }
        let points = room.points.clone();
        let entity = self.registry.spawn_room(room);
        for p in &points {
            if let Some(tile) = self.grid.at_mut(p) {
                tile.room = Some(entity);
            }
        }
        Some(entity)
    }

    /// Drop a room and clear its cells' back-references
    pub fn remove_room(&mut self, room: Entity) -> bool {
        let Some(removed) = self.registry.despawn_room(room) else {
            return false;
        };
        for p in &removed.points {
            if let Some(tile) = self.grid.at_mut(p) {
                if tile.room == Some(room) {
                    tile.room = None;
                }
            }
        }
        true
    }

    /// Re-classify a room from its current contents and tell the player
    /// what it is, even when nothing changed.
    pub fn update_room(&mut self, room: Entity) {
        let Some(previous) = self.registry.room(room).map(|r| r.def) else {
            log::warn!("update_room: {:?} is not a room", room);
            return;
        };
        let Some(def) = self.classify_room(room) else {
            log::warn!("update_room: no room definitions to classify against");
            return;
        };
        let name = |ident| {
            self.defs
                .room(ident)
                .map(|d| d.name.clone())
                .unwrap_or_default()
        };
        let msg = match previous {
            None => format!("Created {}.", name(def)),
            Some(old) => format!("The {} becomes a {}.", name(old), name(def)),
        };
        if let Some(r) = self.registry.room_mut(room) {
            r.def = Some(def);
        }
        self.add_log_msg(msg);
    }

    /// Best room definition for the room's contents: the highest-value
    /// definition whose required tiles all appear among its cells (terrain
    /// or building), earlier definitions winning ties. Falls back to room
    /// definition 0.
    pub fn classify_room(&self, room: Entity) -> Option<i32> {
        let room = self.registry.room(room)?;
        let present: HashSet<i32> = room
            .points
            .iter()
            .flat_map(|p| {
                let tile = self.grid.at(p);
                std::iter::once(tile.terrain).chain(tile.building)
            })
            .collect();

        let mut score = 0;
        let mut best = None;
        for def in self.defs.rooms() {
            if def.value <= score {
                continue;
            }
            if def.requirements.iter().all(|t| present.contains(t)) {
                score = def.value;
                best = Some(def.ident);
            }
        }
        best.or_else(|| self.defs.room(0).map(|d| d.ident))
    }

    /// Classify a room without logging, used when restoring a save
    pub(crate) fn classify_room_quietly(&mut self, room: Entity) {
        let def = self.classify_room(room);
        if let Some(r) = self.registry.room_mut(room) {
            r.def = def;
        }
    }

    /// The room definition name of the room covering `p`, if any
    pub fn room_name_at(&self, p: &Point) -> Option<&str> {
        let room = self.grid.at(p).room?;
        let def = self.registry.room(room)?.def?;
        self.defs.room(def).map(|d| d.name.as_str())
    }
}
