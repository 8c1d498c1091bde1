//! Placement & query - the only code that links actors and items into
//! grid cells. Every mutation keeps cell and entity positions in step.

use hecs::Entity;

use crate::components::{Direction, Item, Point};
use crate::definitions::ActorKind;
use crate::world::World;

impl World {
    /// On the map, not solid and free of actors
    pub fn is_passable(&self, p: &Point) -> bool {
        if !self.grid.valid(p) {
            return false;
        }
        let tile = self.grid.at(p);
        tile.actor.is_none() && !self.defs.is_solid(tile.terrain)
    }

    /// Place `entity` at `to`, unlinking it from its old cell. Fails when
    /// `to` is off the map or holds a different actor.
    pub fn move_actor(&mut self, entity: Entity, to: Point) -> bool {
        let Some(actor) = self.registry.actor(entity) else {
            log::warn!("move_actor: {:?} is not a live actor", entity);
            return false;
        };
        if !self.grid.valid(&to) {
            log::warn!("move_actor: refusing to move actor {} off the map to {}", actor.def, to);
            return false;
        }
        match self.grid.at(&to).actor {
            Some(other) if other == entity => return true,
            Some(_) => return false,
            None => {}
        }

        self.unlink_actor(entity);
        if let Some(tile) = self.grid.at_mut(&to) {
            tile.actor = Some(entity);
        }
        self.registry.set_position(entity, to);
        self.pending_removal.retain(|&e| e != entity);
        if self.defs.actor_kind(actor.def) == Some(ActorKind::Player) {
            self.player = Some(entity);
        }
        true
    }

    /// Build a new actor from definition `def` at full health and place it.
    /// Nothing is created when the definition is unknown or `at` is off the
    /// map or occupied.
    pub fn spawn_actor(&mut self, def: i32, at: Point) -> Option<Entity> {
        if !self.grid.valid(&at) || self.grid.at(&at).actor.is_some() {
            return None;
        }
        let def = self.defs.actor(def)?;
        let entity = self.registry.spawn_actor(def);
        if self.move_actor(entity, at) {
            Some(entity)
        } else {
            self.registry.despawn_actor(entity);
            None
        }
    }

    /// Unlink `entity` from the grid and destroy it immediately. Not for use
    /// while a tick is dispatching; see [`World::queue_removal`].
    pub fn remove_actor(&mut self, entity: Entity) -> bool {
        self.unlink_actor(entity);
        self.pending_removal.retain(|&e| e != entity);
        if self.player == Some(entity) {
            self.player = None;
        }
        self.registry.despawn_actor(entity)
    }

    /// Unlink `entity` from the grid now and settle it at the end of the
    /// tick: the player respawns, everyone else is destroyed.
    pub fn queue_removal(&mut self, entity: Entity) {
        if !self.registry.contains(entity) {
            return;
        }
        self.unlink_actor(entity);
        self.registry.set_position(entity, Point::NOWHERE);
        if !self.pending_removal.contains(&entity) {
            self.pending_removal.push(entity);
        }
    }

    fn unlink_actor(&mut self, entity: Entity) {
        let Some(from) = self.registry.position(entity) else {
            return;
        };
        if let Some(tile) = self.grid.at_mut(&from) {
            if tile.actor == Some(entity) {
                tile.actor = None;
            }
        }
    }

    /// Put a new item of definition `def` on the ground at `at`. Fails for
    /// an unknown definition, an off-map point or a cell that already holds
    /// an item.
    pub fn place_item(&mut self, def: i32, at: Point) -> bool {
        if self.defs.item(def).is_none() {
            return false;
        }
        match self.grid.at_mut(&at) {
            Some(tile) if tile.item.is_none() => {
                tile.item = Some(Item::new(def));
                true
            }
            _ => false,
        }
    }

    /// Move the item at `from` to `to`
    pub fn move_item(&mut self, from: Point, to: Point) -> bool {
        if from == to {
            return self.grid.at(&from).item.is_some();
        }
        if !self.grid.valid(&to) || self.grid.at(&to).item.is_some() {
            return false;
        }
        let Some(item) = self.remove_item(from) else {
            return false;
        };
        if let Some(tile) = self.grid.at_mut(&to) {
            tile.item = Some(item);
        }
        true
    }

    /// Take the item off the ground at `at`
    pub fn remove_item(&mut self, at: Point) -> Option<Item> {
        self.grid.at_mut(&at).and_then(|tile| tile.item.take())
    }

    /// Change the terrain at `p`. A cell inside a room re-classifies it.
    pub fn set_terrain(&mut self, p: Point, terrain: i32) {
        let Some(tile) = self.grid.at_mut(&p) else {
            return;
        };
        tile.terrain = terrain;
        let room = tile.room;
        if let Some(room) = room {
            self.update_room(room);
        }
    }

    /// Set or clear the building overlay at `p`. A cell inside a room
    /// re-classifies it.
    pub fn set_building(&mut self, p: Point, building: Option<i32>) {
        let Some(tile) = self.grid.at_mut(&p) else {
            return;
        };
        tile.building = building;
        let room = tile.room;
        if let Some(room) = room {
            self.update_room(room);
        }
    }

    /// Where an item dropped at `near` would land: `near` itself if it has
    /// no item, else the first neighbour (clockwise from north) that is not
    /// solid, has no item and holds no plant. `Point::NOWHERE` if none.
    pub fn find_drop_space(&self, near: Point) -> Point {
        if !self.grid.valid(&near) {
            return Point::NOWHERE;
        }
        if self.grid.at(&near).item.is_none() {
            return near;
        }
        Direction::ALL
            .iter()
            .map(|&dir| near.step(dir))
            .find(|p| self.can_drop_at(p))
            .unwrap_or(Point::NOWHERE)
    }

    fn can_drop_at(&self, p: &Point) -> bool {
        if !self.grid.valid(p) {
            return false;
        }
        let tile = self.grid.at(p);
        if tile.item.is_some() || self.defs.is_solid(tile.terrain) {
            return false;
        }
        match tile.actor {
            Some(actor) => !self.is_immobile(actor),
            None => true,
        }
    }

    fn is_immobile(&self, entity: Entity) -> bool {
        self.registry
            .actor(entity)
            .and_then(|a| self.defs.actor_kind(a.def))
            .map(|kind| kind.is_immobile())
            .unwrap_or(false)
    }

    /// Closest cell within `radius` of `from` holding item `item`. Ties go
    /// to the first cell in row-major order.
    pub fn find_item_nearest(&self, from: Point, item: i32, radius: i32) -> Point {
        self.nearest(from, radius, |_, tile| {
            tile.item.map(|i| i.def == item).unwrap_or(false)
        })
    }

    /// Closest mobile actor within `radius` of `from`, skipping actors of
    /// `exclude_faction` when one is given. Ties go to the first cell in
    /// row-major order.
    pub fn find_actor_nearest(&self, from: Point, exclude_faction: Option<i32>, radius: i32) -> Point {
        self.nearest(from, radius, |world, tile| {
            let Some(entity) = tile.actor else {
                return false;
            };
            let Some(actor) = world.registry.actor(entity) else {
                return false;
            };
            if world.is_immobile(entity) {
                return false;
            }
            exclude_faction.map(|f| actor.faction != f).unwrap_or(true)
        })
    }

    fn nearest<F>(&self, from: Point, radius: i32, matches: F) -> Point
    where
        F: Fn(&World, &crate::components::Tile) -> bool,
    {
        let mut best = Point::NOWHERE;
        let mut best_distance = i64::MAX;
        for p in self.grid.square_around(from, radius) {
            if !matches(self, self.grid.at(&p)) {
                continue;
            }
            let distance = p.distance_squared(&from);
            if distance < best_distance {
                best = p;
                best_distance = distance;
            }
        }
        best
    }

    /// Step `entity` one cell in `dir`. When blocked and `allow_sidestep`
    /// is set, try the directions 45 degrees either side (clockwise first),
    /// without sidestepping further.
    pub fn try_move_actor(&mut self, entity: Entity, dir: Direction, allow_sidestep: bool) -> bool {
        let Some(from) = self.registry.position(entity) else {
            return false;
        };
        if !self.grid.valid(&from) {
            return false;
        }
        let dest = from.step(dir);
        if dir != Direction::None && self.is_passable(&dest) {
            return self.move_actor(entity, dest);
        }
        if !allow_sidestep {
            return false;
        }
        self.try_move_actor(entity, dir.rotate45(), false)
            || self.try_move_actor(entity, dir.unrotate45(), false)
    }
}

#[cfg(test)]
mod tests {
    use crate::components::{Direction, Point};
    use crate::testing::{actors, items, open_world, tiles};

    #[test]
    fn test_move_actor_links_both_ways() {
        let mut world = open_world(5, 5);
        let wolf = world.spawn_actor(actors::WOLF, Point::new(1, 1)).unwrap();
        assert!(world.move_actor(wolf, Point::new(2, 2)));
        assert_eq!(world.position(wolf), Some(Point::new(2, 2)));
        assert_eq!(world.actor_at(&Point::new(2, 2)), Some(wolf));
        assert_eq!(world.actor_at(&Point::new(1, 1)), None);
    }

    #[test]
    fn test_move_actor_into_occupied_cell_fails() {
        let mut world = open_world(5, 5);
        let a = world.spawn_actor(actors::WOLF, Point::new(1, 1)).unwrap();
        let b = world.spawn_actor(actors::VILLAGER, Point::new(2, 1)).unwrap();
        assert!(!world.move_actor(a, Point::new(2, 1)));
        assert_eq!(world.position(a), Some(Point::new(1, 1)));
        assert_eq!(world.position(b), Some(Point::new(2, 1)));
        assert_eq!(world.actor_at(&Point::new(2, 1)), Some(b));
    }

    #[test]
    fn test_move_actor_off_map_fails() {
        let mut world = open_world(3, 3);
        let a = world.spawn_actor(actors::WOLF, Point::new(0, 0)).unwrap();
        assert!(!world.move_actor(a, Point::new(-1, 0)));
        assert_eq!(world.actor_at(&Point::new(0, 0)), Some(a));
    }

    #[test]
    fn test_spawn_sets_player() {
        let mut world = open_world(3, 3);
        assert!(world.player().is_none());
        let p = world.spawn_actor(actors::PLAYER, Point::new(1, 1)).unwrap();
        assert_eq!(world.player(), Some(p));
        assert_eq!(world.player_position(), Some(Point::new(1, 1)));
    }

    #[test]
    fn test_spawn_failure_allocates_nothing() {
        let mut world = open_world(3, 3);
        world.spawn_actor(actors::WOLF, Point::new(1, 1)).unwrap();
        assert!(world.spawn_actor(actors::WOLF, Point::new(1, 1)).is_none());
        assert!(world.spawn_actor(actors::WOLF, Point::new(7, 1)).is_none());
        assert!(world.spawn_actor(99, Point::new(0, 0)).is_none());
        assert_eq!(world.actors().len(), 1);
    }

    #[test]
    fn test_queue_removal_unlinks_but_keeps_entity() {
        let mut world = open_world(3, 3);
        let a = world.spawn_actor(actors::WOLF, Point::new(1, 1)).unwrap();
        world.queue_removal(a);
        assert_eq!(world.actor_at(&Point::new(1, 1)), None);
        assert_eq!(world.position(a), Some(Point::NOWHERE));
        assert_eq!(world.pending_removals(), &[a]);
        assert_eq!(world.actors().len(), 1);
    }

    #[test]
    fn test_remove_actor_is_immediate() {
        let mut world = open_world(3, 3);
        let p = world.spawn_actor(actors::PLAYER, Point::new(1, 1)).unwrap();
        assert!(world.remove_actor(p));
        assert!(world.actors().is_empty());
        assert!(world.player().is_none());
        assert_eq!(world.actor_at(&Point::new(1, 1)), None);
    }

    #[test]
    fn test_items_one_per_cell() {
        let mut world = open_world(3, 3);
        assert!(world.place_item(items::LOG, Point::new(0, 0)));
        assert!(!world.place_item(items::STONE, Point::new(0, 0)));
        assert!(!world.place_item(99, Point::new(1, 0)));
        assert!(!world.place_item(items::LOG, Point::new(5, 0)));

        assert!(world.place_item(items::STONE, Point::new(1, 0)));
        assert!(!world.move_item(Point::new(0, 0), Point::new(1, 0)));
        assert!(world.move_item(Point::new(0, 0), Point::new(2, 2)));
        assert_eq!(world.item_at(&Point::new(2, 2)).map(|i| i.def), Some(items::LOG));
        assert!(world.item_at(&Point::new(0, 0)).is_none());

        assert_eq!(world.remove_item(Point::new(1, 0)).map(|i| i.def), Some(items::STONE));
        assert!(world.remove_item(Point::new(1, 0)).is_none());
    }

    #[test]
    fn test_find_drop_space() {
        let mut world = open_world(3, 3);
        let centre = Point::new(1, 1);
        assert_eq!(world.find_drop_space(centre), centre);

        world.place_item(items::LOG, centre);
        // north is solid, northeast holds a plant, east is taken by an item
        world.set_terrain(Point::new(1, 0), tiles::WALL);
        world.spawn_actor(actors::TREE, Point::new(2, 0)).unwrap();
        world.place_item(items::STONE, Point::new(2, 1));
        world.spawn_actor(actors::WOLF, Point::new(2, 2)).unwrap();
        assert_eq!(world.find_drop_space(centre), Point::new(2, 2));
    }

    #[test]
    fn test_find_drop_space_nowhere() {
        let mut world = open_world(1, 1);
        world.place_item(items::LOG, Point::new(0, 0));
        assert_eq!(world.find_drop_space(Point::new(0, 0)), Point::NOWHERE);
        assert_eq!(world.find_drop_space(Point::new(4, 4)), Point::NOWHERE);
    }

    #[test]
    fn test_find_item_nearest() {
        let mut world = open_world(9, 9);
        let from = Point::new(4, 4);
        assert_eq!(world.find_item_nearest(from, items::BERRY, 3), Point::NOWHERE);
        world.place_item(items::BERRY, Point::new(6, 4));
        world.place_item(items::BERRY, Point::new(2, 4));
        world.place_item(items::LOG, Point::new(4, 5));
        // both berries are two cells away; row-major scan reaches (2,4) first
        assert_eq!(world.find_item_nearest(from, items::BERRY, 3), Point::new(2, 4));
        assert_eq!(world.find_item_nearest(from, items::BERRY, 1), Point::NOWHERE);
    }

    #[test]
    fn test_find_actor_nearest_filters() {
        let mut world = open_world(9, 9);
        let from = Point::new(4, 4);
        world.spawn_actor(actors::WOLF, from).unwrap();
        world.spawn_actor(actors::TREE, Point::new(4, 5)).unwrap();
        world.spawn_actor(actors::WOLF, Point::new(5, 5)).unwrap();
        world.spawn_actor(actors::VILLAGER, Point::new(7, 7)).unwrap();

        // own faction (1) and plants are skipped
        assert_eq!(world.find_actor_nearest(from, Some(1), 8), Point::new(7, 7));
        assert_eq!(world.find_actor_nearest(from, Some(1), 2), Point::NOWHERE);
        // without a faction filter the searcher finds itself
        assert_eq!(world.find_actor_nearest(from, None, 8), from);
    }

    #[test]
    fn test_try_move_sidesteps_once() {
        let mut world = open_world(5, 5);
        let a = world.spawn_actor(actors::VILLAGER, Point::new(2, 2)).unwrap();
        world.set_terrain(Point::new(2, 1), tiles::WALL);

        assert!(!world.try_move_actor(a, Direction::North, false));
        assert_eq!(world.position(a), Some(Point::new(2, 2)));

        assert!(world.try_move_actor(a, Direction::North, true));
        assert_eq!(world.position(a), Some(Point::new(3, 1)));
    }

    #[test]
    fn test_try_move_falls_back_counter_clockwise() {
        let mut world = open_world(5, 5);
        let a = world.spawn_actor(actors::VILLAGER, Point::new(2, 2)).unwrap();
        world.set_terrain(Point::new(2, 1), tiles::WALL);
        world.set_terrain(Point::new(3, 1), tiles::WATER);
        assert!(world.try_move_actor(a, Direction::North, true));
        assert_eq!(world.position(a), Some(Point::new(1, 1)));
    }

    #[test]
    fn test_try_move_fully_blocked() {
        let mut world = open_world(5, 5);
        let a = world.spawn_actor(actors::VILLAGER, Point::new(2, 2)).unwrap();
        for x in 1..=3 {
            world.set_terrain(Point::new(x, 1), tiles::WALL);
        }
        assert!(!world.try_move_actor(a, Direction::North, true));
        assert_eq!(world.position(a), Some(Point::new(2, 2)));
    }
}
