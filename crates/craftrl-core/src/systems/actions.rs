//! Player commands. Each returns `true` when it used up the player's turn,
//! after which the driver calls [`World::tick`].

use hecs::Entity;

use crate::components::{Direction, Point};
use crate::definitions::ActorKind;
use crate::world::World;

impl World {
    fn player_and_position(&self) -> Option<(Entity, Point)> {
        let player = self.player?;
        let pos = self.registry.position(player)?;
        self.grid.valid(&pos).then_some((player, pos))
    }

    /// Step without sidestepping, picking up whatever is on the new cell
    pub fn player_move(&mut self, dir: Direction) -> bool {
        let Some((player, _)) = self.player_and_position() else {
            return false;
        };
        if dir == Direction::None {
            self.add_log_msg("Canceled.");
            return false;
        }
        if !self.try_move_actor(player, dir, false) {
            self.add_log_msg("Blocked.");
            return false;
        }
        if let Some(pos) = self.registry.position(player) {
            if self.grid.at(&pos).item.is_some() {
                self.player_take();
            }
        }
        true
    }

    /// Pick up the item under the player
    pub fn player_take(&mut self) -> bool {
        let Some((player, pos)) = self.player_and_position() else {
            return false;
        };
        let Some(item) = self.grid.at(&pos).item else {
            self.add_log_msg("Nothing to take.");
            return false;
        };
        let name = self
            .defs
            .item(item.def)
            .map(|d| d.name.clone())
            .unwrap_or_default();
        let Some(inventory) = self.registry.inventory_mut(player) else {
            return false;
        };
        if !inventory.add(item.def, 1) {
            return false;
        }
        self.remove_item(pos);
        self.add_log_msg(format!("Took {}.", name));
        true
    }

    /// Put one `item` from the player's inventory on the ground nearby
    pub fn player_drop(&mut self, item: i32) -> bool {
        let Some((player, pos)) = self.player_and_position() else {
            return false;
        };
        let carried = self.registry.inventory(player).map(|i| i.qty(item)).unwrap_or(0);
        let Some(name) = self.defs.item(item).map(|d| d.name.clone()) else {
            self.add_log_msg("Nothing to drop.");
            return false;
        };
        if carried <= 0 {
            self.add_log_msg("Nothing to drop.");
            return false;
        }

        let drop_at = self.find_drop_space(pos);
        if !self.grid.valid(&drop_at) || !self.place_item(item, drop_at) {
            self.add_log_msg("No space to drop item.");
            return false;
        }
        if let Some(inventory) = self.registry.inventory_mut(player) {
            inventory.remove(item, 1);
        }
        self.add_log_msg(format!("Dropped {}.", name));
        true
    }

    /// Break a plant, kill an animal or break the terrain in `dir`
    pub fn player_attack(&mut self, dir: Direction) -> bool {
        let Some((_, pos)) = self.player_and_position() else {
            return false;
        };
        if dir == Direction::None {
            self.add_log_msg("Canceled.");
            return false;
        }
        let dest = pos.step(dir);

        if let Some(target) = self.grid.at(&dest).actor {
            let Some(def) = self.actor_def(target).cloned() else {
                return false;
            };
            let verb = match def.kind {
                ActorKind::Plant => "Broke",
                ActorKind::Animal => "Killed",
                ActorKind::Player | ActorKind::Villager | ActorKind::Monster => {
                    self.add_log_msg("Can't attack that.");
                    return false;
                }
            };
            self.add_log_msg(format!("{} {}.", verb, def.name));
            self.remove_actor(target);
            if let Some(loot) = &def.loot {
                self.make_loot_at(loot, dest, true);
            }
            return true;
        }

        let Some(tile_def) = self.tile_def_at(&dest).cloned() else {
            self.add_log_msg("Nothing to attack.");
            return false;
        };
        let Some(break_to) = tile_def.break_to else {
            self.add_log_msg("Nothing to attack.");
            return false;
        };
        self.set_terrain(dest, break_to);
        self.add_log_msg("Broken.");
        if let Some(loot) = &tile_def.loot {
            self.make_loot_at(loot, dest, true);
        }
        true
    }

    /// Open or close whatever is in `dir`
    pub fn player_interact(&mut self, dir: Direction) -> bool {
        self.interact(dir, false)
    }

    fn interact(&mut self, dir: Direction, silent: bool) -> bool {
        let Some((_, pos)) = self.player_and_position() else {
            return false;
        };
        if dir == Direction::None {
            self.add_log_msg("Canceled.");
            return false;
        }
        let dest = pos.step(dir);

        if let Some(actor) = self.grid.at(&dest).actor {
            let name = self.actor_def(actor).map(|d| d.name.clone()).unwrap_or_default();
            self.add_log_msg(format!("{} is in the way.", name));
            return false;
        }
        match self.tile_def_at(&dest).and_then(|t| t.door_to) {
            Some(door_to) => {
                self.set_terrain(dest, door_to);
                if !silent {
                    self.add_log_msg("Done.");
                }
                true
            }
            None => {
                if !silent {
                    self.add_log_msg("Nothing to do.");
                }
                false
            }
        }
    }

    /// Use one `item` on the cell in `dir`: a seed plants its actor, a
    /// construction item builds its terrain. The cell must be clear ground.
    pub fn player_use(&mut self, item: i32, dir: Direction) -> bool {
        let Some((player, pos)) = self.player_and_position() else {
            return false;
        };
        let carried = self.registry.inventory(player).map(|i| i.qty(item)).unwrap_or(0);
        let Some(item_def) = self.defs.item(item).cloned() else {
            self.add_log_msg("Nothing to use.");
            return false;
        };
        if carried <= 0 {
            self.add_log_msg("Nothing to use.");
            return false;
        }
        if item_def.seed_for.is_none() && item_def.constructs.is_none() {
            self.add_log_msg("That's not something you can use.");
            return false;
        }
        if dir == Direction::None {
            self.add_log_msg("Canceled.");
            return false;
        }

        let dest = pos.step(dir);
        let tile = self.grid.at(&dest);
        let ground = self.tile_def_at(&dest).map(|t| t.ground).unwrap_or(false);
        if !ground || tile.actor.is_some() || tile.item.is_some() {
            self.add_log_msg("The space isn't clear.");
            return false;
        }

        if let Some(plant) = item_def.seed_for {
            if self.spawn_actor(plant, dest).is_none() {
                log::warn!("{} plants unknown actor definition {}", item_def.name, plant);
                self.add_log_msg("Nothing happens.");
                return false;
            }
        } else if let Some(terrain) = item_def.constructs {
            self.set_terrain(dest, terrain);
        }
        if let Some(inventory) = self.registry.inventory_mut(player) {
            inventory.remove(item, 1);
        }
        true
    }

    /// Say hello to whoever is in `dir`
    pub fn player_talk(&mut self, dir: Direction) -> bool {
        self.talk(dir, false)
    }

    fn talk(&mut self, dir: Direction, silent: bool) -> bool {
        let Some((_, pos)) = self.player_and_position() else {
            return false;
        };
        if dir == Direction::None {
            self.add_log_msg("Canceled.");
            return false;
        }
        let dest = pos.step(dir);
        if !self.grid.valid(&dest) {
            return false;
        }
        let Some(actor) = self.grid.at(&dest).actor else {
            if !silent {
                self.add_log_msg("No one to talk to!");
            }
            return false;
        };
        let msg = match self.actor_def(actor) {
            Some(def) if def.kind == ActorKind::Villager => format!("{}: \"Hello!\"", def.name),
            _ => "Can't talk to that!".to_string(),
        };
        self.add_log_msg(msg);
        false
    }

    /// Bump in `dir`: talk to an actor, work solid terrain, or walk
    pub fn player_context_move(&mut self, dir: Direction) -> bool {
        let Some((_, pos)) = self.player_and_position() else {
            return false;
        };
        if dir == Direction::None {
            self.add_log_msg("Canceled.");
            return false;
        }
        let dest = pos.step(dir);
        if !self.grid.valid(&dest) {
            return false;
        }
        if self.grid.at(&dest).actor.is_some() {
            return self.talk(dir, true);
        }
        if self.defs.is_solid(self.grid.at(&dest).terrain) {
            return self.interact(dir, true);
        }
        self.player_move(dir)
    }

    /// Pass the turn
    pub fn player_wait(&mut self) -> bool {
        true
    }

    /// Move `qty` of `item` from one actor's inventory to another's.
    /// Nothing changes unless `from` carries enough.
    pub fn trade(&mut self, from: Entity, to: Entity, item: i32, qty: i32) -> bool {
        if from == to || qty <= 0 || self.registry.inventory(to).is_none() {
            return false;
        }
        let removed = self
            .registry
            .inventory_mut(from)
            .map(|inv| inv.remove(item, qty))
            .unwrap_or(false);
        if !removed {
            return false;
        }
        if let Some(inventory) = self.registry.inventory_mut(to) {
            inventory.add(item, qty);
        }
        true
    }

    /// Move everything `from` carries to `to`. Returns the number of
    /// stacks moved.
    pub fn trade_all(&mut self, from: Entity, to: Entity) -> usize {
        if from == to || self.registry.inventory(to).is_none() {
            return 0;
        }
        let rows = match self.registry.inventory_mut(from) {
            Some(inv) => inv.take_all(),
            None => return 0,
        };
        let moved = rows.len();
        if let Some(inventory) = self.registry.inventory_mut(to) {
            for row in rows {
                inventory.add(row.item, row.qty);
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use crate::components::{Direction, Point};
    use crate::testing::{actors, items, open_world, tiles};
    use crate::world::World;

    fn with_player(width: i32, height: i32) -> (World, hecs::Entity) {
        let mut world = open_world(width, height);
        let player = world.spawn_actor(actors::PLAYER, Point::new(2, 2)).unwrap();
        (world, player)
    }

    #[test]
    fn test_move_and_auto_take() {
        let (mut world, player) = with_player(5, 5);
        world.place_item(items::LOG, Point::new(3, 2));
        assert!(world.player_move(Direction::East));
        assert_eq!(world.position(player), Some(Point::new(3, 2)));
        assert!(world.item_at(&Point::new(3, 2)).is_none());
        assert_eq!(world.inventory(player).map(|i| i.qty(items::LOG)), Some(1));
        assert_eq!(world.log_msg(0), Some("Took log."));
    }

    #[test]
    fn test_move_blocked_does_not_sidestep() {
        let (mut world, player) = with_player(5, 5);
        world.set_terrain(Point::new(2, 1), tiles::WALL);
        assert!(!world.player_move(Direction::North));
        assert_eq!(world.position(player), Some(Point::new(2, 2)));
        assert_eq!(world.log_msg(0), Some("Blocked."));
    }

    #[test]
    fn test_take_nothing() {
        let (mut world, _) = with_player(5, 5);
        assert!(!world.player_take());
        assert_eq!(world.log_msg(0), Some("Nothing to take."));
    }

    #[test]
    fn test_drop() {
        let (mut world, player) = with_player(5, 5);
        assert!(!world.player_drop(items::STONE));
        assert_eq!(world.log_msg(0), Some("Nothing to drop."));

        world.inventory_mut(player).unwrap().add(items::STONE, 2);
        assert!(world.player_drop(items::STONE));
        assert_eq!(world.item_at(&Point::new(2, 2)).map(|i| i.def), Some(items::STONE));
        assert!(world.player_drop(items::STONE));
        assert_eq!(world.item_at(&Point::new(2, 1)).map(|i| i.def), Some(items::STONE));
        assert_eq!(world.inventory(player).map(|i| i.is_empty()), Some(true));
        assert_eq!(world.log_msg(0), Some("Dropped stone."));
    }

    #[test]
    fn test_drop_with_no_space() {
        let mut world = open_world(1, 1);
        let player = world.spawn_actor(actors::PLAYER, Point::new(0, 0)).unwrap();
        world.place_item(items::LOG, Point::new(0, 0));
        world.inventory_mut(player).unwrap().add(items::STONE, 1);
        assert!(!world.player_drop(items::STONE));
        assert_eq!(world.log_msg(0), Some("No space to drop item."));
        assert_eq!(world.inventory(player).map(|i| i.qty(items::STONE)), Some(1));
    }

    #[test]
    fn test_attack_plant_drops_loot() {
        let (mut world, _) = with_player(5, 5);
        let tree = world.spawn_actor(actors::TREE, Point::new(2, 1)).unwrap();
        assert!(world.player_attack(Direction::North));
        assert!(world.actor(tree).is_none());
        assert_eq!(world.actor_at(&Point::new(2, 1)), None);
        assert_eq!(world.item_at(&Point::new(2, 1)).map(|i| i.def), Some(items::LOG));
        assert_eq!(world.log_msg(1), Some("Broke tree."));
        assert_eq!(world.log_msg(0), Some("Dropped log. Dropped log."));
    }

    #[test]
    fn test_attack_refuses_villagers() {
        let (mut world, _) = with_player(5, 5);
        let v = world.spawn_actor(actors::STATUE, Point::new(3, 2)).unwrap();
        assert!(!world.player_attack(Direction::East));
        assert!(world.actor(v).is_some());
        assert_eq!(world.log_msg(0), Some("Can't attack that."));
    }

    #[test]
    fn test_attack_breaks_terrain() {
        let (mut world, _) = with_player(5, 5);
        world.set_terrain(Point::new(1, 2), tiles::WALL);
        assert!(world.player_attack(Direction::West));
        assert_eq!(world.at(&Point::new(1, 2)).terrain, tiles::DIRT);
        assert_eq!(world.item_at(&Point::new(1, 2)).map(|i| i.def), Some(items::STONE));

        assert!(!world.player_attack(Direction::East));
        assert_eq!(world.log_msg(0), Some("Nothing to attack."));
    }

    #[test]
    fn test_doors() {
        let (mut world, _) = with_player(5, 5);
        world.set_terrain(Point::new(2, 3), tiles::DOOR_CLOSED);
        assert!(world.player_interact(Direction::South));
        assert_eq!(world.at(&Point::new(2, 3)).terrain, tiles::DOOR_OPEN);
        assert_eq!(world.log_msg(0), Some("Done."));
        assert!(!world.player_interact(Direction::North));
        assert_eq!(world.log_msg(0), Some("Nothing to do."));
    }

    #[test]
    fn test_use_seed_and_construct() {
        let (mut world, player) = with_player(5, 5);
        {
            let inv = world.inventory_mut(player).unwrap();
            inv.add(items::SAPLING, 1);
            inv.add(items::WALL_KIT, 1);
            inv.add(items::LOG, 1);
        }
        assert!(world.player_use(items::SAPLING, Direction::North));
        let planted = world.actor_at(&Point::new(2, 1)).unwrap();
        assert_eq!(world.actor(planted).map(|a| a.def), Some(actors::SAPLING));

        assert!(!world.player_use(items::WALL_KIT, Direction::North));
        assert_eq!(world.log_msg(0), Some("The space isn't clear."));
        assert!(world.player_use(items::WALL_KIT, Direction::South));
        assert_eq!(world.at(&Point::new(2, 3)).terrain, tiles::WALL);

        assert!(!world.player_use(items::LOG, Direction::East));
        assert_eq!(world.log_msg(0), Some("That's not something you can use."));
        let inv = world.inventory(player).unwrap();
        assert_eq!(inv.qty(items::SAPLING), 0);
        assert_eq!(inv.qty(items::WALL_KIT), 0);
        assert_eq!(inv.qty(items::LOG), 1);
    }

    #[test]
    fn test_use_with_broken_seed_keeps_item() {
        let mut defs = crate::testing::standard_definitions();
        let mut seed = crate::definitions::ItemDef::new(40, "dud seed");
        seed.seed_for = Some(99);
        defs.add_item(seed).unwrap();
        let mut world = World::new(defs);
        world.alloc_map(5, 5);
        let player = world.spawn_actor(actors::PLAYER, Point::new(2, 2)).unwrap();
        world.inventory_mut(player).unwrap().add(40, 1);

        assert!(!world.player_use(40, Direction::North));
        assert_eq!(world.actor_at(&Point::new(2, 1)), None);
        assert_eq!(world.inventory(player).map(|i| i.qty(40)), Some(1));
        assert_eq!(world.log_msg(0), Some("Nothing happens."));
    }

    #[test]
    fn test_talk() {
        let (mut world, _) = with_player(5, 5);
        world.spawn_actor(actors::STATUE, Point::new(3, 2)).unwrap();
        world.spawn_actor(actors::WOLF, Point::new(1, 2)).unwrap();
        assert!(!world.player_talk(Direction::East));
        assert_eq!(world.log_msg(0), Some("statue: \"Hello!\""));
        assert!(!world.player_talk(Direction::West));
        assert_eq!(world.log_msg(0), Some("Can't talk to that!"));
        assert!(!world.player_talk(Direction::North));
        assert_eq!(world.log_msg(0), Some("No one to talk to!"));
    }

    #[test]
    fn test_context_move() {
        let (mut world, player) = with_player(5, 5);
        world.set_terrain(Point::new(2, 1), tiles::DOOR_CLOSED);
        world.spawn_actor(actors::STATUE, Point::new(3, 2)).unwrap();

        assert!(world.player_context_move(Direction::North));
        assert_eq!(world.at(&Point::new(2, 1)).terrain, tiles::DOOR_OPEN);
        assert_eq!(world.position(player), Some(Point::new(2, 2)));

        assert!(!world.player_context_move(Direction::East));
        assert_eq!(world.log_msg(0), Some("statue: \"Hello!\""));

        assert!(world.player_context_move(Direction::South));
        assert_eq!(world.position(player), Some(Point::new(2, 3)));
    }

    #[test]
    fn test_trade() {
        let (mut world, player) = with_player(5, 5);
        let villager = world.spawn_actor(actors::STATUE, Point::new(3, 3)).unwrap();
        world.inventory_mut(player).unwrap().add(items::LOG, 3);

        assert!(!world.trade(player, villager, items::LOG, 4));
        assert!(world.trade(player, villager, items::LOG, 2));
        assert_eq!(world.inventory(player).map(|i| i.qty(items::LOG)), Some(1));
        assert_eq!(world.inventory(villager).map(|i| i.qty(items::LOG)), Some(2));

        world.inventory_mut(player).unwrap().add(items::STONE, 5);
        assert_eq!(world.trade_all(player, villager), 2);
        assert_eq!(world.inventory(player).map(|i| i.is_empty()), Some(true));
        assert_eq!(world.inventory(villager).map(|i| i.qty(items::LOG)), Some(3));
        assert_eq!(world.inventory(villager).map(|i| i.qty(items::STONE)), Some(5));
    }
}
