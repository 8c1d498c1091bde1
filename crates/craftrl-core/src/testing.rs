//! Shared fixtures for unit and integration tests: a small, fixed set of
//! definitions and a helper that builds an open map.

use crate::definitions::{
    ActorDef, ActorKind, Definitions, ItemDef, LootRow, LootTable, RecipeDef, RecipeRow, RoomDef,
    TileDef,
};
use crate::world::World;

pub mod tiles {
    pub const GRASS: i32 = 0;
    pub const DIRT: i32 = 1;
    pub const WALL: i32 = 2;
    pub const DOOR_CLOSED: i32 = 3;
    pub const DOOR_OPEN: i32 = 4;
    pub const WATER: i32 = 5;
    pub const BED: i32 = 6;
    pub const WORKBENCH: i32 = 7;
    pub const FLOOR: i32 = 8;
}

pub mod items {
    pub const BERRY: i32 = 0;
    pub const LOG: i32 = 1;
    pub const STONE: i32 = 2;
    pub const SAPLING: i32 = 3;
    pub const PLANK: i32 = 4;
    pub const WALL_KIT: i32 = 5;
    pub const HIDE: i32 = 6;
}

pub mod actors {
    pub const PLAYER: i32 = 0;
    pub const VILLAGER: i32 = 1;
    pub const WOLF: i32 = 2;
    pub const RABBIT: i32 = 3;
    pub const SAPLING: i32 = 4;
    pub const TREE: i32 = 5;
    /// Plant whose growth target does not exist
    pub const BAD_SHRUB: i32 = 6;
    /// Villager that never acts
    pub const STATUE: i32 = 7;
}

pub mod rooms {
    pub const ROOM: i32 = 0;
    pub const BEDROOM: i32 = 1;
    pub const WORKSHOP: i32 = 2;
    /// Same value and requirements as the bedroom, listed after it
    pub const DORMITORY: i32 = 3;
}

pub mod recipes {
    pub const PLANKS: i32 = 0;
    pub const WALL_KIT: i32 = 1;
}

/// Station bit for recipes that need a workbench
pub const WORKBENCH_STATION: u32 = 0b01;

fn loot(rows: &[(i32, i32, i32, i32)]) -> LootTable {
    LootTable {
        rows: rows
            .iter()
            .map(|&(ident, chance, min, max)| LootRow {
                ident,
                chance,
                min,
                max,
            })
            .collect(),
    }
}

/// The definition set every test builds on
pub fn standard_definitions() -> Definitions {
    let mut defs = Definitions::new();

    let mut wall = TileDef::new(tiles::WALL, "wall");
    wall.solid = true;
    wall.opaque = true;
    wall.is_wall = true;
    wall.break_to = Some(tiles::DIRT);
    wall.loot = Some(loot(&[(items::STONE, 100, 1, 1)]));

    let mut door_closed = TileDef::new(tiles::DOOR_CLOSED, "closed door");
    door_closed.solid = true;
    door_closed.opaque = true;
    door_closed.is_wall = true;
    door_closed.door_to = Some(tiles::DOOR_OPEN);

    let mut door_open = TileDef::new(tiles::DOOR_OPEN, "open door");
    door_open.is_wall = true;
    door_open.door_to = Some(tiles::DOOR_CLOSED);

    let mut water = TileDef::new(tiles::WATER, "water");
    water.solid = true;

    let mut grass = TileDef::new(tiles::GRASS, "grass");
    grass.ground = true;
    let mut dirt = TileDef::new(tiles::DIRT, "dirt");
    dirt.ground = true;
    let mut floor = TileDef::new(tiles::FLOOR, "floor");
    floor.ground = true;
    let mut workbench = TileDef::new(tiles::WORKBENCH, "workbench");
    workbench.solid = true;

    for tile in [
        grass,
        dirt,
        wall,
        door_closed,
        door_open,
        water,
        TileDef::new(tiles::BED, "bed"),
        workbench,
        floor,
    ] {
        defs.add_tile(tile).expect("standard tile");
    }

    let mut sapling_item = ItemDef::new(items::SAPLING, "sapling");
    sapling_item.seed_for = Some(actors::SAPLING);
    let mut wall_kit = ItemDef::new(items::WALL_KIT, "wall kit");
    wall_kit.constructs = Some(tiles::WALL);
    let mut berry = ItemDef::new(items::BERRY, "berry");
    berry.plural = "berries".to_string();

    for item in [
        berry,
        ItemDef::new(items::LOG, "log"),
        ItemDef::new(items::STONE, "stone"),
        sapling_item,
        ItemDef::new(items::PLANK, "plank"),
        wall_kit,
        ItemDef::new(items::HIDE, "hide"),
    ] {
        defs.add_item(item).expect("standard item");
    }

    for actor in [
        ActorDef::new(actors::PLAYER, "player", ActorKind::Player)
            .with_health(10)
            .with_damage(2),
        ActorDef::new(actors::VILLAGER, "villager", ActorKind::Villager)
            .with_health(6)
            .with_move_chance(1000),
        ActorDef::new(actors::WOLF, "wolf", ActorKind::Monster)
            .with_faction(1)
            .with_health(6)
            .with_move_chance(1000)
            .with_damage(2)
            .with_loot(loot(&[(items::HIDE, 100, 1, 1)])),
        ActorDef::new(actors::RABBIT, "rabbit", ActorKind::Animal)
            .with_faction(2)
            .with_health(2)
            .with_move_chance(1000)
            .with_food(items::BERRY)
            .with_loot(loot(&[(items::HIDE, 100, 1, 1)])),
        ActorDef::new(actors::SAPLING, "sapling", ActorKind::Plant)
            .with_health(2)
            .with_move_chance(1000)
            .with_growth(actors::TREE, 3),
        ActorDef::new(actors::TREE, "tree", ActorKind::Plant)
            .with_health(4)
            .with_loot(loot(&[(items::LOG, 100, 2, 2)])),
        ActorDef::new(actors::BAD_SHRUB, "shrub", ActorKind::Plant)
            .with_health(2)
            .with_move_chance(1000)
            .with_growth(99, 1),
        ActorDef::new(actors::STATUE, "statue", ActorKind::Villager).with_health(8),
    ] {
        defs.add_actor(actor).expect("standard actor");
    }

    for recipe in [
        RecipeDef {
            ident: recipes::PLANKS,
            make_ident: items::PLANK,
            make_qty: 2,
            crafting_station: 0,
            parts: vec![RecipeRow {
                qty: 1,
                ident: items::LOG,
            }],
        },
        RecipeDef {
            ident: recipes::WALL_KIT,
            make_ident: items::WALL_KIT,
            make_qty: 1,
            crafting_station: WORKBENCH_STATION,
            parts: vec![
                RecipeRow {
                    qty: 2,
                    ident: items::PLANK,
                },
                RecipeRow {
                    qty: 1,
                    ident: items::STONE,
                },
            ],
        },
    ] {
        defs.add_recipe(recipe).expect("standard recipe");
    }

    let room = |ident, name: &str, value, requirements: Vec<i32>| RoomDef {
        ident,
        name: name.to_string(),
        value,
        requirements,
    };
    for def in [
        room(rooms::ROOM, "room", 0, Vec::new()),
        room(rooms::BEDROOM, "bedroom", 10, vec![tiles::BED]),
        room(rooms::WORKSHOP, "workshop", 20, vec![tiles::WORKBENCH]),
        room(rooms::DORMITORY, "dormitory", 10, vec![tiles::BED]),
    ] {
        defs.add_room(def).expect("standard room");
    }

    defs
}

/// A `width` x `height` map of grass using the standard definitions and a
/// fixed seed
pub fn open_world(width: i32, height: i32) -> World {
    let mut world = World::new(standard_definitions());
    world.seed(0x5EED);
    world.alloc_map(width, height);
    world
}

/// Surround the rectangle `(x0,y0)..=(x1,y1)` with walls. The interior is
/// left untouched.
pub fn wall_box(world: &mut World, x0: i32, y0: i32, x1: i32, y1: i32) {
    use crate::components::Point;
    for x in x0..=x1 {
        world.set_terrain(Point::new(x, y0), tiles::WALL);
        world.set_terrain(Point::new(x, y1), tiles::WALL);
    }
    for y in y0..=y1 {
        world.set_terrain(Point::new(x0, y), tiles::WALL);
        world.set_terrain(Point::new(x1, y), tiles::WALL);
    }
}
