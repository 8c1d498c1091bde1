//! Definitions table - immutable templates for actors, items, tiles,
//! recipes and rooms.
//!
//! Tables are append-only and keyed by a small non-negative integer
//! `ident`. Lookups return `None` for unknown idents; nothing in the core
//! mutates a record once it has been added.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::DefinitionError;

/// AI behaviour of an actor, one variant per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// Driven by the player, no AI
    Player,
    /// Wanders at random
    Villager,
    /// Hunts actors of other factions
    Monster,
    /// Seeks out its food item
    Animal,
    /// Immobile; grows into another definition over time
    Plant,
}

impl ActorKind {
    /// Plants never move and are ignored by actor searches
    pub fn is_immobile(&self) -> bool {
        matches!(self, ActorKind::Plant)
    }
}

/// One possible drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootRow {
    /// `ItemDef` ident
    pub ident: i32,
    /// Percent chance (0-100) that this row drops at all
    pub chance: i32,
    pub min: i32,
    pub max: i32,
}

/// Probabilistic drop table, each row rolled independently
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootTable {
    pub rows: Vec<LootRow>,
}

impl LootTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn default_glyph() -> char {
    '?'
}

fn default_colour() -> u32 {
    0xFFFF_FFFF
}

fn default_one() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDef {
    pub ident: i32,
    pub name: String,
    #[serde(default = "default_glyph")]
    pub glyph: char,
    #[serde(default = "default_colour")]
    pub colour: u32,
    pub kind: ActorKind,
    #[serde(default)]
    pub faction: i32,
    #[serde(default = "default_one")]
    pub health: i32,
    /// Chance per thousand of acting on a given tick
    #[serde(default)]
    pub move_chance: u32,
    /// Definition this actor turns into once `grow_time` has passed
    #[serde(default)]
    pub grow_to: Option<i32>,
    #[serde(default)]
    pub grow_time: i32,
    /// Item an animal seeks out and eats
    #[serde(default)]
    pub food_item: Option<i32>,
    #[serde(default)]
    pub base_damage: i32,
    #[serde(default)]
    pub loot: Option<LootTable>,
}

impl ActorDef {
    pub fn new(ident: i32, name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            ident,
            name: name.into(),
            glyph: default_glyph(),
            colour: default_colour(),
            kind,
            faction: 0,
            health: 1,
            move_chance: 0,
            grow_to: None,
            grow_time: 0,
            food_item: None,
            base_damage: 0,
            loot: None,
        }
    }

    pub fn with_faction(mut self, faction: i32) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_move_chance(mut self, move_chance: u32) -> Self {
        self.move_chance = move_chance;
        self
    }

    pub fn with_damage(mut self, base_damage: i32) -> Self {
        self.base_damage = base_damage;
        self
    }

    pub fn with_growth(mut self, grow_to: i32, grow_time: i32) -> Self {
        self.grow_to = Some(grow_to);
        self.grow_time = grow_time;
        self
    }

    pub fn with_food(mut self, food_item: i32) -> Self {
        self.food_item = Some(food_item);
        self
    }

    pub fn with_loot(mut self, loot: LootTable) -> Self {
        self.loot = Some(loot);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub ident: i32,
    pub name: String,
    #[serde(default)]
    pub plural: String,
    #[serde(default = "default_glyph")]
    pub glyph: char,
    #[serde(default = "default_colour")]
    pub colour: u32,
    /// Actor planted when this item is used
    #[serde(default)]
    pub seed_for: Option<i32>,
    /// Terrain built when this item is used
    #[serde(default)]
    pub constructs: Option<i32>,
}

impl ItemDef {
    pub fn new(ident: i32, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ident,
            plural: format!("{}s", name),
            name,
            glyph: default_glyph(),
            colour: default_colour(),
            seed_for: None,
            constructs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    pub ident: i32,
    pub name: String,
    #[serde(default = "default_glyph")]
    pub glyph: char,
    #[serde(default = "default_colour")]
    pub colour: u32,
    /// Blocks movement
    #[serde(default)]
    pub solid: bool,
    /// Blocks sight
    #[serde(default)]
    pub opaque: bool,
    /// Bounds a room during flood fill
    #[serde(default)]
    pub is_wall: bool,
    /// Can be planted or built on
    #[serde(default)]
    pub ground: bool,
    /// Terrain this becomes when opened/closed
    #[serde(default)]
    pub door_to: Option<i32>,
    /// Terrain this becomes when broken
    #[serde(default)]
    pub break_to: Option<i32>,
    #[serde(default)]
    pub loot: Option<LootTable>,
}

impl TileDef {
    pub fn new(ident: i32, name: impl Into<String>) -> Self {
        Self {
            ident,
            name: name.into(),
            glyph: default_glyph(),
            colour: default_colour(),
            solid: false,
            opaque: false,
            is_wall: false,
            ground: false,
            door_to: None,
            break_to: None,
            loot: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRow {
    pub qty: i32,
    /// `ItemDef` ident
    pub ident: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDef {
    pub ident: i32,
    pub make_ident: i32,
    #[serde(default = "default_one")]
    pub make_qty: i32,
    /// Bitmask of stations required; zero means craftable anywhere
    #[serde(default)]
    pub crafting_station: u32,
    #[serde(default)]
    pub parts: Vec<RecipeRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDef {
    pub ident: i32,
    pub name: String,
    /// Higher value wins when several definitions match
    #[serde(default)]
    pub value: i32,
    /// Terrain idents that must all appear inside the room
    #[serde(default)]
    pub requirements: Vec<i32>,
}

/// On-disk shape of a definitions file
#[derive(Debug, Default, Deserialize)]
struct DefinitionFile {
    #[serde(default)]
    actors: Vec<ActorDef>,
    #[serde(default)]
    items: Vec<ItemDef>,
    #[serde(default)]
    tiles: Vec<TileDef>,
    #[serde(default)]
    recipes: Vec<RecipeDef>,
    #[serde(default)]
    rooms: Vec<RoomDef>,
}

/// Append-only catalog keyed by ident, preserving insertion order
#[derive(Debug, Clone)]
struct Table<T> {
    kind: &'static str,
    records: Vec<T>,
    index: HashMap<i32, usize>,
}

impl<T> Table<T> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, ident: i32, record: T) -> Result<(), DefinitionError> {
        if ident < 0 {
            return Err(DefinitionError::NegativeIdent {
                kind: self.kind,
                ident,
            });
        }
        if self.index.contains_key(&ident) {
            return Err(DefinitionError::DuplicateIdent {
                kind: self.kind,
                ident,
            });
        }
        self.index.insert(ident, self.records.len());
        self.records.push(record);
        Ok(())
    }

    fn get(&self, ident: i32) -> Option<&T> {
        self.index.get(&ident).and_then(|&i| self.records.get(i))
    }
}

/// All definition tables, loaded once and passed around by reference
#[derive(Debug, Clone)]
pub struct Definitions {
    actors: Table<ActorDef>,
    items: Table<ItemDef>,
    tiles: Table<TileDef>,
    recipes: Table<RecipeDef>,
    rooms: Table<RoomDef>,
}

impl Default for Definitions {
    fn default() -> Self {
        Self::new()
    }
}

impl Definitions {
    pub fn new() -> Self {
        Self {
            actors: Table::new("actor"),
            items: Table::new("item"),
            tiles: Table::new("tile"),
            recipes: Table::new("recipe"),
            rooms: Table::new("room"),
        }
    }

    /// Parse a JSON definitions file (`actors`, `items`, `tiles`, `recipes`,
    /// `rooms` arrays, all optional).
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        let file: DefinitionFile = serde_json::from_str(json)?;
        let mut defs = Self::new();
        for def in file.actors {
            defs.add_actor(def)?;
        }
        for def in file.items {
            defs.add_item(def)?;
        }
        for def in file.tiles {
            defs.add_tile(def)?;
        }
        for def in file.recipes {
            defs.add_recipe(def)?;
        }
        for def in file.rooms {
            defs.add_room(def)?;
        }
        log::debug!(
            "loaded definitions: {} actors, {} items, {} tiles, {} recipes, {} rooms",
            defs.actor_count(),
            defs.item_count(),
            defs.tile_count(),
            defs.recipe_count(),
            defs.room_count()
        );
        Ok(defs)
    }

    pub fn add_actor(&mut self, def: ActorDef) -> Result<(), DefinitionError> {
        self.actors.insert(def.ident, def)
    }

    pub fn add_item(&mut self, def: ItemDef) -> Result<(), DefinitionError> {
        self.items.insert(def.ident, def)
    }

    pub fn add_tile(&mut self, def: TileDef) -> Result<(), DefinitionError> {
        self.tiles.insert(def.ident, def)
    }

    pub fn add_recipe(&mut self, def: RecipeDef) -> Result<(), DefinitionError> {
        self.recipes.insert(def.ident, def)
    }

    pub fn add_room(&mut self, def: RoomDef) -> Result<(), DefinitionError> {
        self.rooms.insert(def.ident, def)
    }

    pub fn actor(&self, ident: i32) -> Option<&ActorDef> {
        self.actors.get(ident)
    }

    pub fn item(&self, ident: i32) -> Option<&ItemDef> {
        self.items.get(ident)
    }

    pub fn tile(&self, ident: i32) -> Option<&TileDef> {
        self.tiles.get(ident)
    }

    pub fn recipe(&self, ident: i32) -> Option<&RecipeDef> {
        self.recipes.get(ident)
    }

    pub fn room(&self, ident: i32) -> Option<&RoomDef> {
        self.rooms.get(ident)
    }

    pub fn actors(&self) -> &[ActorDef] {
        &self.actors.records
    }

    pub fn items(&self) -> &[ItemDef] {
        &self.items.records
    }

    pub fn tiles(&self) -> &[TileDef] {
        &self.tiles.records
    }

    pub fn recipes(&self) -> &[RecipeDef] {
        &self.recipes.records
    }

    /// Room definitions in table order (classification tie-breaks on it)
    pub fn rooms(&self) -> &[RoomDef] {
        &self.rooms.records
    }

    pub fn actor_count(&self) -> usize {
        self.actors.records.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.records.len()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.records.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.records.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.records.len()
    }

    /// Recipes whose station requirements are all present in `stations`
    pub fn recipes_for(&self, stations: u32) -> Vec<&RecipeDef> {
        self.recipes
            .records
            .iter()
            .filter(|r| r.crafting_station & stations == r.crafting_station)
            .collect()
    }

    /// Whether terrain `ident` blocks movement. Unknown terrain does not.
    pub fn is_solid(&self, ident: i32) -> bool {
        self.tile(ident).map(|t| t.solid).unwrap_or(false)
    }

    /// Whether terrain `ident` bounds a room. Unknown terrain does not.
    pub fn is_wall(&self, ident: i32) -> bool {
        self.tile(ident).map(|t| t.is_wall).unwrap_or(false)
    }

    /// Kind of actor definition `ident`, if it exists
    pub fn actor_kind(&self, ident: i32) -> Option<ActorKind> {
        self.actor(ident).map(|d| d.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_missing() {
        let mut defs = Definitions::new();
        defs.add_item(ItemDef::new(3, "log")).unwrap();
        assert_eq!(defs.item(3).map(|d| d.name.as_str()), Some("log"));
        assert!(defs.item(4).is_none());
        assert!(defs.item(-1).is_none());
    }

    #[test]
    fn test_rejects_duplicates_and_negatives() {
        let mut defs = Definitions::new();
        defs.add_tile(TileDef::new(0, "grass")).unwrap();
        assert!(matches!(
            defs.add_tile(TileDef::new(0, "dirt")),
            Err(DefinitionError::DuplicateIdent { ident: 0, .. })
        ));
        assert!(matches!(
            defs.add_tile(TileDef::new(-1, "void")),
            Err(DefinitionError::NegativeIdent { ident: -1, .. })
        ));
        assert_eq!(defs.tile_count(), 1);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "actors": [
                { "ident": 1, "name": "you", "kind": "player", "health": 10 },
                { "ident": 2, "name": "wolf", "kind": "monster", "faction": 4,
                  "move_chance": 500, "base_damage": 2,
                  "loot": { "rows": [ { "ident": 0, "chance": 50, "min": 1, "max": 2 } ] } }
            ],
            "items": [ { "ident": 0, "name": "hide" } ],
            "tiles": [ { "ident": 0, "name": "grass", "ground": true },
                       { "ident": 1, "name": "wall", "solid": true, "is_wall": true } ],
            "rooms": [ { "ident": 0, "name": "room" } ]
        }"#;
        let defs = Definitions::from_json_str(json).unwrap();
        let wolf = defs.actor(2).unwrap();
        assert_eq!(wolf.kind, ActorKind::Monster);
        assert_eq!(wolf.glyph, '?');
        assert_eq!(wolf.loot.as_ref().map(|l| l.rows.len()), Some(1));
        assert!(defs.is_solid(1));
        assert!(defs.is_wall(1));
        assert!(!defs.is_solid(0));
        assert!(!defs.is_solid(99));
        assert_eq!(defs.recipe_count(), 0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Definitions::from_json_str("{ \"actors\": [ { \"ident\": 1 } ] }"),
            Err(DefinitionError::Parse(_))
        ));
    }

    #[test]
    fn test_recipes_for_stations() {
        let mut defs = Definitions::new();
        let recipe = |ident, station| RecipeDef {
            ident,
            make_ident: 0,
            make_qty: 1,
            crafting_station: station,
            parts: Vec::new(),
        };
        defs.add_recipe(recipe(0, 0)).unwrap();
        defs.add_recipe(recipe(1, 0b01)).unwrap();
        defs.add_recipe(recipe(2, 0b11)).unwrap();

        let idents = |stations| -> Vec<i32> {
            defs.recipes_for(stations).iter().map(|r| r.ident).collect()
        };
        assert_eq!(idents(0), vec![0]);
        assert_eq!(idents(0b01), vec![0, 1]);
        assert_eq!(idents(0b11), vec![0, 1, 2]);
    }

    #[test]
    fn test_immobile_kinds() {
        assert!(ActorKind::Plant.is_immobile());
        assert!(!ActorKind::Animal.is_immobile());
    }
}
