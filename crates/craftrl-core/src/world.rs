//! World - the aggregate a driver talks to.
//!
//! Owns the grid, the entity registry, the definitions, the RNG, the clock
//! and the message log. Operations live in `systems/` as `impl World`
//! blocks grouped by concern; this module holds construction and the
//! read-only accessors used for rendering.

use hecs::{Entity, Ref};

use crate::clock::GameClock;
use crate::components::{actor_display_name, Actor, Inventory, Item, Point, Room, Tile, Vitals};
use crate::config::WorldConfig;
use crate::definitions::{ActorDef, Definitions, TileDef};
use crate::grid::TileGrid;
use crate::messages::MessageLog;
use crate::random::Random;
use crate::registry::Registry;

/// Tile-based simulation state
#[derive(Debug)]
pub struct World {
    pub(crate) grid: TileGrid,
    pub(crate) registry: Registry,
    pub(crate) defs: Definitions,
    pub(crate) rng: Random,
    pub(crate) clock: GameClock,
    pub(crate) log: MessageLog,
    pub(crate) player: Option<Entity>,
    pub(crate) config: WorldConfig,
    /// Actors unlinked this tick, destroyed (or respawned) when it ends
    pub(crate) pending_removal: Vec<Entity>,
}

impl World {
    /// Empty 0x0 world with the default rules
    pub fn new(defs: Definitions) -> Self {
        Self::with_config(defs, WorldConfig::default())
    }

    pub fn with_config(defs: Definitions, config: WorldConfig) -> Self {
        Self {
            grid: TileGrid::default(),
            registry: Registry::new(),
            defs,
            rng: Random::new(),
            clock: GameClock::from_config(&config),
            log: MessageLog::new(),
            player: None,
            config,
            pending_removal: Vec::new(),
        }
    }

    /// Tear down the current map and allocate a fresh `width` x `height`
    /// one with terrain 0 everywhere. The clock restarts and the log is
    /// cleared; the RNG keeps its state.
    pub fn alloc_map(&mut self, width: i32, height: i32) {
        self.grid = TileGrid::new(width, height, 0);
        self.registry.clear();
        self.player = None;
        self.pending_removal.clear();
        self.clock = GameClock::from_config(&self.config);
        self.log.clear();
        log::debug!("allocated {}x{} map", self.grid.width(), self.grid.height());
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn valid(&self, p: &Point) -> bool {
        self.grid.valid(p)
    }

    /// The cell at `p`, or the bad tile when `p` is off the map
    pub fn at(&self, p: &Point) -> &Tile {
        self.grid.at(p)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn defs(&self) -> &Definitions {
        &self.defs
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// RNG for world-population code
    pub fn rng(&mut self) -> &mut Random {
        &mut self.rng
    }

    pub fn seed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn turn(&self) -> u32 {
        self.clock.turn
    }

    /// (day, hour, minute)
    pub fn time(&self) -> (u32, u32, u32) {
        self.clock.time()
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn player_position(&self) -> Option<Point> {
        self.player
            .and_then(|p| self.registry.position(p))
            .filter(|p| self.grid.valid(p))
    }

    /// Actors in dispatch order
    pub fn actors(&self) -> &[Entity] {
        self.registry.actors()
    }

    pub fn rooms(&self) -> &[Entity] {
        self.registry.rooms()
    }

    pub fn actor(&self, entity: Entity) -> Option<Actor> {
        self.registry.actor(entity)
    }

    pub fn actor_def(&self, entity: Entity) -> Option<&ActorDef> {
        self.registry
            .actor(entity)
            .and_then(|a| self.defs.actor(a.def))
    }

    pub fn position(&self, entity: Entity) -> Option<Point> {
        self.registry.position(entity)
    }

    pub fn vitals(&self, entity: Entity) -> Option<Vitals> {
        self.registry.vitals(entity)
    }

    pub fn vitals_mut(&mut self, entity: Entity) -> Option<&mut Vitals> {
        self.registry.vitals_mut(entity)
    }

    pub fn inventory(&self, entity: Entity) -> Option<Ref<'_, Inventory>> {
        self.registry.inventory(entity)
    }

    pub fn inventory_mut(&mut self, entity: Entity) -> Option<&mut Inventory> {
        self.registry.inventory_mut(entity)
    }

    pub fn room(&self, entity: Entity) -> Option<Ref<'_, Room>> {
        self.registry.room(entity)
    }

    pub fn actor_at(&self, p: &Point) -> Option<Entity> {
        self.grid.at(p).actor
    }

    pub fn item_at(&self, p: &Point) -> Option<Item> {
        self.grid.at(p).item
    }

    /// Terrain definition of the cell at `p`
    pub fn tile_def_at(&self, p: &Point) -> Option<&TileDef> {
        self.defs.tile(self.grid.at(p).terrain)
    }

    /// "the wolf", "the wolf (40%)" while wounded, "something" for a
    /// handle that no longer resolves
    pub fn actor_name(&self, entity: Entity) -> String {
        match (self.actor_def(entity), self.registry.vitals(entity)) {
            (Some(def), Some(vitals)) => actor_display_name(def, &vitals),
            _ => "something".to_string(),
        }
    }

    /// Actors waiting for end-of-tick removal
    pub fn pending_removals(&self) -> &[Entity] {
        &self.pending_removal
    }

    pub fn add_log_msg(&mut self, msg: impl Into<String>) {
        self.log.add(msg);
    }

    /// Continue the newest log message
    pub fn append_log_msg(&mut self, text: &str) {
        self.log.append(text);
    }

    /// Message `index` counting back from the newest
    pub fn log_msg(&self, index: usize) -> Option<&str> {
        self.log.get(index)
    }

    pub fn log_count(&self) -> usize {
        self.log.len()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// A cell that is on the map, not solid, free of actors and, unless
    /// `allow_items`, free of items. Random attempts first, then a
    /// row-major scan.
    pub fn find_open_tile(&mut self, allow_items: bool) -> Option<Point> {
        if self.grid.is_empty() {
            return None;
        }
        let width = self.grid.width() as u32;
        let height = self.grid.height() as u32;
        for _ in 0..self.config.respawn_attempts {
            let x = self.rng.next32() % width;
            let y = self.rng.next32() % height;
            let p = Point::new(x as i32, y as i32);
            if self.is_open(&p, allow_items) {
                return Some(p);
            }
        }
        self.grid
            .iter()
            .map(|(p, _)| p)
            .find(|p| self.is_open(p, allow_items))
    }

    fn is_open(&self, p: &Point, allow_items: bool) -> bool {
        self.is_passable(p) && (allow_items || self.grid.at(p).item.is_none())
    }
}
