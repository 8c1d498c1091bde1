//! CraftRL Headless Simulation Harness
//!
//! Drives the simulation core without a terminal: loads the shipped
//! definitions, builds a small settlement, runs ticks and checks that the
//! world stays consistent, then round-trips a save.
//!
//! Usage:
//!   cargo run -p craftrl-simtest
//!   cargo run -p craftrl-simtest -- --seed 7 --ticks 500 --verbose
//!   cargo run -p craftrl-simtest -- --json
//!
//! `RUST_LOG=debug` shows the core's diagnostics.

use craftrl_core::crafting::can_craft;
use craftrl_core::prelude::*;
use craftrl_core::random::Random;
use serde::Serialize;

// ── Definitions (same JSON the game loads) ──────────────────────────────
const DEFINITIONS_JSON: &str = include_str!("../../../data/definitions.json");

const TOP_LEVEL_KEYS: [&str; 5] = ["actors", "items", "tiles", "recipes", "rooms"];

// Idents from data/definitions.json
const GRASS: i32 = 0;
const WALL: i32 = 2;
const DOOR_CLOSED: i32 = 3;
const BED: i32 = 6;
const PLAYER: i32 = 0;
const VILLAGER: i32 = 1;
const WOLF: i32 = 2;
const RABBIT: i32 = 3;
const SAPLING: i32 = 4;
const BERRY: i32 = 0;
const LOG: i32 = 1;
const PLANK: i32 = 4;
const PLANK_RECIPE: i32 = 0;

const MAP_SIZE: i32 = 32;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

struct Options {
    seed: u64,
    ticks: u32,
    verbose: bool,
    json: bool,
}

fn parse_args() -> Options {
    let mut options = Options {
        seed: 42,
        ticks: 300,
        verbose: false,
        json: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => options.verbose = true,
            "--json" => options.json = true,
            "--seed" => match args.next().and_then(|v| v.parse().ok()) {
                Some(seed) => options.seed = seed,
                None => eprintln!("--seed needs a number, using {}", options.seed),
            },
            "--ticks" => match args.next().and_then(|v| v.parse().ok()) {
                Some(ticks) => options.ticks = ticks,
                None => eprintln!("--ticks needs a number, using {}", options.ticks),
            },
            other => eprintln!("ignoring unknown argument {}", other),
        }
    }
    options
}

fn main() {
    env_logger::init();
    let options = parse_args();
    let verbose = options.verbose;
    if !options.json {
        println!("=== CraftRL Simulation Harness (seed {}) ===\n", options.seed);
    }

    let mut results = Vec::new();

    // 1. Definitions validation
    let defs = match Definitions::from_json_str(DEFINITIONS_JSON) {
        Ok(defs) => defs,
        Err(e) => {
            results.push(TestResult::new(
                "definitions_parse",
                false,
                format!("{}", e),
            ));
            finish(&results, &options);
            return;
        }
    };
    results.extend(validate_definitions(&defs, verbose));

    // 2. RNG determinism
    results.extend(validate_random(options.seed, verbose));

    // 3. Settlement simulation
    let mut world = build_settlement(defs.clone(), options.seed);
    results.extend(validate_rooms(&mut world, verbose));
    results.extend(validate_simulation(&mut world, options.ticks, verbose));

    // 4. Player commands and crafting
    results.extend(validate_player(&mut world, verbose));

    // 5. Save round-trip
    results.extend(validate_persistence(&world, &defs, verbose));

    finish(&results, &options);
}

fn finish(results: &[TestResult], options: &Options) {
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if options.json {
        match serde_json::to_string_pretty(results) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to encode results: {}", e),
        }
    } else {
        println!();
        for r in results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || options.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            results.len(),
            failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Definitions ──────────────────────────────────────────────────────

fn validate_definitions(defs: &Definitions, verbose: bool) -> Vec<TestResult> {
    println_if(verbose, "--- Definitions ---");
    let mut results = Vec::new();

    let unknown_keys: Vec<String> = match serde_json::from_str::<serde_json::Value>(DEFINITIONS_JSON) {
        Ok(serde_json::Value::Object(map)) => map
            .keys()
            .filter(|k| !TOP_LEVEL_KEYS.contains(&k.as_str()))
            .cloned()
            .collect(),
        _ => vec!["<not an object>".into()],
    };
    results.push(TestResult::new(
        "definitions_known_sections",
        unknown_keys.is_empty(),
        if unknown_keys.is_empty() {
            "only known sections present".into()
        } else {
            format!("unknown sections: {}", unknown_keys.join(", "))
        },
    ));

    results.push(TestResult::new(
        "definitions_not_empty",
        defs.actor_count() > 0 && defs.item_count() > 0 && defs.tile_count() > 0,
        format!(
            "{} actors, {} items, {} tiles, {} recipes, {} rooms",
            defs.actor_count(),
            defs.item_count(),
            defs.tile_count(),
            defs.recipe_count(),
            defs.room_count()
        ),
    ));

    let has_player = defs.actors().iter().any(|a| a.kind == ActorKind::Player);
    results.push(TestResult::new(
        "definitions_player_exists",
        has_player,
        "a player definition is present",
    ));

    results.push(TestResult::new(
        "definitions_default_room",
        defs.room(0).is_some(),
        "room definition 0 is the fallback classification",
    ));

    let bad_growth: Vec<&str> = defs
        .actors()
        .iter()
        .filter(|a| a.grow_to.map(|t| defs.actor(t).is_none()).unwrap_or(false))
        .map(|a| a.name.as_str())
        .collect();
    results.push(TestResult::new(
        "definitions_growth_targets",
        bad_growth.is_empty(),
        if bad_growth.is_empty() {
            "all growth targets resolve".into()
        } else {
            format!("missing growth targets: {}", bad_growth.join(", "))
        },
    ));

    let mut bad_refs = Vec::new();
    for actor in defs.actors() {
        if let Some(food) = actor.food_item {
            if defs.item(food).is_none() {
                bad_refs.push(format!("{} food {}", actor.name, food));
            }
        }
        for row in actor.loot.iter().flat_map(|l| &l.rows) {
            if defs.item(row.ident).is_none() || row.min > row.max {
                bad_refs.push(format!("{} loot {}", actor.name, row.ident));
            }
        }
    }
    for tile in defs.tiles() {
        for target in [tile.door_to, tile.break_to].into_iter().flatten() {
            if defs.tile(target).is_none() {
                bad_refs.push(format!("{} -> tile {}", tile.name, target));
            }
        }
        for row in tile.loot.iter().flat_map(|l| &l.rows) {
            if defs.item(row.ident).is_none() || row.min > row.max {
                bad_refs.push(format!("{} loot {}", tile.name, row.ident));
            }
        }
    }
    for item in defs.items() {
        if item.seed_for.map(|a| defs.actor(a).is_none()).unwrap_or(false)
            || item.constructs.map(|t| defs.tile(t).is_none()).unwrap_or(false)
        {
            bad_refs.push(format!("item {}", item.name));
        }
    }
    for recipe in defs.recipes() {
        let parts_ok = recipe.parts.iter().all(|p| defs.item(p.ident).is_some());
        if defs.item(recipe.make_ident).is_none() || !parts_ok {
            bad_refs.push(format!("recipe {}", recipe.ident));
        }
    }
    for room in defs.rooms() {
        if room.requirements.iter().any(|t| defs.tile(*t).is_none()) {
            bad_refs.push(format!("room {}", room.name));
        }
    }
    results.push(TestResult::new(
        "definitions_references",
        bad_refs.is_empty(),
        if bad_refs.is_empty() {
            "all cross-references resolve".into()
        } else {
            format!("dangling: {}", bad_refs.join(", "))
        },
    ));

    results
}

// ── 2. Random ───────────────────────────────────────────────────────────

fn validate_random(seed: u64, verbose: bool) -> Vec<TestResult> {
    println_if(verbose, "--- Random ---");
    let mut a = Random::with_seed(seed);
    let mut b = Random::with_seed(seed);
    let same = (0..1000).all(|_| a.next32() == b.next32());

    let mut rng = Random::with_seed(seed);
    let in_range = (0..1000).all(|_| (3..=9).contains(&rng.between(3, 9)));
    let rolls_ok = (0..1000).all(|_| (2..=12).contains(&rng.roll(2, 6)));

    vec![
        TestResult::new("random_reproducible", same, "same seed, same 1000 draws"),
        TestResult::new("random_between_bounds", in_range, "between(3, 9) stays in range"),
        TestResult::new("random_roll_bounds", rolls_ok, "roll(2, 6) stays in 2..=12"),
    ]
}

// ── 3. Settlement ───────────────────────────────────────────────────────

/// A grass map with a walled hut (bed, closed door), a player, villagers,
/// wildlife and some berries
fn build_settlement(defs: Definitions, seed: u64) -> World {
    let mut world = World::new(defs);
    world.seed(seed);
    world.alloc_map(MAP_SIZE, MAP_SIZE);
    for y in 0..MAP_SIZE {
        for x in 0..MAP_SIZE {
            world.set_terrain(Point::new(x, y), GRASS);
        }
    }
    for i in 4..=10 {
        world.set_terrain(Point::new(i, 4), WALL);
        world.set_terrain(Point::new(i, 10), WALL);
        world.set_terrain(Point::new(4, i), WALL);
        world.set_terrain(Point::new(10, i), WALL);
    }
    world.set_terrain(Point::new(7, 10), DOOR_CLOSED);
    world.set_terrain(Point::new(6, 6), BED);

    world.spawn_actor(PLAYER, Point::new(7, 12));
    let population = [
        (VILLAGER, 4),
        (WOLF, 2),
        (RABBIT, 5),
        (SAPLING, 6),
    ];
    for (def, count) in population {
        for _ in 0..count {
            if let Some(p) = world.find_open_tile(false) {
                world.spawn_actor(def, p);
            }
        }
    }
    for _ in 0..12 {
        if let Some(p) = world.find_open_tile(false) {
            world.place_item(BERRY, p);
        }
    }
    world
}

fn validate_rooms(world: &mut World, verbose: bool) -> Vec<TestResult> {
    println_if(verbose, "--- Rooms ---");
    let mut results = Vec::new();

    let extents = world.find_room_extents(Point::new(7, 7));
    results.push(TestResult::new(
        "rooms_hut_extents",
        extents.len() == 25,
        format!("hut interior has {} cells", extents.len()),
    ));

    let created = world.create_room(Point::new(7, 7)).is_some();
    let name = world.room_name_at(&Point::new(7, 7)).unwrap_or("none").to_string();
    results.push(TestResult::new(
        "rooms_hut_is_bedroom",
        created && name == "bedroom",
        format!("hut classified as {}", name),
    ));

    let open = world.find_room_extents(Point::new(20, 20));
    results.push(TestResult::new(
        "rooms_open_field_rejected",
        open.is_empty(),
        "unbounded region is not a room",
    ));

    results
}

/// Count cell/actor links that disagree
fn consistency_errors(world: &World) -> Vec<String> {
    let mut errors = Vec::new();
    for (p, tile) in world.grid().iter() {
        if let Some(actor) = tile.actor {
            if world.position(actor) != Some(p) {
                errors.push(format!("cell {} points at {:?} elsewhere", p, actor));
            }
        }
    }
    for &actor in world.actors() {
        match world.position(actor) {
            Some(p) if world.valid(&p) => {
                if world.actor_at(&p) != Some(actor) {
                    errors.push(format!("{:?} at {} not linked from its cell", actor, p));
                }
            }
            Some(_) if world.player() == Some(actor) => {}
            _ => errors.push(format!("{:?} is off the map", actor)),
        }
        if world.actor_def(actor).is_none() {
            errors.push(format!("{:?} has no definition", actor));
        }
    }
    errors
}

fn validate_simulation(world: &mut World, ticks: u32, verbose: bool) -> Vec<TestResult> {
    println_if(verbose, "--- Simulation ---");
    let mut results = Vec::new();

    let start_actors = world.actors().len();
    let mut first_error = None;
    for _ in 0..ticks {
        world.tick();
        if first_error.is_none() {
            first_error = consistency_errors(world).into_iter().next();
        }
    }
    results.push(TestResult::new(
        "simulation_consistent",
        first_error.is_none(),
        first_error.unwrap_or_else(|| format!("{} ticks without a broken link", ticks)),
    ));

    results.push(TestResult::new(
        "simulation_clock",
        world.turn() == ticks,
        format!("turn {} day/hour/minute {:?}", world.turn(), world.time()),
    ));

    results.push(TestResult::new(
        "simulation_player_present",
        world.player().and_then(|p| world.actor(p)).is_some(),
        "player survives or respawns",
    ));

    results.push(TestResult::new(
        "simulation_no_pending_removals",
        world.pending_removals().is_empty(),
        format!("{} -> {} actors", start_actors, world.actors().len()),
    ));

    results
}

// ── 4. Player ───────────────────────────────────────────────────────────

fn validate_player(world: &mut World, verbose: bool) -> Vec<TestResult> {
    println_if(verbose, "--- Player ---");
    let mut results = Vec::new();
    let Some(player) = world.player() else {
        results.push(TestResult::new("player_exists", false, "no player in the world"));
        return results;
    };

    let turn = world.turn();
    if world.player_wait() {
        world.tick();
    }
    results.push(TestResult::new(
        "player_wait",
        world.turn() == turn + 1,
        format!("turn {} -> {}", turn, world.turn()),
    ));

    let recipe = world.defs().recipe(PLANK_RECIPE).cloned();
    if let Some(inventory) = world.inventory_mut(player) {
        inventory.add(LOG, 1);
    }
    let before = world.inventory(player).map(|i| i.qty(PLANK)).unwrap_or(0);
    let craftable = match (&recipe, world.inventory(player)) {
        (Some(recipe), Some(inventory)) => can_craft(&inventory, recipe),
        _ => false,
    };
    let crafted = world.craft(player, PLANK_RECIPE);
    let after = world.inventory(player).map(|i| i.qty(PLANK)).unwrap_or(0);
    results.push(TestResult::new(
        "player_crafts_planks",
        craftable && crafted.is_ok() && after > before,
        format!("planks {} -> {}", before, after),
    ));

    let missing = world.craft(player, PLANK_RECIPE);
    results.push(TestResult::new(
        "player_craft_needs_parts",
        matches!(missing, Err(CraftError::MissingParts { .. })),
        format!("{:?}", missing),
    ));

    results
}

// ── 5. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(world: &World, defs: &Definitions, verbose: bool) -> Vec<TestResult> {
    println_if(verbose, "--- Persistence ---");
    let mut results = Vec::new();

    let mut first = Vec::new();
    if let Err(e) = world.save(&mut first) {
        results.push(TestResult::new("save", false, format!("{}", e)));
        return results;
    }
    results.push(TestResult::new("save", true, format!("{} bytes", first.len())));

    let mut loaded = World::new(defs.clone());
    let load = loaded.load(&first[..]);
    results.push(TestResult::new(
        "load",
        load.is_ok(),
        match &load {
            Ok(()) => format!("{} actors, {} rooms", loaded.actors().len(), loaded.rooms().len()),
            Err(e) => format!("{}", e),
        },
    ));
    if load.is_err() {
        return results;
    }

    let mut second = Vec::new();
    let stable = loaded.save(&mut second).is_ok() && first == second;
    results.push(TestResult::new(
        "save_load_stable",
        stable,
        "re-saving a loaded world gives identical bytes",
    ));

    results.push(TestResult::new(
        "load_consistent",
        consistency_errors(&loaded).is_empty() && loaded.player_position() == world.player_position(),
        "loaded world links and player position match",
    ));

    let mut corrupt = first.clone();
    corrupt[0] ^= 0xFF;
    let rejected = matches!(
        World::new(defs.clone()).load(&corrupt[..]),
        Err(SaveError::BadMagic { .. })
    );
    results.push(TestResult::new(
        "load_rejects_bad_magic",
        rejected,
        "corrupted header is refused",
    ));

    results
}

fn println_if(verbose: bool, text: &str) {
    if verbose {
        println!("{}", text);
    }
}
