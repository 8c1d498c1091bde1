//! Save/Load - the binary save file.
//!
//! Every field is a little-endian 32-bit word unless noted. Layout:
//!
//! ```text
//! magic, version (major << 16 | minor), width, height
//! turn, day, hour, minute
//! TILE  terrain for every cell, row-major
//! ITEM  count, then (def, x, y) per item
//! ACTR  count, then (def, x, y, age, health, rows, (qty, item) per row)
//! ROOM  count, then (def, u8 point count, (x, y) per point)
//! LOG   count, then one NUL-terminated string per message
//! ```
//!
//! A load that fails in the header or tile section leaves the world as it
//! was. A later failure leaves it half-built; callers must not carry on
//! playing it.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use hecs::Entity;

use crate::components::{Point, Room};
use crate::definitions::ActorKind;
use crate::error::SaveError;
use crate::world::World;

pub const SAVE_MAGIC: u32 = 0x004C_5243;
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
/// Packed `major << 16 | minor`
pub const SAVE_VERSION: u32 = (VERSION_MAJOR << 16) | VERSION_MINOR;

const TAG_TILES: u32 = 0x454C_4954;
const TAG_ITEMS: u32 = 0x4D45_5449;
const TAG_ACTORS: u32 = 0x5254_4341;
const TAG_ROOMS: u32 = 0x4D4F_4F52;
const TAG_LOG: u32 = 0x0047_4F4C;

/// Rooms with no classification are written with this type
const UNCLASSIFIED: i32 = -1;

struct SaveWriter<W: Write> {
    out: W,
}

impl<W: Write> SaveWriter<W> {
    fn u8(&mut self, value: u8) -> io::Result<()> {
        self.out.write_all(&[value])
    }

    fn u32(&mut self, value: u32) -> io::Result<()> {
        self.out.write_all(&value.to_le_bytes())
    }

    fn i32(&mut self, value: i32) -> io::Result<()> {
        self.u32(value as u32)
    }

    fn count(&mut self, what: &'static str, count: usize) -> Result<(), SaveError> {
        let count = u32::try_from(count).map_err(|_| SaveError::CountOverflow { what, count })?;
        Ok(self.u32(count)?)
    }

    /// NUL-terminated; interior NULs would end the string early so they are
    /// dropped
    fn string(&mut self, text: &str) -> io::Result<()> {
        let bytes: Vec<u8> = text.bytes().filter(|&b| b != 0).collect();
        self.out.write_all(&bytes)?;
        self.u8(0)
    }
}

struct SaveReader<R: Read> {
    input: R,
}

impl<R: Read> SaveReader<R> {
    fn bytes<const N: usize>(&mut self, section: &'static str) -> Result<[u8; N], SaveError> {
        let mut buf = [0u8; N];
        self.input.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => SaveError::Truncated { section },
            _ => SaveError::Io(e),
        })?;
        Ok(buf)
    }

    fn u8(&mut self, section: &'static str) -> Result<u8, SaveError> {
        Ok(self.bytes::<1>(section)?[0])
    }

    fn u32(&mut self, section: &'static str) -> Result<u32, SaveError> {
        Ok(u32::from_le_bytes(self.bytes::<4>(section)?))
    }

    fn i32(&mut self, section: &'static str) -> Result<i32, SaveError> {
        Ok(self.u32(section)? as i32)
    }

    fn point(&mut self, section: &'static str) -> Result<Point, SaveError> {
        let x = self.i32(section)?;
        let y = self.i32(section)?;
        Ok(Point::new(x, y))
    }

    fn string(&mut self, section: &'static str) -> Result<String, SaveError> {
        let mut bytes = Vec::new();
        loop {
            match self.u8(section)? {
                0 => break,
                b => bytes.push(b),
            }
        }
        String::from_utf8(bytes).map_err(|_| SaveError::InvalidString)
    }

    fn section(&mut self, section: &'static str, expected: u32) -> Result<(), SaveError> {
        let found = self.u32(section)?;
        if found != expected {
            return Err(SaveError::SectionMismatch {
                section,
                expected,
                found,
            });
        }
        Ok(())
    }
}

impl World {
    /// Write the whole world to `out`
    pub fn save<W: Write>(&self, out: W) -> Result<(), SaveError> {
        let mut w = SaveWriter { out };

        w.u32(SAVE_MAGIC)?;
        w.u32(SAVE_VERSION)?;
        w.u32(self.grid.width() as u32)?;
        w.u32(self.grid.height() as u32)?;

        w.u32(self.clock.turn)?;
        w.u32(self.clock.day)?;
        w.u32(self.clock.hour)?;
        w.u32(self.clock.minute)?;

        w.u32(TAG_TILES)?;
        for tile in self.grid.tiles() {
            w.i32(tile.terrain)?;
        }

        let items: Vec<(Point, i32)> = self
            .grid
            .iter()
            .filter_map(|(p, tile)| tile.item.map(|item| (p, item.def)))
            .collect();
        w.u32(TAG_ITEMS)?;
        w.count("item", items.len())?;
        for (p, def) in items {
            w.i32(def)?;
            w.i32(p.x)?;
            w.i32(p.y)?;
        }

        w.u32(TAG_ACTORS)?;
        w.count("actor", self.registry.actor_count())?;
        for &entity in self.registry.actors() {
            let (Some(actor), Some(pos), Some(vitals), Some(inventory)) = (
                self.registry.actor(entity),
                self.registry.position(entity),
                self.registry.vitals(entity),
                self.registry.inventory(entity),
            ) else {
                return Err(SaveError::UnknownDefinition {
                    kind: "actor",
                    ident: -1,
                });
            };
            w.i32(actor.def)?;
            w.i32(pos.x)?;
            w.i32(pos.y)?;
            w.i32(vitals.age)?;
            w.i32(vitals.health)?;
            w.count("inventory row", inventory.len())?;
            for row in inventory.rows() {
                w.i32(row.qty)?;
                w.i32(row.item)?;
            }
        }

        w.u32(TAG_ROOMS)?;
        w.count("room", self.registry.room_count())?;
        for &entity in self.registry.rooms() {
            let Some(room) = self.registry.room(entity) else {
                continue;
            };
            let size = u8::try_from(room.points.len())
                .map_err(|_| SaveError::RoomTooLarge(room.points.len()))?;
            w.i32(room.def.unwrap_or(UNCLASSIFIED))?;
            w.u8(size)?;
            for p in &room.points {
                w.i32(p.x)?;
                w.i32(p.y)?;
            }
        }

        w.u32(TAG_LOG)?;
        w.count("log message", self.log.len())?;
        for msg in self.log.iter() {
            w.string(msg)?;
        }

        w.out.flush()?;
        log::info!(
            "saved {}x{} map: {} actors, {} rooms, turn {}",
            self.grid.width(),
            self.grid.height(),
            self.registry.actor_count(),
            self.registry.room_count(),
            self.clock.turn
        );
        Ok(())
    }

    /// Replace the world with the contents of a save file
    pub fn load<R: Read>(&mut self, input: R) -> Result<(), SaveError> {
        let result = self.load_sections(&mut SaveReader { input });
        match &result {
            Ok(()) => log::info!(
                "loaded {}x{} map: {} actors, {} rooms, turn {}",
                self.grid.width(),
                self.grid.height(),
                self.registry.actor_count(),
                self.registry.room_count(),
                self.clock.turn
            ),
            Err(e) => log::error!("load failed: {}", e),
        }
        result
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let file = File::create(path.as_ref())?;
        self.save(BufWriter::new(file))
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let file = File::open(path.as_ref())?;
        self.load(BufReader::new(file))
    }

    fn load_sections<R: Read>(&mut self, r: &mut SaveReader<R>) -> Result<(), SaveError> {
        let magic = r.u32("header")?;
        if magic != SAVE_MAGIC {
            return Err(SaveError::BadMagic {
                expected: SAVE_MAGIC,
                found: magic,
            });
        }
        let version = r.u32("header")?;
        if version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: version,
            });
        }
        let width = r.u32("header")?;
        let height = r.u32("header")?;
        let max = self.config.max_map_dimension;
        if width > max || height > max {
            return Err(SaveError::InvalidDimensions { width, height });
        }
        let turn = r.u32("header")?;
        let day = r.u32("header")?;
        let hour = r.u32("header")?;
        let minute = r.u32("header")?;

        // Cells are read before the map is replaced, so a short file cannot
        // trigger a header-sized allocation.
        r.section("tiles", TAG_TILES)?;
        let cells = width as usize * height as usize;
        let mut terrain = Vec::new();
        for _ in 0..cells {
            terrain.push(r.i32("tiles")?);
        }

        self.alloc_map(width as i32, height as i32);
        self.clock.turn = turn;
        self.clock.day = day;
        self.clock.hour = hour;
        self.clock.minute = minute;
        for (index, terrain) in terrain.into_iter().enumerate() {
            let p = self.grid.point_of(index);
            if let Some(tile) = self.grid.at_mut(&p) {
                tile.terrain = terrain;
            }
        }

        r.section("items", TAG_ITEMS)?;
        let count = r.u32("items")?;
        for _ in 0..count {
            let def = r.i32("items")?;
            let p = r.point("items")?;
            if self.defs.item(def).is_none() {
                return Err(SaveError::UnknownDefinition { kind: "item", ident: def });
            }
            if !self.grid.valid(&p) {
                return Err(SaveError::OffMap { kind: "item", x: p.x, y: p.y });
            }
            if !self.place_item(def, p) {
                return Err(SaveError::Occupied { kind: "item", x: p.x, y: p.y });
            }
        }

        r.section("actors", TAG_ACTORS)?;
        let count = r.u32("actors")?;
        for _ in 0..count {
            self.load_actor(r)?;
        }

        r.section("rooms", TAG_ROOMS)?;
        let count = r.u32("rooms")?;
        for _ in 0..count {
            self.load_room(r)?;
        }

        r.section("log", TAG_LOG)?;
        let count = r.u32("log")?;
        for _ in 0..count {
            let msg = r.string("log")?;
            self.log.add(msg);
        }
        Ok(())
    }

    fn load_actor<R: Read>(&mut self, r: &mut SaveReader<R>) -> Result<Entity, SaveError> {
        let ident = r.i32("actors")?;
        let p = r.point("actors")?;
        let age = r.i32("actors")?;
        let health = r.i32("actors")?;

        let def = self
            .defs
            .actor(ident)
            .ok_or(SaveError::UnknownDefinition { kind: "actor", ident })?;
        let is_player = def.kind == ActorKind::Player;
        let entity = self.registry.spawn_actor(def);

        if self.grid.valid(&p) {
            if !self.move_actor(entity, p) {
                return Err(SaveError::Occupied { kind: "actor", x: p.x, y: p.y });
            }
        } else if is_player {
            // dead player waiting to respawn
            self.player = Some(entity);
        } else {
            return Err(SaveError::OffMap { kind: "actor", x: p.x, y: p.y });
        }
        if let Some(vitals) = self.registry.vitals_mut(entity) {
            vitals.age = age;
            vitals.health = health;
        }

        let rows = r.u32("actors")?;
        for _ in 0..rows {
            let qty = r.i32("actors")?;
            let item = r.i32("actors")?;
            if self.defs.item(item).is_none() {
                return Err(SaveError::UnknownDefinition { kind: "item", ident: item });
            }
            if let Some(inventory) = self.registry.inventory_mut(entity) {
                inventory.add(item, qty);
            }
        }
        Ok(entity)
    }

    fn load_room<R: Read>(&mut self, r: &mut SaveReader<R>) -> Result<Entity, SaveError> {
        let def = r.i32("rooms")?;
        let size = r.u8("rooms")?;
        let mut points = Vec::with_capacity(usize::from(size));
        for _ in 0..size {
            let p = r.point("rooms")?;
            if !self.grid.valid(&p) {
                return Err(SaveError::OffMap { kind: "room", x: p.x, y: p.y });
            }
            if self.grid.at(&p).room.is_some() || points.contains(&p) {
                return Err(SaveError::Occupied { kind: "room", x: p.x, y: p.y });
            }
            points.push(p);
        }

        let mut room = Room::new(points);
        room.def = self.defs.room(def).map(|d| d.ident);
        let entity = self
            .add_room(room)
            .ok_or(SaveError::Occupied { kind: "room", x: -1, y: -1 })?;
        self.classify_room_quietly(entity);
        Ok(entity)
    }
}
