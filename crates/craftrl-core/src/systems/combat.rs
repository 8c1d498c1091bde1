//! Combat - flat damage, death and loot drops.

use hecs::Entity;

use crate::components::Point;
use crate::definitions::{ActorKind, LootTable};
use crate::messages::upper_first;
use crate::world::World;

impl World {
    /// `attacker` hits `victim` for its base damage. A victim brought to
    /// zero health is queued for removal and its loot rolled where it
    /// stood. Messages are only logged near the player.
    pub fn do_damage(&mut self, attacker: Entity, victim: Entity) {
        let (Some(att), Some(vic)) = (self.actor_def(attacker), self.actor_def(victim)) else {
            log::warn!("do_damage: missing actor ({:?} -> {:?})", attacker, victim);
            return;
        };
        let damage = att.base_damage;
        let victim_kind = vic.kind;
        let loot = vic.loot.clone();
        let Some(victim_pos) = self.registry.position(victim) else {
            return;
        };

        let show_msgs = self
            .player_position()
            .map(|p| p.distance(&victim_pos) < self.config.message_radius)
            .unwrap_or(false);

        let health = match self.registry.vitals_mut(victim) {
            Some(vitals) => {
                vitals.health -= damage;
                vitals.health
            }
            None => return,
        };
        log::debug!("{:?} hits {:?} for {} ({} left)", attacker, victim, damage, health);

        if show_msgs {
            let msg = format!(
                "{} does {} damage to {}.",
                upper_first(&self.actor_name(attacker)),
                damage,
                self.actor_name(victim)
            );
            self.add_log_msg(msg);
        }

        if health <= 0 {
            if show_msgs {
                let verb = match victim_kind {
                    ActorKind::Plant => "breaks",
                    _ => "dies",
                };
                let msg = format!(" {} {}.", upper_first(&self.actor_name(victim)), verb);
                self.append_log_msg(&msg);
            }
            self.queue_removal(victim);
            if let Some(table) = loot {
                self.make_loot_at(&table, victim_pos, show_msgs);
            }
        }
    }

    /// Roll each row of `table` independently: a percent chance and a
    /// quantity in `min..=max`, dropping that many items around `at`.
    /// Returns how many items landed.
    pub fn make_loot_at(&mut self, table: &LootTable, at: Point, show_msgs: bool) -> usize {
        let mut msg = String::new();
        let mut dropped = 0;
        for row in &table.rows {
            if row.ident < 0 || row.chance < 0 || row.max < 0 {
                continue;
            }
            let Some(name) = self.defs.item(row.ident).map(|d| d.name.clone()) else {
                continue;
            };
            let chance = (self.rng.next32() % 100) as i32;
            let qty = self.rng.between_i32(row.min, row.max);
            if chance >= row.chance {
                continue;
            }
            for _ in 0..qty {
                let dest = self.find_drop_space(at);
                if self.place_item(row.ident, dest) {
                    msg.push_str(&format!("Dropped {}. ", name));
                    dropped += 1;
                }
            }
        }
        if show_msgs && !msg.is_empty() {
            self.add_log_msg(msg.trim_end());
        }
        dropped
    }
}
