//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from simulation code.
//! The journal, the transient message and display tracks are excluded: two
//! games that agree on everything authoritative hash the same.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;
use crate::world::Tile;

fn write_pos(hasher: &mut Xxh3, pos: Pos) {
    hasher.write_i32(pos.x);
    hasher.write_i32(pos.y);
}

impl Game {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u32(self.turn);
        hasher.write_u8(self.phase as u8);
        hasher.write_u8(match self.outcome {
            None => 0,
            Some(RunOutcome::Victory) => 1,
            Some(RunOutcome::Defeat) => 2,
        });
        let selected = self.selected.and_then(|id| self.units.get(id)).map_or(0, |u| u.serial);
        hasher.write_u32(selected);
        match self.view {
            ViewMode::Outdoor => hasher.write_u8(0),
            ViewMode::Indoor { building } => {
                hasher.write_u8(1);
                write_pos(&mut hasher, building);
            }
        }
        for resource in [Resource::Scrap, Resource::Medicine, Resource::Food, Resource::Water] {
            hasher.write_i32(self.resources.get(resource));
        }
        for pile in [self.deck.draw_pile(), self.deck.hand(), self.deck.discard_pile()] {
            hasher.write_usize(pile.len());
            for card in pile {
                hasher.write_u8(*card as u8);
            }
        }

        self.hash_units(&mut hasher);
        for enemy in self.enemies.values() {
            hasher.write_u32(enemy.serial);
            write_pos(&mut hasher, enemy.pos);
            hasher.write_i32(enemy.health);
            hasher.write_u8(enemy.state as u8);
        }
        for modifier in &self.modifiers {
            let TurnModifier::MoveBonus { unit, amount } = *modifier;
            hasher.write_u32(self.units.get(unit).map_or(0, |u| u.serial));
            hasher.write_i32(amount);
        }
        for chunk in self.world.chunks() {
            hasher.write_i32(chunk.coord.cx);
            hasher.write_i32(chunk.coord.cy);
            hasher.write_u8(chunk.stage as u8);
            for tile in &chunk.tiles {
                self.hash_tile(&mut hasher, tile);
            }
        }
        for interior in self.interiors.values() {
            hasher.write(&interior.canonical_bytes());
            for tile in &interior.tiles {
                hasher.write_u32(self.occupant_tag(tile.occupant));
            }
        }
        hasher.finish()
    }

    fn hash_units(&self, hasher: &mut Xxh3) {
        for unit in self.units.values() {
            hasher.write_u32(unit.serial);
            hasher.write(unit.name.as_bytes());
            write_pos(hasher, unit.pos);
            if let Some(state) = unit.indoors {
                write_pos(hasher, state.building);
                write_pos(hasher, state.entered_from);
            }
            for stat in [
                unit.health,
                unit.action_points,
                unit.max_action_points,
                unit.move_range,
                unit.hydration,
                unit.nutrition,
            ] {
                hasher.write_i32(stat);
            }
            hasher.write_u64(unit.radiation_dose.to_bits());
            hasher.write_u8(unit.ars_stage);
        }
    }

    fn hash_tile(&self, hasher: &mut Xxh3, tile: &Tile) {
        hasher.write_u8(tile.terrain as u8);
        hasher.write_u64(tile.radiation_level.to_bits());
        let flags = u8::from(tile.revealed)
            | u8::from(tile.has_building) << 1
            | u8::from(tile.has_road) << 2;
        hasher.write_u8(flags);
        hasher.write_u32(self.occupant_tag(tile.occupant));
        for prop in &tile.props {
            hasher.write_u8(prop.kind as u8);
            write_pos(hasher, prop.anchor);
        }
        hasher.write_u32(tile.times_searched);
    }

    /// Serial-based so slot keys never leak into the hash.
    fn occupant_tag(&self, occupant: Occupant) -> u32 {
        match occupant {
            Occupant::Empty => 0,
            Occupant::Unit(id) => self.units.get(id).map_or(1, |unit| unit.serial << 1),
            Occupant::Enemy(id) => self.enemies.get(id).map_or(1, |enemy| enemy.serial << 1 | 1),
        }
    }
}
