//! Conversion between a live game and the save schema.
//! Loading rebuilds the game from the seed: terrain regenerates lazily, only
//! the saved tile keys are revealed again, and actors are rebuilt from their
//! scalar fields. Any malformed field aborts the whole load.

use tracing::info;

use super::*;
use crate::error::SaveError;
use crate::interior::generate_interior;
use crate::save::{SaveData, SavedCard, SavedEnemy, SavedUnit};

impl Game {
    pub fn to_save_data(&self) -> SaveData {
        let units = self
            .units
            .values()
            .map(|unit| SavedUnit {
                id: unit.serial,
                name: unit.name.clone(),
                x: unit.pos.x,
                y: unit.pos.y,
                health: unit.health,
                action_points: unit.action_points,
                radiation_dose: unit.radiation_dose,
                hydration: unit.hydration,
                nutrition: unit.nutrition,
                max_action_points: Some(unit.max_action_points),
                interior: unit.indoors.map(|state| state.building.key()),
            })
            .collect();
        let enemies = self
            .enemies
            .values()
            .map(|enemy| SavedEnemy {
                id: enemy.serial,
                name: enemy.name.to_string(),
                x: enemy.pos.x,
                y: enemy.pos.y,
                health: enemy.health,
            })
            .collect();
        let hand = self
            .deck
            .hand()
            .iter()
            .map(|card| {
                let template = card.template();
                SavedCard {
                    name: template.name.to_string(),
                    card_type: template.card_type.label().to_string(),
                }
            })
            .collect();
        SaveData {
            seed: self.seed,
            turn: self.turn,
            phase: self.phase,
            units,
            enemies,
            global_resources: self.resources,
            hand,
            deck_size: self.deck.deck_size(),
            discard_size: self.deck.discard_size(),
            revealed_tiles: self.world.revealed_positions().into_iter().map(Pos::key).collect(),
            interiors: self.interiors.values().cloned().collect(),
        }
    }

    pub fn save_json(&self) -> Result<String, SaveError> {
        let json = self.to_save_data().to_json()?;
        info!(seed = self.seed, turn = self.turn, bytes = json.len(), "game saved");
        Ok(json)
    }

    pub fn load_json(raw: &str, config: GameConfig) -> Result<Self, SaveError> {
        Self::from_save_data(&SaveData::from_json(raw)?, config)
    }

    pub fn from_save_data(data: &SaveData, config: GameConfig) -> Result<Self, SaveError> {
        let mut game = Self::blank(data.seed, config);
        game.dice = Dice::from_seed(mix_seed_stream(data.seed, u64::from(data.turn)));
        let hand: Vec<String> = data.hand.iter().map(|card| card.name.clone()).collect();
        game.deck = Deck::restore(&game.config.cards, &mut game.dice, &hand, data.discard_size)?;
        game.turn = data.turn;
        game.phase = data.phase;
        game.resources = data.global_resources;

        for interior in &data.interiors {
            game.interiors.insert(interior.anchor, interior.clone());
        }
        for key in &data.revealed_tiles {
            let pos = Pos::parse_key(key).ok_or_else(|| SaveError::BadTileKey(key.clone()))?;
            game.world.reveal_around_position(pos, 0);
        }
        for saved in &data.units {
            game.restore_unit(saved)?;
        }
        for saved in &data.enemies {
            let pos = Pos::new(saved.x, saved.y);
            let mut enemy = Enemy::raider(saved.id, pos, &game.config.enemy);
            enemy.health = saved.health.clamp(0, enemy.max_health);
            let id = game.enemies.insert(enemy);
            game.world.set_occupant(pos, Occupant::Enemy(id));
            game.next_enemy_serial = game.next_enemy_serial.max(saved.id + 1);
        }

        game.check_game_end();
        info!(
            seed = data.seed,
            turn = data.turn,
            units = game.units.len(),
            enemies = game.enemies.len(),
            "game loaded"
        );
        Ok(game)
    }

    fn restore_unit(&mut self, saved: &SavedUnit) -> Result<(), SaveError> {
        let pos = Pos::new(saved.x, saved.y);
        let mut unit = Unit::new(saved.id, saved.name.as_str(), pos, &self.config);
        unit.health = saved.health.clamp(0, unit.max_health);
        unit.hydration = saved.hydration.clamp(0, unit.max_hydration);
        unit.nutrition = saved.nutrition.clamp(0, unit.max_nutrition);
        unit.set_dose(saved.radiation_dose);
        if let Some(max_action_points) = saved.max_action_points {
            unit.restore_max_ap(max_action_points);
        }
        unit.action_points = saved.action_points.clamp(0, unit.max_action_points);

        let building = match &saved.interior {
            Some(key) => Some(self.restored_interior(key)?),
            None => None,
        };
        if let Some(anchor) = building {
            unit.indoors = Some(IndoorState { building: anchor, entered_from: anchor });
        }
        let id = self.units.insert(unit);
        match building {
            Some(anchor) => {
                let interior = self.interiors.get_mut(&anchor);
                if let Some(tile) = interior.and_then(|interior| interior.tile_mut(pos)) {
                    tile.occupant = Occupant::Unit(id);
                }
            }
            None => self.world.set_occupant(pos, Occupant::Unit(id)),
        }
        self.next_unit_serial = self.next_unit_serial.max(saved.id + 1);
        Ok(())
    }

    /// The cached interior for `key`, regenerated from the seed when the
    /// save did not carry it.
    fn restored_interior(&mut self, key: &str) -> Result<Pos, SaveError> {
        let anchor = Pos::parse_key(key).ok_or_else(|| SaveError::BadTileKey(key.to_string()))?;
        if self.interiors.contains_key(&anchor) {
            return Ok(anchor);
        }
        let building = self.world.get_tile_global(anchor).and_then(|tile| tile.building());
        let Some((kind, anchor)) = building else {
            return Err(SaveError::UnknownInterior(key.to_string()));
        };
        let interior = generate_interior(anchor, kind, self.seed);
        self.interiors.insert(anchor, interior);
        Ok(anchor)
    }
}
