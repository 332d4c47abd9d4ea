//! Survivor stats and the unit roster.
//! Every stat mutation clamps to `[0, max]`. ARS stages follow the dose; the
//! end-phase effects of stages 3 and 4 wear max AP down and curing the dose
//! never gives it back.

use tracing::info;

use super::*;
use crate::config::UnitConfig;
use crate::game::interpolation::{DisplayTrack, UNIT_TRACK_SPEED};

/// Where a unit went in from. `entered_from` is the outdoor building tile
/// used for the return trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndoorState {
    pub building: Pos,
    pub entered_from: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub serial: u32,
    pub name: String,
    /// World coordinate outdoors, interior coordinate indoors.
    pub pos: Pos,
    pub indoors: Option<IndoorState>,
    pub health: i32,
    pub max_health: i32,
    pub action_points: i32,
    pub max_action_points: i32,
    pub move_range: i32,
    pub damage: i32,
    pub hydration: i32,
    pub max_hydration: i32,
    pub nutrition: i32,
    pub max_nutrition: i32,
    pub radiation_dose: f64,
    pub max_radiation: f64,
    pub ars_stage: u8,
    ars_thresholds: [f64; 4],
    pub display: DisplayTrack,
}

/// Number of thresholds the dose has reached.
pub fn ars_stage_for(dose: f64, thresholds: &[f64; 4]) -> u8 {
    thresholds.iter().filter(|&&threshold| dose >= threshold).count() as u8
}

impl Unit {
    pub fn new(serial: u32, name: impl Into<String>, pos: Pos, config: &GameConfig) -> Self {
        let UnitConfig {
            max_health,
            max_hydration,
            max_nutrition,
            max_radiation,
            base_move_range,
            ..
        } = config.unit;
        Self {
            serial,
            name: name.into(),
            pos,
            indoors: None,
            health: max_health,
            max_health,
            action_points: config.game.starting_ap,
            max_action_points: config.game.starting_ap,
            move_range: base_move_range,
            damage: config.combat.base_damage,
            hydration: max_hydration,
            max_hydration,
            nutrition: max_nutrition,
            max_nutrition,
            radiation_dose: 0.0,
            max_radiation,
            ars_stage: 0,
            ars_thresholds: config.radiation.ars_thresholds,
            display: DisplayTrack::new(pos, UNIT_TRACK_SPEED),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_indoors(&self) -> bool {
        self.indoors.is_some()
    }

    /// Outdoor position, or the building tile for a unit inside.
    pub fn outdoor_pos(&self) -> Pos {
        self.indoors.map_or(self.pos, |state| state.entered_from)
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = self.health.saturating_add(amount.max(0)).clamp(0, self.max_health);
    }

    /// Returns true when this blow killed the unit.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount.max(0)).clamp(0, self.max_health);
        was_alive && !self.is_alive()
    }

    pub fn spend_ap(&mut self, amount: i32) -> Result<(), GameError> {
        if self.action_points < amount {
            return Err(GameError::NotEnoughAp { needed: amount, available: self.action_points });
        }
        self.action_points -= amount.max(0);
        Ok(())
    }

    pub fn restore_ap(&mut self, amount: i32) {
        self.action_points =
            self.action_points.saturating_add(amount.max(0)).clamp(0, self.max_action_points);
    }

    pub fn reset_ap(&mut self) {
        self.action_points = self.max_action_points;
    }

    pub fn hydrate(&mut self, amount: i32) {
        self.hydration = self.hydration.saturating_add(amount).clamp(0, self.max_hydration);
    }

    pub fn nourish(&mut self, amount: i32) {
        self.nutrition = self.nutrition.saturating_add(amount).clamp(0, self.max_nutrition);
    }

    /// Returns the new stage when it changed.
    pub fn add_radiation(&mut self, dose: f64) -> Option<u8> {
        self.set_dose(self.radiation_dose + dose.max(0.0))
    }

    pub fn cure_radiation(&mut self, amount: f64) -> Option<u8> {
        self.set_dose(self.radiation_dose - amount.max(0.0))
    }

    pub(crate) fn set_dose(&mut self, dose: f64) -> Option<u8> {
        self.radiation_dose = dose.clamp(0.0, self.max_radiation);
        let stage = ars_stage_for(self.radiation_dose, &self.ars_thresholds);
        let changed = stage != self.ars_stage;
        self.ars_stage = stage;
        changed.then_some(stage)
    }

    /// Restores a max AP already worn down by earlier end phases.
    pub(crate) fn restore_max_ap(&mut self, max_action_points: i32) {
        self.max_action_points = max_action_points.max(1);
        self.action_points = self.action_points.clamp(0, self.max_action_points);
    }

    /// End-phase ARS status effects. Stage 3 costs one max AP per turn
    /// (floor 1) and stage 4 drops it to 1. Returns the HP drain the caller
    /// applies.
    pub fn apply_ars_effects(&mut self) -> i32 {
        let drain = match self.ars_stage {
            2 => 5,
            3 => 10,
            4 => 20,
            _ => 0,
        };
        match self.ars_stage {
            3 => self.max_action_points = (self.max_action_points - 1).max(1),
            4 => self.max_action_points = 1,
            _ => {}
        }
        self.action_points = self.action_points.min(self.max_action_points);
        drain
    }
}

impl Game {
    pub(crate) fn add_unit(&mut self, name: &str, pos: Pos) -> UnitId {
        let unit = Unit::new(self.next_unit_serial, name, pos, &self.config);
        self.next_unit_serial += 1;
        let id = self.units.insert(unit);
        self.world.set_occupant(pos, Occupant::Unit(id));
        id
    }

    /// Removes a dead unit from every collection and checks for defeat.
    pub(super) fn kill_unit(&mut self, id: UnitId) {
        let Some(unit) = self.units.remove(id) else {
            return;
        };
        match unit.indoors {
            Some(state) => {
                if let Some(tile) =
                    self.interiors.get_mut(&state.building).and_then(|i| i.tile_mut(unit.pos))
                {
                    tile.occupant = Occupant::Empty;
                }
                self.leave_interior_view_if_empty(state.building);
            }
            None => self.world.set_occupant(unit.pos, Occupant::Empty),
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.modifiers.retain(|modifier| modifier.unit() != id);
        info!(name = %unit.name, turn = self.turn, "survivor died");
        self.log.push(LogEvent::UnitDied { name: unit.name });
        self.check_defeat();
    }

    /// Applies damage to a unit and handles death. Returns true when it died.
    pub(super) fn damage_unit(&mut self, id: UnitId, amount: i32) -> bool {
        let killed = self.units.get_mut(id).is_some_and(|unit| unit.take_damage(amount));
        if killed {
            self.kill_unit(id);
        }
        killed
    }

    pub(super) fn irradiate_unit(&mut self, id: UnitId, dose: f64) {
        if dose <= 0.0 {
            return;
        }
        let Some(unit) = self.units.get_mut(id) else {
            return;
        };
        if let Some(stage) = unit.add_radiation(dose) {
            self.log.push(LogEvent::ArsStageChanged { unit: id, stage });
        }
        self.log.push(LogEvent::RadiationTaken { unit: id, dose });
    }
}
