//! Shared supplies, radiation exposure and hunger/thirst decay.
//! This module exists so the end-of-turn attrition rules and the consumables
//! that counter them live together. It does not own ARS stage bookkeeping,
//! which belongs to the unit.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::*;
use crate::config::StartingResources;

const WATER_RESTORE: i32 = 30;
const FOOD_RESTORE: i32 = 25;
const MEDICINE_HEAL: i32 = 40;
const LOW_STOCK: i32 = 3;

/// Party-wide counters. Never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalResources {
    pub scrap: i32,
    pub medicine: i32,
    pub food: i32,
    pub water: i32,
}

impl GlobalResources {
    pub fn from_config(config: &StartingResources) -> Self {
        Self {
            scrap: config.scrap.max(0),
            medicine: config.medicine.max(0),
            food: config.food.max(0),
            water: config.water.max(0),
        }
    }

    pub fn get(&self, resource: Resource) -> i32 {
        match resource {
            Resource::Scrap => self.scrap,
            Resource::Medicine => self.medicine,
            Resource::Food => self.food,
            Resource::Water => self.water,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut i32 {
        match resource {
            Resource::Scrap => &mut self.scrap,
            Resource::Medicine => &mut self.medicine,
            Resource::Food => &mut self.food,
            Resource::Water => &mut self.water,
        }
    }

    /// Adds `amount`, flooring the counter at zero.
    pub fn add(&mut self, resource: Resource, amount: i32) {
        let slot = self.slot(resource);
        *slot = slot.saturating_add(amount).max(0);
    }

    /// Takes `amount` only if all of it is available.
    pub fn spend(&mut self, resource: Resource, amount: i32) -> bool {
        let slot = self.slot(resource);
        if *slot < amount {
            return false;
        }
        *slot -= amount;
        true
    }
}

/// Damage from thirst and hunger after decay has been applied.
fn deprivation_damage(hydration: i32, nutrition: i32) -> i32 {
    let thirst = match hydration {
        ..=0 => 10,
        1..20 => 3,
        _ => 0,
    };
    let hunger = match nutrition {
        ..=0 => 5,
        1..20 => 2,
        _ => 0,
    };
    thirst + hunger
}

impl Game {
    pub(super) fn gain_resource(&mut self, resource: Resource, amount: i32) {
        self.resources.add(resource, amount);
        if amount > 0 {
            self.log.push(LogEvent::ResourceGained { resource, amount });
        }
    }

    /// Dose from the tile each outdoor unit stands on, then ARS effects.
    pub(super) fn apply_radiation_phase(&mut self) {
        let ids: Vec<UnitId> = self.units.keys().collect();
        let per_turn = self.config.radiation.dose_per_turn;
        for id in ids {
            let Some(unit) = self.units.get(id) else {
                continue;
            };
            if !unit.is_indoors() {
                let level = self.world.tile(unit.pos).map_or(0.0, |tile| tile.radiation_level);
                self.irradiate_unit(id, level * per_turn);
            }
            let drain = self.units.get_mut(id).map_or(0, Unit::apply_ars_effects);
            if drain > 0 {
                debug!(unit = ?id, drain, "ARS drain");
                self.damage_unit(id, drain);
            }
        }
    }

    pub(super) fn apply_decay_phase(&mut self) {
        let ids: Vec<UnitId> = self.units.keys().collect();
        let hydration_decay = self.config.unit.hydration_decay;
        let nutrition_decay = self.config.unit.nutrition_decay;
        for id in ids {
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };
            unit.hydrate(-hydration_decay);
            unit.nourish(-nutrition_decay);
            let damage = deprivation_damage(unit.hydration, unit.nutrition);
            if damage > 0 {
                self.damage_unit(id, damage);
            }
        }
    }

    /// Consumes one unit of water, food or medicine on the selected unit.
    /// Free of AP.
    pub fn use_supply(&mut self, resource: Resource) -> Result<Resource, GameError> {
        self.ensure_active()?;
        let id = self.selected_unit()?;
        if resource == Resource::Scrap {
            return Err(GameError::ActionUnavailable);
        }
        if !self.resources.spend(resource, 1) {
            return Err(GameError::OutOfSupplies(resource));
        }
        let unit = self.units.get_mut(id).ok_or(GameError::UnknownUnit)?;
        match resource {
            Resource::Water => unit.hydrate(WATER_RESTORE),
            Resource::Food => unit.nourish(FOOD_RESTORE),
            Resource::Medicine => unit.heal(MEDICINE_HEAL),
            Resource::Scrap => {}
        }
        self.log.push(LogEvent::SupplyUsed { unit: id, resource });
        Ok(resource)
    }

    pub fn resource_warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.resources.water < LOW_STOCK {
            warnings.push("Low water");
        }
        if self.resources.food < LOW_STOCK {
            warnings.push("Low food");
        }
        if self.resources.medicine == 0 {
            warnings.push("No medicine");
        }
        warnings
    }
}
