//! Unit movement outdoors and inside buildings.
//! Outdoors, movement is priced by terrain: the budget is move range times AP
//! in cost units, and the AP charged is the path cost divided by the move
//! range, rounded up. Indoors every step costs one AP.

use std::collections::VecDeque;

use tracing::debug;

use super::*;
use crate::content::COST_SCALE;
use crate::pathfinding::{Avoiding, find_path, movement_range, neighbors8, path_cost};

/// Breadth-first steps over passable interior tiles, up to `max_steps`.
fn indoor_steps(interior: &BuildingInterior, start: Pos, max_steps: u32) -> BTreeMap<Pos, u32> {
    let mut steps = BTreeMap::new();
    let mut queue = VecDeque::new();
    steps.insert(start, 0);
    queue.push_back(start);
    while let Some(pos) = queue.pop_front() {
        let depth = steps[&pos];
        if depth >= max_steps {
            continue;
        }
        for next in neighbors8(pos) {
            if steps.contains_key(&next) || !interior.tile(next).is_some_and(|t| t.is_passable()) {
                continue;
            }
            steps.insert(next, depth + 1);
            queue.push_back(next);
        }
    }
    steps
}

impl Game {
    /// Every tile the unit can move to this turn, with its AP cost.
    pub fn movement_range(&self, id: UnitId) -> BTreeMap<Pos, i32> {
        let Some(unit) = self.units.get(id) else {
            return BTreeMap::new();
        };
        let ap = unit.action_points.max(0);
        if let Some(state) = unit.indoors {
            let Some(interior) = self.interiors.get(&state.building) else {
                return BTreeMap::new();
            };
            let mut reach = indoor_steps(interior, unit.pos, ap as u32);
            reach.remove(&unit.pos);
            return reach
                .into_iter()
                .filter(|(pos, _)| interior.tile(*pos).is_some_and(|tile| tile.is_open()))
                .map(|(pos, steps)| (pos, steps as i32))
                .collect();
        }

        let range = self.effective_move_range(id).max(0) as u32;
        let budget = range * ap as u32 * COST_SCALE;
        let world = &self.world;
        let grid =
            Avoiding { grid: world, blocked: |pos: Pos| world.occupant(pos).enemy().is_some() };
        movement_range(&grid, unit.pos, budget, |pos| world.occupant(pos).unit().is_some())
            .into_iter()
            .map(|(pos, cost)| (pos, cost.div_ceil(range * COST_SCALE) as i32))
            .collect()
    }

    /// Moves a unit and returns the AP it spent.
    pub fn move_unit(&mut self, id: UnitId, to: Pos) -> Result<i32, GameError> {
        self.ensure_active()?;
        let unit = self.units.get(id).ok_or(GameError::UnknownUnit)?;
        let ap_spent = if unit.is_indoors() {
            self.move_indoors(id, to)?
        } else {
            self.move_outdoors(id, to)?
        };
        debug!(unit = ?id, x = to.x, y = to.y, ap_spent, "unit moved");
        self.log.push(LogEvent::UnitMoved { unit: id, to, ap_spent });
        Ok(ap_spent)
    }

    fn move_outdoors(&mut self, id: UnitId, to: Pos) -> Result<i32, GameError> {
        if !self.world.in_bounds(to) {
            return Err(GameError::OutOfBounds(to));
        }
        let unit = self.units.get(id).ok_or(GameError::UnknownUnit)?;
        let from = unit.pos;
        let available = unit.action_points;
        if !self.world.is_open(to) {
            return Err(GameError::Unreachable);
        }
        let range = self.effective_move_range(id).max(1) as u32;
        let world = &self.world;
        let grid =
            Avoiding { grid: world, blocked: |pos: Pos| world.occupant(pos).enemy().is_some() };
        let path = find_path(&grid, from, to).ok_or(GameError::Unreachable)?;
        let cost = path_cost(&grid, &path).ok_or(GameError::Unreachable)?;
        let needed = cost.div_ceil(range * COST_SCALE) as i32;
        if needed > available {
            return Err(GameError::NotEnoughAp { needed, available });
        }

        let radiation = &self.config.radiation;
        let factor = radiation.dose_per_turn * radiation.movement_dose_factor;
        let dose: f64 = path[1..]
            .iter()
            .filter_map(|&pos| self.world.tile(pos))
            .map(|tile| tile.radiation_level * factor)
            .sum();

        let unit = self.units.get_mut(id).ok_or(GameError::UnknownUnit)?;
        unit.spend_ap(needed)?;
        unit.pos = to;
        unit.display.retarget(to);
        self.world.set_occupant(from, Occupant::Empty);
        self.world.set_occupant(to, Occupant::Unit(id));
        self.world.reveal_around_position(to, self.config.world.reveal_radius);
        self.irradiate_unit(id, dose);
        Ok(needed)
    }

    fn move_indoors(&mut self, id: UnitId, to: Pos) -> Result<i32, GameError> {
        let unit = self.units.get(id).ok_or(GameError::UnknownUnit)?;
        let state = unit.indoors.ok_or(GameError::NotIndoors)?;
        let from = unit.pos;
        let available = unit.action_points;
        let interior = self.interiors.get(&state.building).ok_or(GameError::NotIndoors)?;
        if !interior.in_bounds(to) {
            return Err(GameError::OutOfBounds(to));
        }
        if !interior.tile(to).is_some_and(|tile| tile.is_open()) {
            return Err(GameError::Unreachable);
        }
        let reach = indoor_steps(interior, from, u32::MAX);
        let needed = reach.get(&to).copied().ok_or(GameError::Unreachable)? as i32;
        if needed > available {
            return Err(GameError::NotEnoughAp { needed, available });
        }

        let unit = self.units.get_mut(id).ok_or(GameError::UnknownUnit)?;
        unit.spend_ap(needed)?;
        unit.pos = to;
        unit.display.retarget(to);
        if let Some(interior) = self.interiors.get_mut(&state.building) {
            if let Some(tile) = interior.tile_mut(from) {
                tile.occupant = Occupant::Empty;
            }
            if let Some(tile) = interior.tile_mut(to) {
                tile.occupant = Occupant::Unit(id);
            }
        }
        Ok(needed)
    }
}
