//! Entering and leaving building interiors.
//! This module exists so the switch between the outdoor map and a cached
//! interior happens in one place: the unit changes coordinate space, the
//! outdoor tile is vacated or re-occupied, and the view follows. It does not
//! own interior layout, which is generated once per anchor and cached here.

use tracing::info;

use super::*;
use crate::content::InteriorTerrain;
use crate::interior::generate_interior;

/// Exit placement order around the building tile: S, N, E, W, SE, SW, NE, NW.
const EXIT_OFFSETS: [(i32, i32); 8] =
    [(0, 1), (0, -1), (1, 0), (-1, 0), (1, 1), (-1, 1), (1, -1), (-1, -1)];
const EXIT_SEARCH_RADIUS: i32 = 10;

/// Nearest open interior tile to `around`, by Chebyshev ring then row order.
fn nearest_open_indoor(interior: &BuildingInterior, around: Pos) -> Option<Pos> {
    if interior.tile(around).is_some_and(|tile| tile.is_open()) {
        return Some(around);
    }
    interior
        .tiles
        .iter()
        .filter(|tile| tile.is_open())
        .min_by_key(|tile| (tile.pos.chebyshev(around), tile.pos))
        .map(|tile| tile.pos)
}

impl Game {
    /// The interior the player is looking at, if any.
    pub fn current_interior(&self) -> Option<&BuildingInterior> {
        match self.view {
            ViewMode::Indoor { building } => self.interiors.get(&building),
            ViewMode::Outdoor => None,
        }
    }

    pub fn interior(&self, anchor: Pos) -> Option<&BuildingInterior> {
        self.interiors.get(&anchor)
    }

    pub fn interiors(&self) -> impl Iterator<Item = &BuildingInterior> {
        self.interiors.values()
    }

    /// Moves an outdoor unit into the building on `target`. Costs 1 AP.
    pub(super) fn enter_building(&mut self, id: UnitId, target: Pos) -> Result<Pos, GameError> {
        let unit = self.units.get(id).ok_or(GameError::UnknownUnit)?;
        if unit.is_indoors() {
            return Err(GameError::NotOutdoors);
        }
        let (kind, anchor) =
            self.world.tile(target).and_then(|tile| tile.building()).ok_or(GameError::NoTarget)?;
        if unit.pos.chebyshev(target) > 1 {
            return Err(GameError::OutOfRange);
        }
        if unit.action_points < 1 {
            return Err(GameError::NotEnoughAp { needed: 1, available: unit.action_points });
        }
        let from = unit.pos;

        let interior = match self.interiors.remove(&anchor) {
            Some(cached) => cached,
            None => generate_interior(anchor, kind, self.seed),
        };
        let spot = nearest_open_indoor(&interior, interior.entry);
        let interior = self.interiors.entry(anchor).or_insert(interior);
        let spot = spot.ok_or(GameError::Unreachable)?;
        if let Some(tile) = interior.tile_mut(spot) {
            tile.occupant = Occupant::Unit(id);
        }

        let unit = self.units.get_mut(id).ok_or(GameError::UnknownUnit)?;
        unit.spend_ap(1)?;
        unit.indoors = Some(IndoorState { building: anchor, entered_from: target });
        unit.pos = spot;
        unit.display.snap_to(spot);
        let name = unit.name.clone();
        self.world.set_occupant(from, Occupant::Empty);
        self.view = ViewMode::Indoor { building: anchor };
        info!(unit = %name, x = anchor.x, y = anchor.y, "entered building");
        self.log.push(LogEvent::EnteredBuilding { unit: id, building: anchor });
        Ok(spot)
    }

    /// Leaves through an exit or window next to the unit. Costs 1 AP.
    pub(super) fn exit_building(&mut self, id: UnitId, via: Pos) -> Result<Pos, GameError> {
        let unit = self.units.get(id).ok_or(GameError::UnknownUnit)?;
        let state = unit.indoors.ok_or(GameError::NotIndoors)?;
        let interior = self.interiors.get(&state.building).ok_or(GameError::NotIndoors)?;
        let terrain = interior.tile(via).map(|tile| tile.terrain);
        if !matches!(terrain, Some(InteriorTerrain::Exit | InteriorTerrain::Window)) {
            return Err(GameError::NoTarget);
        }
        if unit.pos.chebyshev(via) > 1 {
            return Err(GameError::OutOfRange);
        }
        if unit.action_points < 1 {
            return Err(GameError::NotEnoughAp { needed: 1, available: unit.action_points });
        }
        let inside = unit.pos;
        let to = self.exit_position(state.entered_from).ok_or(GameError::Unreachable)?;

        let interior = self.interiors.get_mut(&state.building);
        if let Some(tile) = interior.and_then(|interior| interior.tile_mut(inside)) {
            tile.occupant = Occupant::Empty;
        }
        let unit = self.units.get_mut(id).ok_or(GameError::UnknownUnit)?;
        unit.spend_ap(1)?;
        unit.indoors = None;
        unit.pos = to;
        unit.display.snap_to(to);
        let name = unit.name.clone();
        self.world.set_occupant(to, Occupant::Unit(id));
        self.world.reveal_around_position(to, self.config.world.reveal_radius);
        self.leave_interior_view_if_empty(state.building);
        info!(unit = %name, x = to.x, y = to.y, "left building");
        self.log.push(LogEvent::ExitedBuilding { unit: id, to });
        Ok(to)
    }

    /// First open neighbour of the building tile in exit order, then the
    /// nearest open tile on widening rings.
    fn exit_position(&mut self, around: Pos) -> Option<Pos> {
        for (dx, dy) in EXIT_OFFSETS {
            let pos = around.offset(dx, dy);
            if self.world.get_tile_global(pos).is_some_and(|tile| tile.is_open()) {
                return Some(pos);
            }
        }
        for radius in 2..=EXIT_SEARCH_RADIUS {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx.abs() != radius && dy.abs() != radius {
                        continue;
                    }
                    let pos = around.offset(dx, dy);
                    if self.world.get_tile_global(pos).is_some_and(|tile| tile.is_open()) {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }

    pub(super) fn leave_interior_view_if_empty(&mut self, building: Pos) {
        if self.view != (ViewMode::Indoor { building }) {
            return;
        }
        let occupied = self
            .units
            .values()
            .any(|unit| unit.indoors.is_some_and(|state| state.building == building));
        if !occupied {
            self.view = ViewMode::Outdoor;
        }
    }
}
