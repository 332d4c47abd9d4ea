use crate::content::{BuildingKind, PropKind, Terrain};
use crate::types::{Occupant, Pos};

use super::classify::{Climate, classify};

/// A prop covering a tile. Multi-tile props repeat on every covered tile
/// with the same anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropInstance {
    pub kind: PropKind,
    pub anchor: Pos,
}

/// Which neighbours a road continues toward. Render-only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoadLinks {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub pos: Pos,
    pub elevation: f64,
    pub moisture: f64,
    pub radiation_level: f64,
    pub terrain: Terrain,
    pub revealed: bool,
    pub has_building: bool,
    pub has_road: bool,
    pub road_links: RoadLinks,
    pub occupant: Occupant,
    pub props: Vec<PropInstance>,
    pub times_searched: u32,
}

impl Tile {
    pub fn new(pos: Pos, climate: Climate) -> Self {
        Self {
            pos,
            elevation: climate.elevation,
            moisture: climate.moisture,
            radiation_level: climate.radiation,
            terrain: classify(climate.elevation, climate.moisture, climate.radiation),
            revealed: false,
            has_building: false,
            has_road: false,
            road_links: RoadLinks::default(),
            occupant: Occupant::Empty,
            props: Vec::new(),
            times_searched: 0,
        }
    }

    /// Overrides the classified terrain; radiation snaps to the new base.
    pub fn set_terrain(&mut self, terrain: Terrain) {
        self.terrain = terrain;
        self.radiation_level = terrain.def().base_radiation;
    }

    pub fn move_cost(&self) -> u32 {
        self.terrain.def().move_cost
    }

    pub fn is_passable(&self) -> bool {
        self.terrain.def().passable && !self.has_building
    }

    /// Passable and free of any entity.
    pub fn is_open(&self) -> bool {
        self.is_passable() && self.occupant.is_empty()
    }

    pub fn prop(&self) -> Option<PropInstance> {
        self.props.first().copied()
    }

    pub fn has_prop(&self, kind: PropKind) -> bool {
        self.props.iter().any(|prop| prop.kind == kind)
    }

    pub fn remove_prop(&mut self, kind: PropKind) {
        self.props.retain(|prop| prop.kind != kind);
    }

    pub fn building(&self) -> Option<(BuildingKind, Pos)> {
        self.props
            .iter()
            .find_map(|prop| prop.kind.def().building.map(|building| (building, prop.anchor)))
    }
}
