//! Immutable type catalogs.
//! This module exists so terrain, props, furniture, rooms, buildings, loot and
//! cards are described once as static data and joined to instance state by
//! enum lookup. It does not own any per-tile or per-entity mutable state.

pub mod cards;
pub mod interior;
pub mod props;
pub mod terrain;

pub use cards::{CardEffect, CardKind, CardTemplate, CardType, TargetType};
pub use interior::{
    BuildingKind, BuildingTemplate, FurnitureDef, FurnitureKind, LootBand, LootTable, RoomDef,
    RoomKind,
};
pub use props::{PropDef, PropKind, PropSpawn};
pub use terrain::{COST_SCALE, InteriorTerrain, InteriorTerrainDef, Terrain, TerrainDef};
