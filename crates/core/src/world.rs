//! Lazily materialized outdoor map.
//! This module exists so the infinite overworld is streamed chunk by chunk as
//! a deterministic function of the seed. It owns every outdoor tile,
//! including occupancy back-references. It does not own units, enemies or
//! interiors.

pub mod chunk;
pub mod classify;
mod fog;
mod roads;
pub mod tile;
mod urban;

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::WorldConfig;
use crate::content::Terrain;
use crate::noise_field::NoiseField;
use crate::pathfinding::NavGrid;
use crate::rng::Lcg32;
use crate::types::{Occupant, Pos};

pub use chunk::{Chunk, ChunkCoord, ChunkStage};
pub use classify::{Climate, classify, sample_climate};
pub use tile::{PropInstance, RoadLinks, Tile};

#[derive(Clone, Debug)]
pub struct World {
    seed: u64,
    noise: NoiseField,
    chunk_size: i32,
    max_coord: i32,
    chunks: BTreeMap<ChunkCoord, Chunk>,
    visible: Vec<Pos>,
}

impl World {
    pub fn new(seed: u64, config: &WorldConfig) -> Self {
        Self {
            seed,
            noise: NoiseField::new(seed),
            chunk_size: config.chunk_size.max(1),
            max_coord: config.max_coord,
            chunks: BTreeMap::new(),
            visible: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Coordinates lie in `[-max_coord, max_coord)` on both axes.
    pub fn in_bounds(&self, pos: Pos) -> bool {
        (-self.max_coord..self.max_coord).contains(&pos.x)
            && (-self.max_coord..self.max_coord).contains(&pos.y)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk(&self, cx: i32, cy: i32) -> Option<&Chunk> {
        self.chunks.get(&ChunkCoord::new(cx, cy))
    }

    /// Returns the chunk at `(cx, cy)`, inserting an empty one if needed.
    pub fn get_or_create_chunk(&mut self, cx: i32, cy: i32) -> &mut Chunk {
        let size = self.chunk_size;
        let coord = ChunkCoord::new(cx, cy);
        self.chunks.entry(coord).or_insert_with(|| Chunk::new(coord, size))
    }

    /// Classifies terrain for every tile of the chunk. No-op once generated.
    pub fn generate_chunk(&mut self, cx: i32, cy: i32) {
        let size = self.chunk_size;
        let coord = ChunkCoord::new(cx, cy);
        let chunk = self.chunks.entry(coord).or_insert_with(|| Chunk::new(coord, size));
        if chunk.is_generated() {
            return;
        }

        let noise = &self.noise;
        let origin = chunk.origin();
        chunk.tiles = (0..size)
            .flat_map(|ly| (0..size).map(move |lx| origin.offset(lx, ly)))
            .map(|pos| Tile::new(pos, sample_climate(noise, pos.x, pos.y)))
            .collect();
        chunk.stage = ChunkStage::Generated;
        debug!(cx, cy, "chunk generated");
    }

    /// Applies urban zones, props and roads. Generates first if needed and is
    /// a no-op once rendered.
    pub fn render_chunk(&mut self, cx: i32, cy: i32) {
        self.generate_chunk(cx, cy);
        let seed = self.seed;
        let chunk = self.get_or_create_chunk(cx, cy);
        if chunk.is_rendered() {
            return;
        }

        let mut rng = Lcg32::for_chunk(seed, cx, cy);
        let zones = urban::create_urban_zones(chunk, &mut rng);
        urban::place_props(chunk, &mut rng);
        let roads = roads::connect_buildings(chunk);
        chunk.stage = ChunkStage::Rendered;
        debug!(cx, cy, zones, buildings = chunk.building_anchors.len(), roads, "chunk rendered");
    }

    pub fn ensure_chunk_ready(&mut self, cx: i32, cy: i32) {
        self.render_chunk(cx, cy);
    }

    /// Makes every chunk touching the square of `radius` around `center` ready.
    pub fn ensure_area(&mut self, center: Pos, radius: i32) {
        let min = ChunkCoord::containing(center.offset(-radius, -radius), self.chunk_size);
        let max = ChunkCoord::containing(center.offset(radius, radius), self.chunk_size);
        for cy in min.cy..=max.cy {
            for cx in min.cx..=max.cx {
                self.ensure_chunk_ready(cx, cy);
            }
        }
    }

    /// Returns the tile at `pos`, materializing its chunk on demand. `None`
    /// outside the world bounds.
    pub fn get_tile_global(&mut self, pos: Pos) -> Option<&Tile> {
        self.tile_mut(pos).map(|tile| &*tile)
    }

    pub fn tile_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        let coord = ChunkCoord::containing(pos, self.chunk_size);
        self.ensure_chunk_ready(coord.cx, coord.cy);
        self.chunks.get_mut(&coord).and_then(|chunk| chunk.tile_mut(pos))
    }

    /// Already materialized tiles only; never generates.
    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        let coord = ChunkCoord::containing(pos, self.chunk_size);
        self.chunks.get(&coord).and_then(|chunk| chunk.tile(pos))
    }

    pub fn occupant(&self, pos: Pos) -> Occupant {
        self.tile(pos).map_or(Occupant::Empty, |tile| tile.occupant)
    }

    pub fn set_occupant(&mut self, pos: Pos, occupant: Occupant) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.occupant = occupant;
        }
    }

    /// Materialized, passable and unoccupied.
    pub fn is_open(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(Tile::is_open)
    }
}

/// Outdoor navigation sees materialized tiles only.
impl NavGrid for World {
    fn step_cost(&self, pos: Pos) -> Option<u32> {
        self.tile(pos).filter(|tile| tile.is_passable()).map(Tile::move_cost)
    }

    fn min_step_cost(&self) -> u32 {
        Terrain::Pavement.def().move_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(seed: u64) -> World {
        World::new(seed, &WorldConfig::default())
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut world = world(1);
        world.get_or_create_chunk(2, -3);
        world.get_or_create_chunk(2, -3);
        assert_eq!(world.chunk_count(), 1);
        assert_eq!(world.chunk(2, -3).map(|c| c.stage), Some(ChunkStage::Empty));
    }

    #[test]
    fn far_tile_materializes_only_its_chunk() {
        let mut world = world(42);
        let terrain = world.get_tile_global(Pos::new(500, 500)).map(|tile| tile.terrain);
        assert!(terrain.is_some());
        assert_eq!(world.chunk_count(), 1);
        assert!(world.chunk(25, 25).is_some_and(Chunk::is_rendered));
    }

    #[test]
    fn same_seed_same_tile_from_scratch() {
        let mut a = world(42);
        let mut b = world(42);
        for pos in [Pos::new(500, 500), Pos::new(-7, 13), Pos::new(0, 0)] {
            let ta = a.get_tile_global(pos).cloned().expect("tile a");
            let tb = b.get_tile_global(pos).cloned().expect("tile b");
            assert_eq!(ta.terrain, tb.terrain);
            assert_eq!(ta.elevation, tb.elevation);
            assert_eq!(ta.moisture, tb.moisture);
            assert_eq!(ta.props, tb.props);
        }
    }

    #[test]
    fn bounds_are_half_open() {
        let mut world = world(1);
        assert!(world.get_tile_global(Pos::new(-10_000, 0)).is_some());
        assert!(world.get_tile_global(Pos::new(10_000, 0)).is_none());
        assert!(world.get_tile_global(Pos::new(0, -10_001)).is_none());
    }

    #[test]
    fn rendering_twice_changes_nothing() {
        let mut world = world(99);
        world.render_chunk(0, 0);
        let before: Vec<Tile> = world.chunk(0, 0).map(|c| c.tiles.clone()).unwrap_or_default();
        world.render_chunk(0, 0);
        world.generate_chunk(0, 0);
        let after: Vec<Tile> = world.chunk(0, 0).map(|c| c.tiles.clone()).unwrap_or_default();
        assert_eq!(before, after);
    }

    #[test]
    fn overridden_terrain_snaps_radiation_to_base() {
        let mut world = world(5);
        for cy in -2..2 {
            for cx in -2..2 {
                world.render_chunk(cx, cy);
            }
        }
        for chunk in world.chunks() {
            for tile in &chunk.tiles {
                let classified = classify(tile.elevation, tile.moisture, tile.radiation_level);
                if tile.terrain != Terrain::Toxic && tile.terrain != classified {
                    assert_eq!(tile.radiation_level, tile.terrain.def().base_radiation);
                }
            }
        }
    }

    #[test]
    fn buildings_never_overlap_and_stay_in_chunk() {
        let mut world = world(2024);
        for cy in -3..3 {
            for cx in -3..3 {
                world.render_chunk(cx, cy);
            }
        }
        let mut buildings = 0;
        for chunk in world.chunks() {
            for tile in chunk.tiles.iter().filter(|tile| tile.has_building) {
                let (_, anchor) = tile.building().expect("building tile carries its prop");
                assert!(chunk.contains(anchor));
                assert_eq!(tile.props.len(), 1);
                buildings += 1;
            }
            for &anchor in &chunk.building_anchors {
                assert!(chunk.tile(anchor).is_some_and(|tile| tile.has_building));
            }
        }
        assert!(buildings > 0, "36 chunks should contain at least one building");
    }
}
