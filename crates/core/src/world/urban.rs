//! Urban zones and prop placement for one chunk.

use std::collections::BTreeSet;

use crate::content::{PropKind, Terrain};
use crate::rng::RandomSource;
use crate::types::Pos;

use super::chunk::{Chunk, footprint};
use super::tile::PropInstance;

const URBAN_ATTEMPTS: usize = 4;
const URBAN_MARGIN: i32 = 3;

fn resists_urbanization(terrain: Terrain) -> bool {
    matches!(terrain, Terrain::Water | Terrain::Toxic)
}

/// Rewrites terrain around up to four seeded centres: concrete at the core,
/// pavement or rubble toward the edge.
pub(super) fn create_urban_zones(chunk: &mut Chunk, rng: &mut impl RandomSource) -> usize {
    let origin = chunk.origin();
    let span = (chunk.size - 2 * URBAN_MARGIN).max(1) as usize;

    let mut centers = Vec::new();
    for _ in 0..URBAN_ATTEMPTS {
        let x = origin.x + URBAN_MARGIN + rng.index(span) as i32;
        let y = origin.y + URBAN_MARGIN + rng.index(span) as i32;
        let center = Pos::new(x, y);
        let accepted = chunk.tile(center).is_some_and(|tile| !resists_urbanization(tile.terrain));
        if accepted {
            centers.push((center, rng.int_inclusive(2, 3)));
        }
    }

    for &(center, size) in &centers {
        for dy in -size..=size {
            for dx in -size..=size {
                let distance = dx.abs() + dy.abs();
                if distance > size {
                    continue;
                }
                let Some(tile) = chunk.tile_mut(center.offset(dx, dy)) else {
                    continue;
                };
                if resists_urbanization(tile.terrain) {
                    continue;
                }
                let terrain = if distance <= 1 {
                    Terrain::Concrete
                } else if rng.chance(0.7) {
                    Terrain::Pavement
                } else {
                    Terrain::Rubble
                };
                tile.set_terrain(terrain);
            }
        }
    }
    centers.len()
}

/// Rolls the terrain's prop table on every tile, at most one prop per tile.
/// A building that does not fit falls through to the next entry.
pub(super) fn place_props(chunk: &mut Chunk, rng: &mut impl RandomSource) {
    let mut reserved = BTreeSet::new();
    let positions: Vec<Pos> = chunk.tiles.iter().map(|tile| tile.pos).collect();

    for pos in positions {
        let Some(terrain) = chunk.tile(pos).filter(|tile| !tile.has_building).map(|t| t.terrain)
        else {
            continue;
        };

        for entry in PropKind::spawn_table(terrain) {
            if !rng.chance(entry.chance) {
                continue;
            }
            let def = entry.kind.def();
            if def.building.is_none() {
                if let Some(tile) = chunk.tile_mut(pos) {
                    tile.props.push(PropInstance { kind: entry.kind, anchor: pos });
                }
                break;
            }

            let (width, height) = def.footprint;
            if !chunk.fits_footprint(pos, width, height)
                || footprint(pos, width, height).any(|cell| reserved.contains(&cell))
            {
                continue;
            }
            for cell in footprint(pos, width, height) {
                reserved.insert(cell);
                if let Some(tile) = chunk.tile_mut(cell) {
                    tile.has_building = true;
                    tile.props = vec![PropInstance { kind: entry.kind, anchor: pos }];
                }
            }
            chunk.building_anchors.push(pos);
            break;
        }
    }
}
