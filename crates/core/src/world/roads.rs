//! Roads between the buildings of one chunk.
//! Links are render-only; the only simulation effect is the pavement
//! terrain override.

use std::collections::{BTreeMap, BTreeSet};

use crate::content::Terrain;
use crate::types::Pos;

use super::chunk::Chunk;
use super::tile::RoadLinks;

const NEAREST_NEIGHBOURS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

/// Connects every anchor to its two nearest other anchors. Returns the
/// number of road tiles laid.
pub(super) fn connect_buildings(chunk: &mut Chunk) -> usize {
    let anchors = chunk.building_anchors.clone();
    if anchors.len() < 2 {
        return 0;
    }

    let mut links: BTreeMap<Pos, RoadLinks> = BTreeMap::new();
    let mut connected = BTreeSet::new();

    for &from in &anchors {
        let mut others: Vec<Pos> = anchors.iter().copied().filter(|&other| other != from).collect();
        others.sort_by_key(|&other| (from.manhattan(other), other));

        for &to in others.iter().take(NEAREST_NEIGHBOURS) {
            if !connected.insert((from.min(to), from.max(to))) {
                continue;
            }
            let path = road_path(chunk, from, to);
            for (i, &tile) in path.iter().enumerate() {
                let entry = links.entry(tile).or_default();
                if i > 0 {
                    link_toward(entry, tile, path[i - 1]);
                }
                if let Some(&next) = path.get(i + 1) {
                    link_toward(entry, tile, next);
                }
            }
        }
    }

    let mut laid = 0;
    for (pos, road_links) in links {
        let Some(tile) = chunk.tile_mut(pos) else {
            continue;
        };
        if tile.has_building {
            continue;
        }
        if !matches!(tile.terrain, Terrain::Toxic | Terrain::Water) {
            tile.set_terrain(Terrain::Pavement);
        }
        tile.has_road = true;
        tile.road_links = road_links;
        laid += 1;
    }
    laid
}

fn link_toward(links: &mut RoadLinks, from: Pos, toward: Pos) {
    if toward.y < from.y {
        links.north = true;
    }
    if toward.y > from.y {
        links.south = true;
    }
    if toward.x > from.x {
        links.east = true;
    }
    if toward.x < from.x {
        links.west = true;
    }
}

/// Cardinal A* inside the chunk with unit step cost. Buildings block except
/// the goal. The returned path excludes `start` and is empty when no route
/// exists.
fn road_path(chunk: &Chunk, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut open_set = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let mut closed = BTreeSet::new();

    let h = start.manhattan(goal);
    open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
    g_score.insert(start, 0_u32);

    while let Some(current) = open_set.pop_first() {
        let pos = Pos { y: current.y, x: current.x };
        if pos == goal {
            let mut path = vec![goal];
            let mut step = goal;
            while let Some(&prev) = came_from.get(&step) {
                if prev == start {
                    break;
                }
                path.push(prev);
                step = prev;
            }
            path.reverse();
            return path;
        }
        if !closed.insert(pos) {
            continue;
        }
        let Some(&current_g) = g_score.get(&pos) else {
            continue;
        };

        for next in [pos.offset(0, -1), pos.offset(0, 1), pos.offset(1, 0), pos.offset(-1, 0)] {
            if closed.contains(&next) {
                continue;
            }
            let Some(tile) = chunk.tile(next) else {
                continue;
            };
            if tile.has_building && next != goal {
                continue;
            }
            let tentative = current_g + 1;
            if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                came_from.insert(next, pos);
                g_score.insert(next, tentative);
                let h = next.manhattan(goal);
                open_set.insert(OpenNode { f: tentative + h, h, y: next.y, x: next.x });
            }
        }
    }
    Vec::new()
}
