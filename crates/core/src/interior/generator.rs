//! BSP room splitting, doors, exits, furniture and windows.
//! Every step draws from one xorshift stream in a fixed order, so the same
//! anchor and world seed always yield the same layout.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::content::{BuildingKind, BuildingTemplate, InteriorTerrain, RoomKind};
use crate::rng::{RandomSource, XorShift32, spatial_seed};
use crate::types::Pos;

use super::model::{BuildingInterior, Door, FurnitureState, Room};

const MIN_SPLIT_SIDE: i32 = 5;
const LOCKED_DOOR_CHANCE: f64 = 0.2;
const LOCKED_FURNITURE_CHANCE: f64 = 0.3;

#[derive(Clone, Copy, Debug)]
struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    splittable: bool,
}

impl Rect {
    fn area(&self) -> i32 {
        self.width * self.height
    }
}

#[derive(Clone, Copy, Debug)]
struct SplitWall {
    vertical: bool,
    at: i32,
    start: i32,
    end: i32,
}

pub fn generate_interior(anchor: Pos, kind: BuildingKind, world_seed: u64) -> BuildingInterior {
    let seed = spatial_seed(anchor.x, anchor.y, world_seed);
    let mut rng = XorShift32::new(seed);
    let template = kind.template();
    let mut interior =
        BuildingInterior::blank(anchor, kind, seed, template.width, template.height);

    let (rects, walls, kinds) = split_rooms(&interior, &template, &mut rng);
    assign_rooms(&mut interior, &rects, &kinds);
    carve_walls(&mut interior, &walls);
    connect_rooms(&mut interior, &mut rng);
    place_exits(&mut interior);
    place_furniture(&mut interior, &mut rng);
    place_windows(&mut interior, &mut rng);

    debug!(
        x = anchor.x,
        y = anchor.y,
        building = template.name,
        rooms = interior.rooms.len(),
        doors = interior.doors.len(),
        furniture = interior.furniture.len(),
        windows = interior.windows.len(),
        "interior generated"
    );
    interior
}

fn split_rooms(
    interior: &BuildingInterior,
    template: &BuildingTemplate,
    rng: &mut XorShift32,
) -> (Vec<Rect>, Vec<SplitWall>, Vec<RoomKind>) {
    let target = rng.int_inclusive(template.min_rooms, template.max_rooms).max(1) as usize;
    let mut kinds = template.rooms.to_vec();
    rng.shuffle(&mut kinds);

    let mut rects = vec![Rect {
        x: 1,
        y: 1,
        width: interior.width - 2,
        height: interior.height - 2,
        splittable: true,
    }];
    let mut walls = Vec::new();

    while rects.len() < target {
        let mut largest: Option<usize> = None;
        for (idx, rect) in rects.iter().enumerate() {
            if !rect.splittable || rect.width < MIN_SPLIT_SIDE || rect.height < MIN_SPLIT_SIDE {
                continue;
            }
            if largest.is_none_or(|best| rect.area() > rects[best].area()) {
                largest = Some(idx);
            }
        }
        let Some(idx) = largest else {
            break;
        };

        let room = rects[idx];
        let vertical = match room.width.cmp(&room.height) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => rng.chance(0.5),
        };
        let (start, len) = if vertical { (room.x, room.width) } else { (room.y, room.height) };
        let (lo, hi) = (start + 2, start + len - 3);
        if hi < lo {
            rects[idx].splittable = false;
            continue;
        }
        let at = rng.int_inclusive(lo, hi);

        rects.remove(idx);
        if vertical {
            rects.push(Rect { width: at - room.x, ..room });
            rects.push(Rect { x: at + 1, width: room.x + room.width - at - 1, ..room });
            walls.push(SplitWall { vertical, at, start: room.y, end: room.y + room.height });
        } else {
            rects.push(Rect { height: at - room.y, ..room });
            rects.push(Rect { y: at + 1, height: room.y + room.height - at - 1, ..room });
            walls.push(SplitWall { vertical, at, start: room.x, end: room.x + room.width });
        }
    }

    (rects, walls, kinds)
}

fn assign_rooms(interior: &mut BuildingInterior, rects: &[Rect], kinds: &[RoomKind]) {
    for (id, rect) in rects.iter().enumerate() {
        let kind = kinds.get(id % kinds.len().max(1)).copied().unwrap_or(RoomKind::Storage);
        let room = Room { id, x: rect.x, y: rect.y, width: rect.width, height: rect.height, kind };
        for y in room.y..room.y + room.height {
            for x in room.x..room.x + room.width {
                if let Some(tile) = interior.tile_mut(Pos::new(x, y))
                    && tile.terrain == InteriorTerrain::Floor
                {
                    tile.room = Some(id);
                }
            }
        }
        interior.rooms.push(room);
    }
}

fn carve_walls(interior: &mut BuildingInterior, walls: &[SplitWall]) {
    for wall in walls {
        for along in wall.start..wall.end {
            let pos =
                if wall.vertical { Pos::new(wall.at, along) } else { Pos::new(along, wall.at) };
            if let Some(tile) = interior.tile_mut(pos) {
                tile.terrain = InteriorTerrain::Wall;
                tile.room = None;
            }
        }
    }
}

/// Grows a connected set from room 0, carving one door per newly joined
/// room. A room with no shared wall to the connected set is joined without
/// a door and counted in `forced_connections`.
///
/// A door only stays locked when the new room also gets an unlocked door to
/// some already connected room, so unlocked doors alone always span the
/// connected set.
fn connect_rooms(interior: &mut BuildingInterior, rng: &mut XorShift32) {
    let count = interior.rooms.len();
    if count <= 1 {
        return;
    }
    let mut connected = vec![0_usize];
    let mut unconnected: BTreeSet<usize> = (1..count).collect();

    while let Some(&first) = unconnected.first() {
        let mut found = None;
        'search: for &a in &connected {
            for &b in &unconnected {
                if let Some(pos) = door_position(interior, a, b) {
                    found = Some((a, b, pos));
                    break 'search;
                }
            }
        }

        let joined = match found {
            Some((a, b, pos)) => {
                let bypass = if rng.chance(LOCKED_DOOR_CHANCE) {
                    bypass_door(interior, &connected, b, pos)
                } else {
                    None
                };
                let locked = bypass.is_some();
                let terrain =
                    if locked { InteriorTerrain::LockedDoor } else { InteriorTerrain::ClosedDoor };
                interior.set_terrain(pos, terrain);
                interior.doors.push(Door { pos, locked, rooms: [a, b] });
                if let Some((c, bypass_pos)) = bypass {
                    interior.set_terrain(bypass_pos, InteriorTerrain::ClosedDoor);
                    interior.doors.push(Door { pos: bypass_pos, locked: false, rooms: [c, b] });
                }
                b
            }
            None => {
                warn!(
                    x = interior.anchor.x,
                    y = interior.anchor.y,
                    room = first,
                    "no shared wall found; room joined without a door"
                );
                interior.forced_connections += 1;
                first
            }
        };
        connected.push(joined);
        unconnected.remove(&joined);
    }
}

fn door_position(interior: &BuildingInterior, a: usize, b: usize) -> Option<Pos> {
    door_candidates(interior, a, b).first().copied()
}

/// A second way into room `b` from the connected set, not touching the
/// door at `locked`.
fn bypass_door(
    interior: &BuildingInterior,
    connected: &[usize],
    b: usize,
    locked: Pos,
) -> Option<(usize, Pos)> {
    connected.iter().find_map(|&c| {
        door_candidates(interior, c, b)
            .into_iter()
            .find(|pos| pos.chebyshev(locked) > 1)
            .map(|pos| (c, pos))
    })
}

/// Wall tiles with floor of room `a` on one side and room `b` directly
/// opposite, nearest the midpoint of the two room centres first.
fn door_candidates(interior: &BuildingInterior, a: usize, b: usize) -> Vec<Pos> {
    let room_of = |pos: Pos| interior.tile(pos).and_then(|tile| tile.room);
    let joins = |p: Pos, q: Pos| {
        let pair = (room_of(p), room_of(q));
        pair == (Some(a), Some(b)) || pair == (Some(b), Some(a))
    };

    let mut candidates = Vec::new();
    for y in 1..interior.height - 1 {
        for x in 1..interior.width - 1 {
            let pos = Pos::new(x, y);
            if interior.terrain(pos) != InteriorTerrain::Wall {
                continue;
            }
            let across_x = joins(pos.offset(-1, 0), pos.offset(1, 0));
            if across_x || joins(pos.offset(0, -1), pos.offset(0, 1)) {
                candidates.push(pos);
            }
        }
    }

    let (ca, cb) = (interior.rooms[a].center(), interior.rooms[b].center());
    // Doubled coordinates keep the half-tile midpoint integral.
    let (mid_x2, mid_y2) = (ca.x + cb.x, ca.y + cb.y);
    candidates.sort_by_key(|pos| (2 * pos.x - mid_x2).abs() + (2 * pos.y - mid_y2).abs());
    candidates
}

/// Entry on the bottom wall nearest the centre column, plus a back exit on
/// the top wall where geometry allows.
fn place_exits(interior: &mut BuildingInterior) {
    let (width, height) = (interior.width, interior.height);
    let bottom = height - 1;
    let center = width / 2;
    let mut entry_x = center;

    'search: for offset in 0..width {
        let columns =
            if offset == 0 { vec![center] } else { vec![center + offset, center - offset] };
        for x in columns {
            let floor = interior.terrain(Pos::new(x, bottom - 1)) == InteriorTerrain::Floor;
            if x > 0 && x < width - 1 && floor {
                entry_x = x;
                break 'search;
            }
        }
    }

    mark_exit(interior, Pos::new(entry_x, bottom));
    interior.entry = Pos::new(entry_x, bottom - 1);

    for x in 1..width - 1 {
        if interior.terrain(Pos::new(x, 1)) == InteriorTerrain::Floor
            && interior.terrain(Pos::new(x, 0)) == InteriorTerrain::Wall
        {
            mark_exit(interior, Pos::new(x, 0));
            break;
        }
    }
}

fn mark_exit(interior: &mut BuildingInterior, pos: Pos) {
    if let Some(tile) = interior.tile_mut(pos) {
        tile.terrain = InteriorTerrain::Exit;
        tile.is_exit = true;
        interior.exits.push(pos);
    }
}

fn adjacent_walls(interior: &BuildingInterior, pos: Pos) -> usize {
    [pos.offset(-1, 0), pos.offset(1, 0), pos.offset(0, -1), pos.offset(0, 1)]
        .into_iter()
        .filter(|&next| interior.terrain(next) == InteriorTerrain::Wall)
        .count()
}

fn place_furniture(interior: &mut BuildingInterior, rng: &mut XorShift32) {
    let keep_clear: Vec<Pos> =
        interior.doors.iter().map(|door| door.pos).chain(interior.exits.iter().copied()).collect();

    for room in interior.rooms.clone() {
        let def = room.kind.def();
        let count = rng.int_inclusive(def.min_furniture, def.max_furniture).max(0) as usize;
        let mut kinds = def.furniture.to_vec();
        rng.shuffle(&mut kinds);
        if kinds.is_empty() {
            continue;
        }

        let mut candidates = Vec::new();
        for y in room.y..room.y + room.height {
            for x in room.x..room.x + room.width {
                let pos = Pos::new(x, y);
                let Some(tile) = interior.tile(pos) else {
                    continue;
                };
                if tile.terrain != InteriorTerrain::Floor || tile.is_exit || pos == interior.entry {
                    continue;
                }
                if keep_clear.iter().any(|&clear| clear.chebyshev(pos) <= 1) {
                    continue;
                }
                candidates.push((pos, adjacent_walls(interior, pos)));
            }
        }
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        for (placed, &(pos, _)) in candidates.iter().take(count).enumerate() {
            let kind = kinds[placed % kinds.len()];
            let locked = kind.def().lockable && rng.chance(LOCKED_FURNITURE_CHANCE);
            if let Some(tile) = interior.tile_mut(pos) {
                tile.furniture = Some(FurnitureState { kind, locked, searched: false });
                interior.furniture.push(pos);
            }
        }
    }
}

fn place_windows(interior: &mut BuildingInterior, rng: &mut XorShift32) {
    let count = rng.int_inclusive(1, 3) as usize;
    let (width, height) = (interior.width, interior.height);
    let is_candidate = |wall: Pos, inside: Pos| {
        interior.terrain(wall) == InteriorTerrain::Wall
            && interior.terrain(inside) == InteriorTerrain::Floor
    };

    let mut candidates = Vec::new();
    for y in 2..height - 2 {
        if is_candidate(Pos::new(0, y), Pos::new(1, y)) {
            candidates.push(Pos::new(0, y));
        }
    }
    for y in 2..height - 2 {
        if is_candidate(Pos::new(width - 1, y), Pos::new(width - 2, y)) {
            candidates.push(Pos::new(width - 1, y));
        }
    }
    for x in 2..width - 2 {
        if is_candidate(Pos::new(x, 0), Pos::new(x, 1)) {
            candidates.push(Pos::new(x, 0));
        }
    }
    rng.shuffle(&mut candidates);

    for pos in candidates.into_iter().take(count) {
        if interior.terrain(pos) == InteriorTerrain::Wall {
            interior.set_terrain(pos, InteriorTerrain::Window);
            interior.windows.push(pos);
        }
    }
}
