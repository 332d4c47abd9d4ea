use serde::{Deserialize, Serialize};

use crate::content::{BuildingKind, FurnitureKind, InteriorTerrain, RoomKind};
use crate::pathfinding::NavGrid;
use crate::types::{Occupant, Pos};

/// Per-tile furniture instance; the catalog entry is looked up by `kind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureState {
    pub kind: FurnitureKind,
    pub locked: bool,
    pub searched: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteriorTile {
    pub pos: Pos,
    pub terrain: InteriorTerrain,
    pub room: Option<usize>,
    pub furniture: Option<FurnitureState>,
    pub is_exit: bool,
    #[serde(skip)]
    pub occupant: Occupant,
}

impl InteriorTile {
    fn new(pos: Pos, terrain: InteriorTerrain) -> Self {
        Self {
            pos,
            terrain,
            room: None,
            furniture: None,
            is_exit: false,
            occupant: Occupant::Empty,
        }
    }

    /// Furniture blocks movement on top of the terrain rule.
    pub fn is_passable(&self) -> bool {
        self.terrain.def().passable && self.furniture.is_none()
    }

    pub fn is_open(&self) -> bool {
        self.is_passable() && self.occupant.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.terrain == InteriorTerrain::LockedDoor || self.furniture.is_some_and(|f| f.locked)
    }

    /// Locked door becomes closed, or locked furniture becomes unlocked.
    pub fn unlock(&mut self) -> bool {
        if self.terrain == InteriorTerrain::LockedDoor {
            self.terrain = InteriorTerrain::ClosedDoor;
            return true;
        }
        match &mut self.furniture {
            Some(furniture) if furniture.locked => {
                furniture.locked = false;
                true
            }
            _ => false,
        }
    }

    pub fn toggle_door(&mut self) -> bool {
        self.terrain = match self.terrain {
            InteriorTerrain::ClosedDoor => InteriorTerrain::OpenDoor,
            InteriorTerrain::OpenDoor => InteriorTerrain::ClosedDoor,
            _ => return false,
        };
        true
    }

    pub fn break_door(&mut self) -> bool {
        if self.terrain != InteriorTerrain::LockedDoor {
            return false;
        }
        self.terrain = InteriorTerrain::OpenDoor;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: usize,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub kind: RoomKind,
}

impl Room {
    pub fn center(&self) -> Pos {
        Pos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        (self.x..self.x + self.width).contains(&pos.x)
            && (self.y..self.y + self.height).contains(&pos.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub pos: Pos,
    pub locked: bool,
    pub rooms: [usize; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingInterior {
    pub anchor: Pos,
    pub kind: BuildingKind,
    pub seed: u32,
    pub width: i32,
    pub height: i32,
    /// Row-major.
    pub tiles: Vec<InteriorTile>,
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub furniture: Vec<Pos>,
    /// Floor tile the player stands on after entering.
    pub entry: Pos,
    pub exits: Vec<Pos>,
    pub windows: Vec<Pos>,
    /// Rooms marked connected without a carved door.
    pub forced_connections: u32,
}

impl BuildingInterior {
    /// Perimeter walls around open floor.
    pub(super) fn blank(
        anchor: Pos,
        kind: BuildingKind,
        seed: u32,
        width: i32,
        height: i32,
    ) -> Self {
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Pos::new(x, y)))
            .map(|pos| {
                let edge_x = pos.x == 0 || pos.x == width - 1;
                let edge_y = pos.y == 0 || pos.y == height - 1;
                let terrain =
                    if edge_x || edge_y { InteriorTerrain::Wall } else { InteriorTerrain::Floor };
                InteriorTile::new(pos, terrain)
            })
            .collect();
        Self {
            anchor,
            kind,
            seed,
            width,
            height,
            tiles,
            rooms: Vec::new(),
            doors: Vec::new(),
            furniture: Vec::new(),
            entry: Pos::new(width / 2, height - 2),
            exits: Vec::new(),
            windows: Vec::new(),
            forced_connections: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.template().name
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn tile(&self, pos: Pos) -> Option<&InteriorTile> {
        self.index(pos).and_then(|idx| self.tiles.get(idx))
    }

    pub fn tile_mut(&mut self, pos: Pos) -> Option<&mut InteriorTile> {
        self.index(pos).and_then(|idx| self.tiles.get_mut(idx))
    }

    /// Out-of-bounds reads as wall.
    pub fn terrain(&self, pos: Pos) -> InteriorTerrain {
        self.tile(pos).map_or(InteriorTerrain::Wall, |tile| tile.terrain)
    }

    pub(super) fn set_terrain(&mut self, pos: Pos, terrain: InteriorTerrain) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.terrain = terrain;
        }
    }

    pub fn room_at(&self, pos: Pos) -> Option<&Room> {
        self.tile(pos).and_then(|tile| tile.room).and_then(|id| self.rooms.get(id))
    }

    /// Exit tiles followed by windows; both lead back outdoors.
    pub fn exit_tiles(&self) -> Vec<Pos> {
        self.exits.iter().chain(&self.windows).copied().collect()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.anchor.x.to_le_bytes());
        bytes.extend(self.anchor.y.to_le_bytes());
        bytes.extend(self.seed.to_le_bytes());
        bytes.extend(self.width.to_le_bytes());
        bytes.extend(self.height.to_le_bytes());
        for tile in &self.tiles {
            bytes.push(tile.terrain as u8);
            bytes.extend(tile.room.map_or(u32::MAX, |id| id as u32).to_le_bytes());
            match tile.furniture {
                Some(furniture) => {
                    bytes.push(furniture.kind as u8);
                    bytes.push(u8::from(furniture.locked));
                    bytes.push(u8::from(furniture.searched));
                }
                None => bytes.push(u8::MAX),
            }
            bytes.push(u8::from(tile.is_exit));
        }
        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            for value in [room.x, room.y, room.width, room.height] {
                bytes.extend(value.to_le_bytes());
            }
            bytes.push(room.kind as u8);
        }
        bytes.extend((self.doors.len() as u32).to_le_bytes());
        for door in &self.doors {
            bytes.extend(door.pos.x.to_le_bytes());
            bytes.extend(door.pos.y.to_le_bytes());
            bytes.push(u8::from(door.locked));
        }
        bytes.extend(self.entry.x.to_le_bytes());
        bytes.extend(self.entry.y.to_le_bytes());
        for pos in self.exits.iter().chain(&self.windows) {
            bytes.extend(pos.x.to_le_bytes());
            bytes.extend(pos.y.to_le_bytes());
        }
        bytes
    }
}

impl NavGrid for BuildingInterior {
    fn step_cost(&self, pos: Pos) -> Option<u32> {
        self.tile(pos).filter(|tile| tile.is_passable()).map(|tile| tile.terrain.def().move_cost)
    }
}
