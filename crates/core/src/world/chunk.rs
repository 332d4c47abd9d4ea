use crate::types::Pos;

use super::tile::Tile;

/// Generation progress. Only ever advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChunkStage {
    Empty,
    /// Terrain classified from noise.
    Generated,
    /// Urban zones, props and roads applied.
    Rendered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkCoord {
    pub cy: i32,
    pub cx: i32,
}

impl ChunkCoord {
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cy, cx }
    }

    pub fn containing(pos: Pos, size: i32) -> Self {
        Self::new(pos.x.div_euclid(size), pos.y.div_euclid(size))
    }
}

#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub size: i32,
    pub stage: ChunkStage,
    /// Row-major, empty until generated.
    pub tiles: Vec<Tile>,
    pub building_anchors: Vec<Pos>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, size: i32) -> Self {
        Self {
            coord,
            size,
            stage: ChunkStage::Empty,
            tiles: Vec::new(),
            building_anchors: Vec::new(),
        }
    }

    pub fn origin(&self) -> Pos {
        Pos::new(self.coord.cx * self.size, self.coord.cy * self.size)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        ChunkCoord::containing(pos, self.size) == self.coord
    }

    pub fn is_generated(&self) -> bool {
        self.stage >= ChunkStage::Generated
    }

    pub fn is_rendered(&self) -> bool {
        self.stage >= ChunkStage::Rendered
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if !self.is_generated() || !self.contains(pos) {
            return None;
        }
        let origin = self.origin();
        let (lx, ly) = (pos.x - origin.x, pos.y - origin.y);
        Some((ly * self.size + lx) as usize)
    }

    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        self.index(pos).and_then(|idx| self.tiles.get(idx))
    }

    pub fn tile_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        self.index(pos).and_then(|idx| self.tiles.get_mut(idx))
    }

    /// Whether an anchor-centred `width x height` footprint stays inside
    /// this chunk. The footprint starts `(w - 1) / 2` tiles before the anchor.
    pub fn fits_footprint(&self, anchor: Pos, width: i32, height: i32) -> bool {
        footprint(anchor, width, height).all(|pos| self.contains(pos))
    }
}

pub fn footprint(anchor: Pos, width: i32, height: i32) -> impl Iterator<Item = Pos> {
    let start_x = anchor.x - (width - 1) / 2;
    let start_y = anchor.y - (height - 1) / 2;
    (start_y..start_y + height)
        .flat_map(move |y| (start_x..start_x + width).map(move |x| Pos::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_floor_into_chunks() {
        assert_eq!(ChunkCoord::containing(Pos::new(-1, -1), 20), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::containing(Pos::new(-20, 0), 20), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::containing(Pos::new(-21, 19), 20), ChunkCoord::new(-2, 0));
        assert_eq!(ChunkCoord::containing(Pos::new(20, 39), 20), ChunkCoord::new(1, 1));
    }

    #[test]
    fn footprint_is_centred_on_anchor() {
        let cells: Vec<Pos> = footprint(Pos::new(5, 5), 3, 2).collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Pos::new(4, 5));
        assert_eq!(cells[5], Pos::new(6, 6));
    }

    #[test]
    fn footprint_must_fit_inside_chunk() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0), 20);
        assert!(chunk.fits_footprint(Pos::new(1, 1), 3, 2));
        assert!(!chunk.fits_footprint(Pos::new(0, 3), 3, 2));
        assert!(!chunk.fits_footprint(Pos::new(19, 3), 2, 2));
        assert!(!chunk.fits_footprint(Pos::new(5, 19), 2, 2));
    }
}
