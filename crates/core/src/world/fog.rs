//! Fog of war. Reveals are monotonic: a tile never hides again.

use tracing::trace;

use crate::types::Pos;

use super::World;

impl World {
    /// Materializes every chunk touching the radius box, then reveals tiles
    /// with `dx² + dy² <= radius²`. Newly revealed tiles are appended to the
    /// visible cache. Returns how many tiles were newly revealed.
    pub fn reveal_around_position(&mut self, center: Pos, radius: i32) -> usize {
        self.ensure_area(center, radius);

        let mut newly = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                if self.reveal_tile(center.offset(dx, dy)) {
                    newly += 1;
                }
            }
        }
        trace!(x = center.x, y = center.y, radius, newly, "revealed");
        newly
    }

    /// Reveals one tile. Returns false when it was already revealed or lies
    /// outside the world.
    pub fn reveal_tile(&mut self, pos: Pos) -> bool {
        let Some(tile) = self.tile_mut(pos) else {
            return false;
        };
        if tile.revealed {
            return false;
        }
        tile.revealed = true;
        self.visible.push(pos);
        true
    }

    pub fn is_revealed(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(|tile| tile.revealed)
    }

    /// Every revealed tile in the order it was revealed.
    pub fn visible_tiles(&self) -> &[Pos] {
        &self.visible
    }

    /// Revealed tiles in row-major order.
    pub fn revealed_positions(&self) -> Vec<Pos> {
        let mut revealed = self.visible.clone();
        revealed.sort_unstable();
        revealed
    }
}

#[cfg(test)]
mod tests {
    use crate::config::WorldConfig;
    use crate::types::Pos;
    use crate::world::World;

    #[test]
    fn reveal_uses_euclidean_disc() {
        let mut world = World::new(42, &WorldConfig::default());
        let newly = world.reveal_around_position(Pos::new(0, 0), 2);
        assert_eq!(newly, 13);
        assert!(world.is_revealed(Pos::new(2, 0)));
        assert!(world.is_revealed(Pos::new(1, 1)));
        assert!(!world.is_revealed(Pos::new(2, 1)));
    }

    #[test]
    fn reveal_is_monotonic_and_not_double_counted() {
        let mut world = World::new(7, &WorldConfig::default());
        world.reveal_around_position(Pos::new(10, 10), 3);
        let before = world.visible_tiles().len();
        assert_eq!(world.reveal_around_position(Pos::new(10, 10), 3), 0);
        world.reveal_around_position(Pos::new(11, 10), 3);
        assert!(world.visible_tiles().len() > before);
        assert!(world.is_revealed(Pos::new(10, 10)));
    }

    #[test]
    fn reveal_crossing_chunk_edge_renders_both_chunks() {
        let mut world = World::new(3, &WorldConfig::default());
        world.reveal_around_position(Pos::new(0, 0), 5);
        for (cx, cy) in [(-1, -1), (0, -1), (-1, 0), (0, 0)] {
            let chunk = world.chunk(cx, cy).expect("chunk should exist");
            assert!(chunk.is_rendered(), "chunk {cx},{cy} should be rendered");
        }
    }

    #[test]
    fn radius_zero_reveals_exactly_one_tile() {
        let mut world = World::new(1, &WorldConfig::default());
        assert_eq!(world.reveal_around_position(Pos::new(-33, 47), 0), 1);
        assert_eq!(world.revealed_positions(), vec![Pos::new(-33, 47)]);
    }
}
