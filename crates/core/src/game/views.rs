//! Read-only tile views for the front end.
//! This module exists so a renderer can draw either scene from one flat
//! record per tile without touching chunk or interior internals. It does not
//! own any drawing or input code.

use super::*;
use crate::content::{InteriorTerrain, PropKind, Terrain};
use crate::interior::FurnitureState;
use crate::world::RoadLinks;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    Outdoor(Terrain),
    Indoor(InteriorTerrain),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TileView {
    pub pos: Pos,
    pub kind: TileKind,
    pub name: &'static str,
    pub passable: bool,
    /// In cost units; see `COST_SCALE`.
    pub move_cost: u32,
    pub occupant: Occupant,
    pub props: Vec<PropKind>,
    pub furniture: Option<FurnitureState>,
    pub has_road: bool,
    pub road_links: RoadLinks,
    pub radiation: f64,
    pub revealed: bool,
}

impl Game {
    /// The tile at `pos` in the current scene. Outdoors only materialized
    /// tiles are visible.
    pub fn tile_view(&self, pos: Pos) -> Option<TileView> {
        match self.view {
            ViewMode::Outdoor => {
                let tile = self.world.tile(pos)?;
                let def = tile.terrain.def();
                Some(TileView {
                    pos,
                    kind: TileKind::Outdoor(tile.terrain),
                    name: def.name,
                    passable: tile.is_passable(),
                    move_cost: def.move_cost,
                    occupant: tile.occupant,
                    props: tile.props.iter().map(|prop| prop.kind).collect(),
                    furniture: None,
                    has_road: tile.has_road,
                    road_links: tile.road_links,
                    radiation: tile.radiation_level,
                    revealed: tile.revealed,
                })
            }
            ViewMode::Indoor { .. } => {
                let tile = self.current_interior()?.tile(pos)?;
                let def = tile.terrain.def();
                Some(TileView {
                    pos,
                    kind: TileKind::Indoor(tile.terrain),
                    name: tile.furniture.map_or(def.name, |furniture| furniture.kind.def().name),
                    passable: tile.is_passable(),
                    move_cost: def.move_cost,
                    occupant: tile.occupant,
                    props: Vec::new(),
                    furniture: tile.furniture,
                    has_road: false,
                    road_links: RoadLinks::default(),
                    radiation: 0.0,
                    revealed: true,
                })
            }
        }
    }

    /// Views for the square of `radius` around `center`, or the whole
    /// interior when indoors. Row-major.
    pub fn tile_views(&self, center: Pos, radius: i32) -> Vec<TileView> {
        if let Some(interior) = self.current_interior() {
            return interior.tiles.iter().filter_map(|tile| self.tile_view(tile.pos)).collect();
        }
        (-radius..=radius)
            .flat_map(|dy| (-radius..=radius).map(move |dx| center.offset(dx, dy)))
            .filter_map(|pos| self.tile_view(pos))
            .collect()
    }

    /// Streams chunks around the camera so views have tiles to show.
    pub fn stream_around(&mut self, center: Pos, radius: i32) {
        self.world.ensure_area(center, radius);
    }

    /// Movement-range tiles of the selected unit.
    pub fn highlights(&self) -> Vec<Pos> {
        let Some(id) = self.selected else {
            return Vec::new();
        };
        if self.phase != Phase::Actions || self.outcome.is_some() {
            return Vec::new();
        }
        self.movement_range(id).into_keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{first_unit, flatten, lone_game, put_prop, select_first};

    #[test]
    fn outdoor_view_mirrors_the_tile() {
        let mut game = lone_game(91);
        let (id, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 2);
        put_prop(&mut game, pos.offset(1, 0), PropKind::Rock);
        let view = game.tile_view(pos).expect("materialized");
        assert_eq!(view.kind, TileKind::Outdoor(Terrain::Grass));
        assert_eq!(view.occupant, Occupant::Unit(id));
        assert!(view.revealed);
        assert!(view.passable);
        assert_eq!(view.move_cost, 100);
        let rock = game.tile_view(pos.offset(1, 0)).expect("materialized");
        assert_eq!(rock.props, vec![PropKind::Rock]);
        assert_eq!(game.tile_views(pos, 1).len(), 9);
    }

    #[test]
    fn highlights_follow_the_selection() {
        let mut game = lone_game(92);
        let (_, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 10);
        assert!(game.highlights().is_empty());
        select_first(&mut game);
        let highlights = game.highlights();
        assert!(highlights.contains(&pos.offset(9, 0)));
        assert!(!highlights.contains(&pos));
    }
}
