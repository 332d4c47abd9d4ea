use super::{camera_center, fit_lines_to_panel, tile_glyph};
use macroquad::prelude::{BEIGE, BROWN, ORANGE, WHITE};
use wasteland_core::content::{FurnitureKind, InteriorTerrain, PropKind, Terrain};
use wasteland_core::interior::FurnitureState;
use wasteland_core::world::RoadLinks;
use wasteland_core::{Game, Occupant, Pos, TileKind, TileView};

fn outdoor_tile() -> TileView {
    TileView {
        pos: Pos::new(0, 0),
        kind: TileKind::Outdoor(Terrain::Grass),
        name: "Grass",
        passable: true,
        move_cost: 100,
        occupant: Occupant::Empty,
        props: Vec::new(),
        furniture: None,
        has_road: false,
        road_links: RoadLinks::default(),
        radiation: 0.0,
        revealed: true,
    }
}

#[test]
fn bare_tile_has_no_glyph() {
    assert_eq!(tile_glyph(&outdoor_tile()), (" ", WHITE));
}

#[test]
fn prop_glyph_is_drawn_over_terrain() {
    let mut tile = outdoor_tile();
    tile.props.push(PropKind::DeadTree);
    assert_eq!(tile_glyph(&tile), ("T", BROWN));
}

#[test]
fn furniture_wins_and_shows_lock_state() {
    let mut tile = outdoor_tile();
    tile.kind = TileKind::Indoor(InteriorTerrain::Floor);
    tile.furniture =
        Some(FurnitureState { kind: FurnitureKind::Safe, locked: true, searched: false });
    assert_eq!(tile_glyph(&tile), ("O", ORANGE));
    tile.furniture =
        Some(FurnitureState { kind: FurnitureKind::Table, locked: false, searched: true });
    assert_eq!(tile_glyph(&tile), ("o", BEIGE));
}

#[test]
fn overflowing_lines_end_with_a_count() {
    let lines: Vec<String> = (0..10).map(|index| format!("line {index}")).collect();
    let fitted = fit_lines_to_panel(&lines, 100.0, 20.0, 20.0);
    assert_eq!(fitted.len(), 4);
    assert_eq!(fitted[3], "... and 7 more");
    assert_eq!(fit_lines_to_panel(&lines, 1_000.0, 20.0, 20.0), lines);
}

#[test]
fn camera_follows_the_first_survivor_without_a_selection() {
    let game = Game::new(3);
    let first = game.units().next().map(|(_, unit)| unit.pos).expect("a survivor");
    assert_eq!(camera_center(&game), first);
}
