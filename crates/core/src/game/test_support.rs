//! Shared test fixtures for the `game` submodule test suites.
//! This module exists to avoid repeating party and terrain setup across many
//! tests. It does not own production gameplay logic.

use super::*;
use crate::content::{PropKind, Terrain};
use crate::world::PropInstance;

/// Full party, no raiders at start.
pub(crate) fn quiet_game(seed: u64) -> Game {
    let mut config = GameConfig::default();
    config.game.starting_enemies = 0;
    Game::with_config(seed, config)
}

/// A single survivor at the origin and no raiders.
pub(crate) fn lone_game(seed: u64) -> Game {
    let mut config = GameConfig::default();
    config.game.starting_units = 1;
    config.game.starting_enemies = 0;
    Game::with_config(seed, config)
}

pub(crate) fn first_unit(game: &Game) -> Option<(UnitId, Pos)> {
    game.units().next().map(|(id, unit)| (id, unit.pos))
}

pub(crate) fn select_first(game: &mut Game) -> UnitId {
    let (id, _) = first_unit(game).expect("game has a survivor");
    game.selected = Some(id);
    id
}

/// Bare grass in the square around `center`; occupants stay put.
pub(crate) fn flatten(game: &mut Game, center: Pos, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if let Some(tile) = game.world.tile_mut(center.offset(dx, dy)) {
                tile.set_terrain(Terrain::Grass);
                tile.props.clear();
                tile.has_building = false;
                tile.has_road = false;
            }
        }
    }
}

pub(crate) fn paint(game: &mut Game, pos: Pos, terrain: Terrain) {
    if let Some(tile) = game.world.tile_mut(pos) {
        tile.set_terrain(terrain);
    }
}

pub(crate) fn put_prop(game: &mut Game, pos: Pos, kind: PropKind) {
    if let Some(tile) = game.world.tile_mut(pos) {
        tile.props = vec![PropInstance { kind, anchor: pos }];
    }
}

/// Single-tile building anchored on `pos`.
pub(crate) fn put_building(game: &mut Game, pos: Pos, kind: PropKind) {
    put_prop(game, pos, kind);
    if let Some(tile) = game.world.tile_mut(pos) {
        tile.has_building = true;
    }
}

pub(crate) fn add_raider(game: &mut Game, pos: Pos) -> EnemyId {
    game.add_enemy(pos)
}
