//! Rendering for the main game frame and UI panels.

use crate::game_layout::{FrameLayout, MapView, PanelRect};
use crate::ui_text::{
    event_log_line, hand_lines, menu_lines, recap_lines, resource_line, status_text, unit_lines,
};
use app::app_loop::{AppMode, AppState};
use macroquad::prelude::*;
use wasteland_core::content::{InteriorTerrain, PropKind, Terrain};
use wasteland_core::{Game, Pos, TileKind, TileView, ViewMode};

const BORDER_COLOR: Color = Color { r: 0.25, g: 0.25, b: 0.25, a: 1.0 };
const HIGHLIGHT_COLOR: Color = Color { r: 0.3, g: 0.8, b: 1.0, a: 0.25 };
const ROAD_COLOR: Color = Color { r: 0.35, g: 0.35, b: 0.33, a: 1.0 };
const PANEL_PAD_X: f32 = 12.0;
const PANEL_PAD_Y: f32 = 22.0;
const LINE_STEP: f32 = 18.0;
const FONT_SIZE: f32 = 18.0;

/// Selected survivor, else the first survivor; the middle of the building
/// when indoors.
pub fn camera_center(game: &Game) -> Pos {
    if let ViewMode::Indoor { building } = game.view()
        && let Some(interior) = game.interior(building)
    {
        return Pos::new(interior.width / 2, interior.height / 2);
    }
    game.selected()
        .and_then(|id| game.unit(id))
        .or_else(|| game.units().map(|(_, unit)| unit).find(|unit| !unit.is_indoors()))
        .map_or(Pos::new(0, 0), |unit| unit.pos)
}

pub fn draw_frame(game: &Game, app_state: &AppState, layout: &FrameLayout, view: &MapView) {
    for panel in [layout.status, layout.map, layout.side, layout.event_log] {
        draw_rectangle_lines(panel.x, panel.y, panel.width, panel.height, 1.0, BORDER_COLOR);
    }
    draw_text(
        &status_text(&app_state.mode, game),
        layout.status.x + PANEL_PAD_X,
        layout.status.y + PANEL_PAD_Y,
        20.0,
        WHITE,
    );
    draw_map(game, view);
    draw_side_panel(game, app_state, layout.side);
    draw_event_log(game, layout.event_log);
    if let AppMode::ContextMenu { actions, .. } = &app_state.mode {
        draw_lines_box(&menu_lines(actions), layout.map, YELLOW);
    }
}

fn draw_map(game: &Game, view: &MapView) {
    let highlights = game.highlights();
    for tile in game.tile_views(view.center, view.radius()) {
        if !tile.revealed {
            continue;
        }
        let (sx, sy) = view.screen_of(f64::from(tile.pos.x), f64::from(tile.pos.y));
        if !view.is_inside(sx, sy) {
            continue;
        }
        draw_rectangle(sx, sy, view.cell, view.cell, tile_color(&tile));
        let (glyph, color) = tile_glyph(&tile);
        draw_text(glyph, sx + view.cell * 0.3, sy + view.cell * 0.75, view.cell * 0.8, color);
        if highlights.contains(&tile.pos) {
            draw_rectangle(sx, sy, view.cell, view.cell, HIGHLIGHT_COLOR);
        }
    }

    let indoor_building = match game.view() {
        ViewMode::Indoor { building } => Some(building),
        ViewMode::Outdoor => None,
    };
    for (id, unit) in game.units() {
        if unit.indoors.map(|state| state.building) != indoor_building {
            continue;
        }
        let (x, y) = unit.display.current;
        let color = if game.selected() == Some(id) { YELLOW } else { GREEN };
        draw_actor(view, x, y, "@", color);
    }
    if indoor_building.is_none() {
        for (_, enemy) in game.enemies() {
            if game.world().is_revealed(enemy.pos) {
                let (x, y) = enemy.display.current;
                draw_actor(view, x, y, "R", RED);
            }
        }
    }
}

fn draw_actor(view: &MapView, x: f64, y: f64, glyph: &str, color: Color) {
    let (sx, sy) = view.screen_of(x, y);
    if view.is_inside(sx, sy) {
        draw_text(glyph, sx + view.cell * 0.25, sy + view.cell * 0.8, view.cell, color);
    }
}

fn draw_side_panel(game: &Game, app_state: &AppState, panel: PanelRect) {
    let mut lines = Vec::new();
    if matches!(app_state.mode, AppMode::Finished(_)) {
        lines.extend(recap_lines(game));
        lines.push(String::new());
    }
    lines.extend(unit_lines(game));
    lines.push(String::new());
    lines.push(resource_line(game));
    lines.extend(game.resource_warnings().into_iter().map(str::to_string));
    lines.push(String::new());
    lines.push("Hand (1-7 play, Shift discard):".to_string());
    lines.extend(hand_lines(game));
    lines.push(format!(
        "Deck {} / Discard {}",
        game.deck().deck_size(),
        game.deck().discard_size()
    ));
    let fitted = fit_lines_to_panel(&lines, panel.height, LINE_STEP, PANEL_PAD_Y);
    draw_lines_box(&fitted, panel, WHITE);
}

fn draw_event_log(game: &Game, panel: PanelRect) {
    let mut lines: Vec<String> = game.message().map(str::to_string).into_iter().collect();
    let room = ((panel.height - PANEL_PAD_Y) / LINE_STEP).floor().max(0.0) as usize;
    let events = game.log();
    let shown = room.saturating_sub(lines.len()).min(events.len());
    lines.extend(events[events.len() - shown..].iter().map(|event| event_log_line(game, event)));
    draw_lines_box(&lines, panel, LIGHTGRAY);
}

fn draw_lines_box(lines: &[String], panel: PanelRect, color: Color) {
    let text_x = panel.x + PANEL_PAD_X;
    let mut text_y = panel.y + PANEL_PAD_Y;
    for line in lines {
        draw_text(line, text_x, text_y, FONT_SIZE, color);
        text_y += LINE_STEP;
    }
}

fn fit_lines_to_panel(
    lines: &[String],
    panel_height: f32,
    line_step: f32,
    panel_pad_y: f32,
) -> Vec<String> {
    if line_step <= 0.0 {
        return Vec::new();
    }

    let usable_height = (panel_height - panel_pad_y).max(0.0);
    let max_lines = (usable_height / line_step).floor() as usize;
    if lines.len() <= max_lines {
        return lines.to_vec();
    }
    if max_lines == 0 {
        return Vec::new();
    }

    let hidden_count = lines.len() - (max_lines - 1);
    let mut fitted_lines = lines[..max_lines - 1].to_vec();
    fitted_lines.push(format!("... and {hidden_count} more"));
    fitted_lines
}

fn tile_color(tile: &TileView) -> Color {
    match tile.kind {
        TileKind::Outdoor(_) if tile.has_road => ROAD_COLOR,
        TileKind::Outdoor(terrain) => match terrain {
            Terrain::Grass => Color::new(0.33, 0.42, 0.2, 1.0),
            Terrain::Dirt => Color::new(0.45, 0.36, 0.25, 1.0),
            Terrain::Mud => Color::new(0.32, 0.25, 0.17, 1.0),
            Terrain::Sand => Color::new(0.76, 0.68, 0.47, 1.0),
            Terrain::Pavement => Color::new(0.42, 0.42, 0.4, 1.0),
            Terrain::Concrete => Color::new(0.55, 0.55, 0.52, 1.0),
            Terrain::Toxic => Color::new(0.45, 0.7, 0.1, 1.0),
            Terrain::Water => Color::new(0.15, 0.3, 0.5, 1.0),
            Terrain::Rubble => Color::new(0.38, 0.34, 0.3, 1.0),
        },
        TileKind::Indoor(terrain) => match terrain {
            InteriorTerrain::Floor => Color::new(0.4, 0.33, 0.26, 1.0),
            InteriorTerrain::Wall => Color::new(0.2, 0.2, 0.22, 1.0),
            InteriorTerrain::Window => Color::new(0.4, 0.55, 0.65, 1.0),
            InteriorTerrain::Exit => Color::new(0.25, 0.5, 0.25, 1.0),
            InteriorTerrain::OpenDoor
            | InteriorTerrain::ClosedDoor
            | InteriorTerrain::LockedDoor => Color::new(0.5, 0.35, 0.2, 1.0),
        },
    }
}

/// Furniture first, then the first prop, then door state.
fn tile_glyph(tile: &TileView) -> (&'static str, Color) {
    if let Some(furniture) = tile.furniture {
        let color = if furniture.locked { ORANGE } else { BEIGE };
        return (if furniture.searched { "o" } else { "O" }, color);
    }
    if let Some(prop) = tile.props.first() {
        return prop_glyph(*prop);
    }
    match tile.kind {
        TileKind::Indoor(InteriorTerrain::ClosedDoor) => ("+", BEIGE),
        TileKind::Indoor(InteriorTerrain::LockedDoor) => ("+", ORANGE),
        TileKind::Indoor(InteriorTerrain::OpenDoor) => ("'", BEIGE),
        _ => (" ", WHITE),
    }
}

fn prop_glyph(kind: PropKind) -> (&'static str, Color) {
    match kind {
        PropKind::DeadTree => ("T", BROWN),
        PropKind::DeadBush => ("*", BROWN),
        PropKind::Rock => ("o", GRAY),
        PropKind::Debris => ("%", LIGHTGRAY),
        PropKind::CarWreck => ("=", DARKGRAY),
        PropKind::ToxicBarrel => ("!", LIME),
        PropKind::RuinedHouse
        | PropKind::GasStation
        | PropKind::AbandonedShop
        | PropKind::OfficeBuilding
        | PropKind::Warehouse => ("#", WHITE),
    }
}

#[cfg(test)]
mod tests;
