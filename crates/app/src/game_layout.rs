//! Layout model for the game's on-screen panels and the tile grid inside the
//! map panel.

use wasteland_core::Pos;

const MARGIN: f32 = 10.0;
const STATUS_HEIGHT: f32 = 36.0;
const SIDE_WIDTH: f32 = 300.0;
const LOG_HEIGHT: f32 = 170.0;
pub const CELL_SIZE: f32 = 26.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PanelRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameLayout {
    pub status: PanelRect,
    pub map: PanelRect,
    pub side: PanelRect,
    pub event_log: PanelRect,
}

/// Status bar on top, side panel on the right, event log under the map.
pub fn compute_layout(screen_width: f32, screen_height: f32) -> FrameLayout {
    let inner_width = (screen_width - 2.0 * MARGIN).max(0.0);
    let body_top = MARGIN + STATUS_HEIGHT + MARGIN;
    let body_height = (screen_height - body_top - MARGIN).max(0.0);
    let side_width = SIDE_WIDTH.min(inner_width / 2.0);
    let map_width = (inner_width - side_width - MARGIN).max(0.0);
    let log_height = LOG_HEIGHT.min(body_height / 2.0);

    FrameLayout {
        status: PanelRect { x: MARGIN, y: MARGIN, width: inner_width, height: STATUS_HEIGHT },
        map: PanelRect {
            x: MARGIN,
            y: body_top,
            width: map_width,
            height: (body_height - log_height - MARGIN).max(0.0),
        },
        side: PanelRect {
            x: MARGIN + map_width + MARGIN,
            y: body_top,
            width: side_width,
            height: body_height,
        },
        event_log: PanelRect {
            x: MARGIN,
            y: body_top + body_height - log_height,
            width: map_width,
            height: log_height,
        },
    }
}

/// Maps tile coordinates to pixels inside the map panel, centred on `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    pub panel: PanelRect,
    pub center: Pos,
    pub cell: f32,
}

impl MapView {
    pub fn new(panel: PanelRect, center: Pos) -> Self {
        Self { panel, center, cell: CELL_SIZE }
    }

    /// Half the number of tiles that fit across the larger panel axis.
    pub fn radius(&self) -> i32 {
        let across = self.panel.width.max(self.panel.height) / self.cell;
        (across / 2.0).ceil() as i32 + 1
    }

    /// Top-left pixel of the cell for a (possibly fractional) tile coordinate.
    pub fn screen_of(&self, x: f64, y: f64) -> (f32, f32) {
        let mid_x = self.panel.x + self.panel.width / 2.0;
        let mid_y = self.panel.y + self.panel.height / 2.0;
        let dx = (x - f64::from(self.center.x)) as f32;
        let dy = (y - f64::from(self.center.y)) as f32;
        (mid_x + (dx - 0.5) * self.cell, mid_y + (dy - 0.5) * self.cell)
    }

    pub fn tile_at(&self, px: f32, py: f32) -> Option<Pos> {
        if !self.panel.contains(px, py) {
            return None;
        }
        let mid_x = self.panel.x + self.panel.width / 2.0;
        let mid_y = self.panel.y + self.panel.height / 2.0;
        let dx = ((px - mid_x) / self.cell + 0.5).floor() as i32;
        let dy = ((py - mid_y) / self.cell + 0.5).floor() as i32;
        Some(self.center.offset(dx, dy))
    }

    pub fn is_inside(&self, px: f32, py: f32) -> bool {
        self.panel.contains(px, py) && self.panel.contains(px + self.cell, py + self.cell)
    }
}
