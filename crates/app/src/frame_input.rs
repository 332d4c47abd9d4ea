//! Keyboard and mouse input collection for one rendered frame.

use app::app_loop::FrameCommands;
use macroquad::input::MouseButton as PointerButton;
use macroquad::prelude::{
    KeyCode, is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position,
};
use wasteland_core::MouseButton;

use crate::game_layout::MapView;

const BOUND_KEYS: [KeyCode; 19] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
    KeyCode::Space,
    KeyCode::Enter,
    KeyCode::Tab,
    KeyCode::Escape,
    KeyCode::W,
    KeyCode::F,
    KeyCode::M,
    KeyCode::N,
    KeyCode::F5,
    KeyCode::F9,
];

pub fn capture_frame_input(view: &MapView) -> FrameCommands {
    let keys_pressed = BOUND_KEYS.into_iter().filter(|&key| is_key_pressed(key)).collect();
    let shift_down = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

    let button = if is_mouse_button_pressed(PointerButton::Left) {
        Some(MouseButton::Left)
    } else if is_mouse_button_pressed(PointerButton::Right) {
        Some(MouseButton::Right)
    } else {
        None
    };
    let click = button.and_then(|button| {
        let (px, py) = mouse_position();
        view.tile_at(px, py).map(|pos| (pos, button))
    });

    FrameCommands { keys_pressed, shift_down, click }
}
