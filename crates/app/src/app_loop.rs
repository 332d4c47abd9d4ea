//! Per-frame input handling for the desktop app.
//! This module exists so the key and click bindings can be driven by tests
//! without a window: the caller captures a `FrameCommands` value and hands it
//! to `AppState::tick`. It does not own persistence; save, load and restart
//! come back out as `AppRequest`s.

use macroquad::prelude::KeyCode;
use wasteland_core::{ActionId, Game, Intent, MouseButton, Pos, Resource, RunOutcome};

const CARD_KEYS: [KeyCode; 7] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
];

const MENU_KEYS: [KeyCode; 9] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Playing,
    /// Right-clicked tile with the actions offered for it.
    ContextMenu { pos: Pos, actions: Vec<ActionId> },
    Finished(RunOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRequest {
    Save,
    Load,
    Restart,
}

/// Everything the player did during one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameCommands {
    pub keys_pressed: Vec<KeyCode>,
    pub shift_down: bool,
    pub click: Option<(Pos, MouseButton)>,
}

impl FrameCommands {
    pub fn keys(keys: &[KeyCode]) -> Self {
        Self { keys_pressed: keys.to_vec(), ..Self::default() }
    }

    pub fn click(pos: Pos, button: MouseButton) -> Self {
        Self { click: Some((pos, button)), ..Self::default() }
    }

    fn pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }
}

#[derive(Default)]
pub struct AppState {
    pub mode: AppMode,
    /// Requests raised during the current frame's `tick()` call.
    /// Drained by the caller, which owns the save slot.
    pub requests: Vec<AppRequest>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, game: &mut Game, frame: &FrameCommands) {
        self.requests.clear();
        game.tick_display();

        if frame.pressed(KeyCode::F5) {
            self.requests.push(AppRequest::Save);
        }
        if frame.pressed(KeyCode::F9) {
            self.requests.push(AppRequest::Load);
        }

        match &self.mode {
            AppMode::Finished(_) => {
                if frame.pressed(KeyCode::N) {
                    self.requests.push(AppRequest::Restart);
                }
                return;
            }
            AppMode::ContextMenu { pos, actions } => {
                let (pos, actions) = (*pos, actions.clone());
                if let Some(action) = MENU_KEYS
                    .iter()
                    .position(|&key| frame.pressed(key))
                    .and_then(|index| actions.get(index).copied())
                {
                    let _ = game.apply_intent(Intent::ActionInvoked { action, pos });
                    self.mode = AppMode::Playing;
                } else if frame.pressed(KeyCode::Escape) || frame.click.is_some() {
                    self.mode = AppMode::Playing;
                    self.handle_click(game, frame);
                }
            }
            AppMode::Playing => {
                self.handle_click(game, frame);
                self.handle_keys(game, frame);
            }
        }

        if let Some(outcome) = game.outcome() {
            self.mode = AppMode::Finished(outcome);
        }
    }

    /// A finished game mode resets when the caller swaps in a new game.
    pub fn sync_with(&mut self, game: &Game) {
        self.mode = match game.outcome() {
            Some(outcome) => AppMode::Finished(outcome),
            None => AppMode::Playing,
        };
    }

    fn handle_click(&mut self, game: &mut Game, frame: &FrameCommands) {
        let Some((pos, button)) = frame.click else {
            return;
        };
        let _ = game.apply_intent(Intent::TileClicked { pos, button });
        if button == MouseButton::Right {
            let actions = game.available_actions(pos);
            if !actions.is_empty() {
                self.mode = AppMode::ContextMenu { pos, actions };
            }
        }
    }

    fn handle_keys(&mut self, game: &mut Game, frame: &FrameCommands) {
        if frame.pressed(KeyCode::Tab) {
            game.select_next_unit();
        }
        if frame.pressed(KeyCode::Escape) {
            game.deselect();
        }
        if let Some(hand_index) = CARD_KEYS.iter().position(|&key| frame.pressed(key)) {
            let intent = if frame.shift_down {
                Intent::DiscardCard { hand_index }
            } else {
                Intent::PlayCard { hand_index }
            };
            let _ = game.apply_intent(intent);
        }
        let supplies = [
            (KeyCode::W, Resource::Water),
            (KeyCode::F, Resource::Food),
            (KeyCode::M, Resource::Medicine),
        ];
        for (key, resource) in supplies {
            if frame.pressed(key) {
                let _ = game.apply_intent(Intent::UseSupply { resource });
            }
        }
        if frame.pressed(KeyCode::Space) || frame.pressed(KeyCode::Enter) {
            let _ = game.apply_intent(Intent::EndTurnRequested);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppMode, AppRequest, AppState, FrameCommands};
    use macroquad::prelude::KeyCode;
    use wasteland_core::{Game, RunOutcome};

    #[test]
    fn save_and_load_keys_raise_requests() {
        let mut game = Game::new(1);
        let mut app = AppState::new();
        app.tick(&mut game, &FrameCommands::keys(&[KeyCode::F5, KeyCode::F9]));
        assert_eq!(app.requests, vec![AppRequest::Save, AppRequest::Load]);
        app.tick(&mut game, &FrameCommands::default());
        assert!(app.requests.is_empty());
    }

    #[test]
    fn finished_mode_only_offers_restart() {
        let mut game = Game::new(2);
        let mut app = AppState::new();
        app.mode = AppMode::Finished(RunOutcome::Defeat);
        app.tick(&mut game, &FrameCommands::keys(&[KeyCode::Space, KeyCode::N]));
        assert_eq!(app.requests, vec![AppRequest::Restart]);
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn sync_with_a_fresh_game_returns_to_playing() {
        let mut app = AppState::new();
        app.mode = AppMode::Finished(RunOutcome::Victory);
        app.sync_with(&Game::new(3));
        assert_eq!(app.mode, AppMode::Playing);
    }
}
