use app::app_loop::{AppMode, AppState, FrameCommands};
use macroquad::prelude::KeyCode;
use wasteland_core::{Game, GameConfig, Intent, LogEvent, MouseButton, Phase, RunOutcome};

fn calm_game(seed: u64, max_turns: u32) -> Game {
    let mut config = GameConfig::default();
    config.game.starting_enemies = 0;
    config.game.enemy_spawn_interval = 0;
    config.game.max_turns = max_turns;
    Game::with_config(seed, config)
}

#[test]
fn space_ends_the_turn() {
    let mut game = calm_game(12345, 30);
    let mut app = AppState::new();
    app.tick(&mut game, &FrameCommands::keys(&[KeyCode::Space]));
    assert_eq!(game.turn(), 2);
    assert_eq!(game.phase(), Phase::Actions);
    assert_eq!(app.mode, AppMode::Playing);
}

#[test]
fn left_click_selects_and_tab_cycles() {
    let mut game = calm_game(12345, 30);
    let mut app = AppState::new();
    let (first, pos) = game.units().next().map(|(id, unit)| (id, unit.pos)).expect("survivor");
    app.tick(&mut game, &FrameCommands::click(pos, MouseButton::Left));
    assert_eq!(game.selected(), Some(first));

    app.tick(&mut game, &FrameCommands::keys(&[KeyCode::Tab]));
    assert_ne!(game.selected(), Some(first));
    app.tick(&mut game, &FrameCommands::keys(&[KeyCode::Escape]));
    assert_eq!(game.selected(), None);
}

#[test]
fn number_keys_play_cards_for_the_selection() {
    let mut game = calm_game(777, 30);
    let mut app = AppState::new();
    let pos = game.units().next().map(|(_, unit)| unit.pos).expect("survivor");
    app.tick(&mut game, &FrameCommands::click(pos, MouseButton::Left));
    let hand_before = game.deck().hand().len();

    app.tick(&mut game, &FrameCommands::keys(&[KeyCode::Key1]));
    let played = game.log().iter().any(|event| matches!(event, LogEvent::CardPlayed { .. }));
    let rejected = game.message().is_some();
    assert!(played || rejected, "a card key either plays or explains why not");
    if played {
        assert_eq!(game.deck().hand().len(), hand_before - 1);
    }
}

#[test]
fn right_click_next_to_a_survivor_opens_a_menu_that_escape_closes() {
    let mut game = calm_game(4242, 30);
    let mut app = AppState::new();
    let pos = game.units().next().map(|(_, unit)| unit.pos).expect("survivor");
    let target = pos.offset(1, 1);
    let offered = game.available_actions(target);
    app.tick(&mut game, &FrameCommands::click(target, MouseButton::Right));

    if offered.is_empty() {
        assert_eq!(app.mode, AppMode::Playing);
        return;
    }
    assert_eq!(app.mode, AppMode::ContextMenu { pos: target, actions: offered });
    app.tick(&mut game, &FrameCommands::keys(&[KeyCode::Escape]));
    assert_eq!(app.mode, AppMode::Playing);
}

#[test]
fn reaching_the_turn_limit_finishes_the_app() {
    let mut game = calm_game(9, 1);
    let mut app = AppState::new();
    app.tick(&mut game, &FrameCommands::keys(&[KeyCode::Enter]));
    assert_eq!(app.mode, AppMode::Finished(RunOutcome::Victory));
    assert!(game.apply_intent(Intent::EndTurnRequested).is_err());
}
