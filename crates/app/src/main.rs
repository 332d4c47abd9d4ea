mod frame_input;
mod game_layout;
mod ui_render;
mod ui_text;

use std::env;
use std::mem;
use std::path::Path;

use app::app_loop::{AppRequest, AppState};
use app::{APP_NAME, format_seed};
use app::save_file::SaveSlot;
use app::seed::{generate_runtime_seed, resolve_launch_options};
use macroquad::prelude::{BLACK, clear_background, next_frame, screen_height, screen_width};
use macroquad::window::Conf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wasteland_core::{Game, GameConfig, ViewMode};

use crate::frame_input::capture_frame_input;
use crate::game_layout::{MapView, compute_layout};
use crate::ui_render::{camera_center, draw_frame};

fn window_conf() -> Conf {
    Conf {
        window_title: APP_NAME.to_owned(),
        window_width: 1280,
        window_height: 800,
        high_dpi: true,
        ..Conf::default()
    }
}

fn load_config(path: Option<&Path>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };
    GameConfig::load(path).unwrap_or_else(|err| {
        warn!(%err, "falling back to default balance");
        GameConfig::default()
    })
}

fn handle_request(
    request: AppRequest,
    game: &mut Game,
    app: &mut AppState,
    slot: Option<&SaveSlot>,
    config: &GameConfig,
) {
    match (request, slot) {
        (AppRequest::Restart, _) => {
            game.reset_with_seed(generate_runtime_seed());
            info!(seed = %format_seed(game.seed()), "new run");
            app.sync_with(game);
        }
        (_, None) => warn!(?request, "no data directory available for saves"),
        (AppRequest::Save, Some(slot)) => match slot.write(game) {
            Ok(record) => info!(turn = record.turn, hash = %record.snapshot_hash_hex, "saved"),
            Err(err) => error!(%err, "save failed"),
        },
        (AppRequest::Load, Some(slot)) => match slot.load(config.clone()) {
            Ok(loaded) => {
                *game = loaded;
                app.sync_with(game);
            }
            Err(err) => error!(%err, "load failed; current game kept"),
        },
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    let options = match resolve_launch_options(&args, generate_runtime_seed()) {
        Ok(options) => options,
        Err(message) => {
            error!(%message, "invalid arguments");
            return;
        }
    };
    let config = load_config(options.config.as_deref());
    let slot = SaveSlot::default_slot();
    if let Some(record) = slot.as_ref().and_then(|slot| slot.last_session().ok()) {
        info!(seed = record.seed, turn = record.turn, "previous save available, F9 to load");
    }

    let mut game = Game::with_config(options.seed.value(), config.clone());
    info!(seed = %format_seed(game.seed()), "new run");
    let mut app = AppState::new();

    loop {
        let layout = compute_layout(screen_width(), screen_height());
        let view = MapView::new(layout.map, camera_center(&game));
        if game.view() == ViewMode::Outdoor {
            game.stream_around(view.center, view.radius());
        }

        let frame = capture_frame_input(&view);
        app.tick(&mut game, &frame);
        for request in mem::take(&mut app.requests) {
            handle_request(request, &mut game, &mut app, slot.as_ref(), &config);
        }

        clear_background(BLACK);
        draw_frame(&game, &app, &layout, &view);
        next_frame().await
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_layout, window_conf};

    #[test]
    fn default_window_leaves_room_for_every_panel() {
        let conf = window_conf();
        assert_eq!(conf.window_title, "Wasteland");
        let layout = compute_layout(conf.window_width as f32, conf.window_height as f32);
        for panel in [layout.status, layout.map, layout.side, layout.event_log] {
            assert!(panel.width > 0.0 && panel.height > 0.0);
        }
    }
}
