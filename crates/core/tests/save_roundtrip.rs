use std::fs;

use wasteland_core::{Game, GameConfig, Intent, MouseButton, Pos, SaveData, SaveError};

fn click(x: i32, y: i32) -> Intent {
    Intent::TileClicked { pos: Pos::new(x, y), button: MouseButton::Left }
}

fn played_game(seed: u64) -> Game {
    let mut game = Game::new(seed);
    for intent in [click(0, 0), click(-2, -1), Intent::EndTurnRequested] {
        let _ = game.apply_intent(intent);
    }
    game
}

#[test]
fn save_file_round_trips_through_disk() {
    let game = played_game(31337);
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("save.json");
    fs::write(&path, game.save_json().expect("save")).expect("write save");

    let raw = fs::read_to_string(&path).expect("read save");
    let loaded = Game::load_json(&raw, GameConfig::default()).expect("load");
    assert_eq!(loaded.seed(), game.seed());
    assert_eq!(loaded.turn(), game.turn());
    assert_eq!(loaded.phase(), game.phase());
    assert_eq!(loaded.unit_count(), game.unit_count());
    assert_eq!(loaded.deck().hand(), game.deck().hand());
    assert_eq!(loaded.world().revealed_positions(), game.world().revealed_positions());
    assert!(loaded.audit().is_empty(), "{:?}", loaded.audit());

    // A second save of the loaded game carries the same authoritative fields.
    let again = SaveData::from_json(&loaded.save_json().expect("resave")).expect("parse");
    let first = SaveData::from_json(&raw).expect("parse");
    assert_eq!(again.units, first.units);
    assert_eq!(again.global_resources, first.global_resources);
    assert_eq!(again.revealed_tiles, first.revealed_tiles);
}

#[test]
fn truncated_save_is_rejected_without_side_effects() {
    let game = played_game(7);
    let json = game.save_json().expect("save");
    let truncated = &json[..json.len() / 2];
    assert!(matches!(
        Game::load_json(truncated, GameConfig::default()),
        Err(SaveError::Parse(_))
    ));
    assert_eq!(game.snapshot_hash(), played_game(7).snapshot_hash());
}
