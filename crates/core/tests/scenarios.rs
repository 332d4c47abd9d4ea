use wasteland_core::config::CombatConfig;
use wasteland_core::game::resolve_combat;
use wasteland_core::rng::Dice;
use wasteland_core::world::World;
use wasteland_core::{
    Game, GameConfig, GameError, Intent, IntentOutcome, MouseButton, Phase, Pos, Resource,
    RunOutcome,
};

fn calm_config() -> GameConfig {
    GameConfig::from_toml_str(
        r#"
        [game]
        starting_enemies = 0
        enemy_spawn_interval = 0
        "#,
    )
    .expect("valid config")
}

#[test]
fn far_tile_materializes_on_demand() {
    let mut world = World::new(42, &GameConfig::default().world);
    let tile = world.get_tile_global(Pos::new(500, 500)).cloned().expect("in bounds");
    assert_eq!(tile.pos, Pos::new(500, 500));
    assert!(world.get_tile_global(Pos::new(1_000, 0)).is_none(), "x = 1000 is off the map");
    assert_eq!(world.chunk_count(), 1);
}

#[test]
fn combat_damage_stays_in_band() {
    let config = CombatConfig::default();
    let mut dice = Dice::from_seed(99);
    let (mut hits, mut misses) = (0, 0);
    for _ in 0..2_000 {
        let roll = resolve_combat(&mut dice, 25, &config);
        if roll.hit {
            hits += 1;
            let low = (25.0 - config.damage_variance).round() as i32;
            let high = (25.0 + config.damage_variance).round() as i32;
            assert!((low.max(1)..=high).contains(&roll.damage), "damage {}", roll.damage);
        } else {
            misses += 1;
            assert_eq!(roll.damage, 0);
        }
    }
    assert!(hits > 0 && misses > 0);
}

#[test]
fn end_turn_decays_survivors_and_refills_ap() {
    let config = calm_config();
    let hydration_decay = config.unit.hydration_decay;
    let nutrition_decay = config.unit.nutrition_decay;
    let mut game = Game::with_config(5, config);
    assert_eq!(game.phase(), Phase::Actions);
    let before: Vec<(i32, i32)> =
        game.units().map(|(_, unit)| (unit.hydration, unit.nutrition)).collect();

    assert_eq!(game.end_turn(), Ok(2));
    assert_eq!(game.phase(), Phase::Actions);
    for ((_, unit), (hydration, nutrition)) in game.units().zip(before) {
        assert_eq!(unit.hydration, hydration - hydration_decay);
        assert_eq!(unit.nutrition, nutrition - nutrition_decay);
        assert_eq!(unit.action_points, unit.max_action_points);
    }
}

#[test]
fn selecting_and_moving_through_intents() {
    let mut game = Game::with_config(8, calm_config());
    let start = game.units().next().map(|(_, unit)| unit.pos).expect("a survivor");
    let outcome = game.apply_intent(Intent::TileClicked { pos: start, button: MouseButton::Left });
    let Ok(IntentOutcome::Selected(id)) = outcome else {
        panic!("expected a selection, got {outcome:?}");
    };
    assert!(!game.highlights().is_empty());

    let target = game
        .movement_range(id)
        .into_iter()
        .find(|&(_, ap)| ap == 1)
        .map(|(pos, _)| pos)
        .expect("something within one AP");
    let outcome = game.apply_intent(Intent::TileClicked { pos: target, button: MouseButton::Left });
    assert_eq!(outcome, Ok(IntentOutcome::Moved { unit: id, to: target, ap_spent: 1 }));
    assert_eq!(game.unit(id).map(|unit| unit.pos), Some(target));
    assert!(game.world().is_revealed(target));
}

#[test]
fn supplies_need_a_selection_and_stock() {
    let mut game = Game::with_config(3, calm_config());
    assert_eq!(game.use_supply(Resource::Water), Err(GameError::NoSelection));
    let _ = game.apply_intent(Intent::UseSupply { resource: Resource::Water });
    assert_eq!(game.message(), Some("no survivor selected"));
}

#[test]
fn surviving_the_turn_limit_is_victory() {
    let mut config = calm_config();
    config.game.max_turns = 3;
    let mut game = Game::with_config(4, config);
    for _ in 0..3 {
        let _ = game.end_turn();
    }
    assert_eq!(game.outcome(), Some(RunOutcome::Victory));
    assert!(matches!(game.end_turn(), Err(GameError::GameOver)));
}
