//! Text formatting for the status bar, side panel, context menu and event log.

use app::app_loop::AppMode;
use app::{format_seed, format_snapshot_hash, reason_code};
use wasteland_core::{ActionId, Game, LogEvent, Phase, Resource, UnitId, ViewMode};

pub fn status_text(mode: &AppMode, game: &Game) -> String {
    match mode {
        AppMode::Finished(outcome) => {
            format!("Finished: {} (N=new run, F9=load)", reason_code(*outcome))
        }
        AppMode::ContextMenu { pos, .. } => {
            format!("Actions at {} (1-9 choose, Esc close)", pos.key())
        }
        AppMode::Playing => {
            let scene = match game.view() {
                ViewMode::Outdoor => "outdoors".to_string(),
                ViewMode::Indoor { building } => game
                    .interior(building)
                    .map_or_else(|| "indoors".to_string(), |interior| interior.name().to_string()),
            };
            format!(
                "Turn {}/{} {} [{scene}] (Space end turn, Tab next, F5 save, F9 load)",
                game.turn(),
                game.config().game.max_turns,
                phase_label(game.phase()),
            )
        }
    }
}

pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::EventDraw => "Event",
        Phase::PlayerHand => "Draw",
        Phase::Actions => "Actions",
        Phase::EndPhase => "End",
    }
}

pub fn unit_lines(game: &Game) -> Vec<String> {
    let mut lines = Vec::new();
    for (id, unit) in game.units() {
        let marker = if game.selected() == Some(id) { ">" } else { " " };
        lines.push(format!(
            "{marker}{} HP {}/{} AP {}/{}",
            unit.name, unit.health, unit.max_health, unit.action_points, unit.max_action_points
        ));
        lines.push(format!(
            "  H2O {} Food {} Rad {:.0} ARS {}",
            unit.hydration, unit.nutrition, unit.radiation_dose, unit.ars_stage
        ));
    }
    lines
}

pub fn resource_line(game: &Game) -> String {
    let resources = game.resources();
    [Resource::Scrap, Resource::Medicine, Resource::Food, Resource::Water]
        .into_iter()
        .map(|resource| format!("{} {}", resource.label(), resources.get(resource)))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Numbered the way the card keys are bound.
pub fn hand_lines(game: &Game) -> Vec<String> {
    game.deck()
        .hand()
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let template = card.template();
            format!("{} {} ({} AP)", index + 1, template.name, template.cost)
        })
        .collect()
}

pub fn menu_lines(actions: &[ActionId]) -> Vec<String> {
    actions
        .iter()
        .enumerate()
        .map(|(index, action)| match action.ap_cost() {
            0 => format!("{} {}", index + 1, action.label()),
            cost => format!("{} {} ({cost} AP)", index + 1, action.label()),
        })
        .collect()
}

pub fn recap_lines(game: &Game) -> Vec<String> {
    vec![
        "Run recap:".to_string(),
        format!("Seed: {}", format_seed(game.seed())),
        format!("Turn reached: {}", game.turn()),
        format!("Survivors: {}", game.unit_count()),
        format!("Snapshot: {}", format_snapshot_hash(game.snapshot_hash())),
    ]
}

fn unit_name(game: &Game, id: UnitId) -> String {
    game.unit(id).map_or_else(|| "A survivor".to_string(), |unit| unit.name.clone())
}

pub fn event_log_line(game: &Game, event: &LogEvent) -> String {
    match event {
        LogEvent::PhaseChanged { turn, phase } => {
            format!("Turn {turn}: {}", phase_label(*phase))
        }
        LogEvent::UnitMoved { unit, to, ap_spent } => {
            format!("{} moved to {} ({ap_spent} AP)", unit_name(game, *unit), to.key())
        }
        LogEvent::RadiationTaken { unit, dose } => {
            format!("{} absorbed {dose:.1} rad", unit_name(game, *unit))
        }
        LogEvent::ArsStageChanged { unit, stage } => {
            format!("{} radiation sickness stage {stage}", unit_name(game, *unit))
        }
        LogEvent::Attack { attacker, defender, hit: false, .. } => {
            format!("{attacker} missed {defender}")
        }
        LogEvent::Attack { attacker, defender, damage, killed, .. } => {
            let tail = if *killed { ", killing them" } else { "" };
            format!("{attacker} hit {defender} for {damage}{tail}")
        }
        LogEvent::UnitDied { name } => format!("{name} has died"),
        LogEvent::EnemyDied { scrap_dropped, .. } => {
            format!("Raider down, {scrap_dropped} scrap recovered")
        }
        LogEvent::EnemySpawned { pos, .. } => format!("Raider spotted near {}", pos.key()),
        LogEvent::ResourceGained { resource, amount } => {
            format!("Found {amount} {}", resource.label())
        }
        LogEvent::NothingFound => "Found nothing".to_string(),
        LogEvent::CardPlayed { name } => format!("Played {name}"),
        LogEvent::CardDiscarded { name } => format!("Discarded {name}"),
        LogEvent::SupplyUsed { unit, resource } => {
            format!("{} used {}", unit_name(game, *unit), resource.label())
        }
        LogEvent::DoorChanged { pos } => format!("Door at {} changed", pos.key()),
        LogEvent::FurnitureUnlocked { pos } => format!("Unlocked furniture at {}", pos.key()),
        LogEvent::LockHeld { pos } => format!("The lock at {} held", pos.key()),
        LogEvent::EnteredBuilding { unit, .. } => {
            format!("{} went inside", unit_name(game, *unit))
        }
        LogEvent::ExitedBuilding { unit, to } => {
            format!("{} stepped out at {}", unit_name(game, *unit), to.key())
        }
        LogEvent::GameOver(outcome) => format!("Game over: {}", reason_code(*outcome)),
        LogEvent::Rejected(err) => format!("Can't: {err}"),
    }
}
