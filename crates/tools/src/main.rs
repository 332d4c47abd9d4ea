use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wasteland_core::{Game, GameConfig, SaveData};

/// Validate a save file and print its summary.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the save JSON file
    #[arg(short, long)]
    save: PathBuf,
    /// Optional TOML balance overrides the save was played with
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let raw = fs::read_to_string(&args.save)
        .with_context(|| format!("Failed to read save file: {}", args.save.display()))?;
    let data: SaveData = serde_json::from_str(&raw).context("Failed to deserialize save JSON")?;
    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };

    let game = Game::from_save_data(&data, config).context("Save does not restore")?;
    let problems = game.audit();
    if !problems.is_empty() {
        bail!("Restored game is inconsistent: {problems:?}");
    }

    println!("Save is valid.");
    println!("Seed: {}", data.seed);
    println!("Turn: {} ({:?})", data.turn, data.phase);
    println!("Survivors: {}", data.units.len());
    for unit in &data.units {
        let place = unit.interior.as_deref().map_or("outdoors", |_| "indoors");
        println!(
            "  {} HP {} AP {} H2O {} Food {} Rad {:.1} at {},{} {place}",
            unit.name,
            unit.health,
            unit.action_points,
            unit.hydration,
            unit.nutrition,
            unit.radiation_dose,
            unit.x,
            unit.y
        );
    }
    println!("Raiders: {}", data.enemies.len());
    let resources = &data.global_resources;
    println!(
        "Resources: scrap {} medicine {} food {} water {}",
        resources.scrap, resources.medicine, resources.food, resources.water
    );
    println!(
        "Cards: hand {} deck {} discard {}",
        data.hand.len(),
        data.deck_size,
        data.discard_size
    );
    println!("Revealed tiles: {}", data.revealed_tiles.len());
    println!("Cached interiors: {}", data.interiors.len());
    println!("Snapshot Hash: {:016x}", game.snapshot_hash());

    Ok(())
}
