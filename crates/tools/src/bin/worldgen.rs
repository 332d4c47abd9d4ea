use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wasteland_core::content::Terrain;
use wasteland_core::world::{Tile, World};
use wasteland_core::{GameConfig, Pos};

/// Print an ASCII render of the wasteland around a point.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short = 'x', long, default_value_t = 0, allow_negative_numbers = true)]
    center_x: i32,
    #[arg(short = 'y', long, default_value_t = 0, allow_negative_numbers = true)]
    center_y: i32,
    #[arg(short, long, default_value_t = 24)]
    radius: i32,
    /// Optional TOML world overrides
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn glyph(tile: &Tile) -> char {
    if tile.has_building {
        return '#';
    }
    if !tile.props.is_empty() {
        return '^';
    }
    if tile.has_road {
        return '=';
    }
    match tile.terrain {
        Terrain::Grass => '"',
        Terrain::Dirt => '.',
        Terrain::Mud => ',',
        Terrain::Sand => ':',
        Terrain::Pavement => '_',
        Terrain::Concrete => '+',
        Terrain::Toxic => '!',
        Terrain::Water => '~',
        Terrain::Rubble => '%',
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();
    ensure!(args.radius > 0, "radius must be positive");

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };
    let center = Pos::new(args.center_x, args.center_y);
    let mut world = World::new(args.seed, &config.world);
    world.ensure_area(center, args.radius);

    println!(
        "Seed {} around {} (radius {}, {} chunks)",
        args.seed,
        center.key(),
        args.radius,
        world.chunk_count()
    );
    for dy in -args.radius..=args.radius {
        let row: String = (-args.radius..=args.radius)
            .map(|dx| world.tile(center.offset(dx, dy)).map_or(' ', glyph))
            .collect();
        println!("{row}");
    }
    println!("# building  ^ prop  = road  ~ water  ! toxic  % rubble");
    Ok(())
}
