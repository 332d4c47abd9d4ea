use anyhow::{Result, bail};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wasteland_core::{ActionId, Game, Intent, MouseButton, Pos, Resource};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 30)]
    turns: u32,
    /// Intents tried per turn before the turn is ended
    #[arg(long, default_value_t = 25)]
    intents_per_turn: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn offset(rng: &mut ChaCha8Rng, reach: i32) -> i32 {
    (rng.next_u64() % (2 * reach as u64 + 1)) as i32 - reach
}

fn random_intent(game: &Game, rng: &mut ChaCha8Rng) -> Intent {
    let anchors: Vec<Pos> = game.units().map(|(_, unit)| unit.pos).collect();
    let anchor = if anchors.is_empty() { Pos::new(0, 0) } else { choose(rng, &anchors) };
    match rng.next_u64() % 8 {
        0..=2 => Intent::TileClicked {
            pos: anchor.offset(offset(rng, 5), offset(rng, 5)),
            // Bias to left clicks so survivors actually move
            button: choose(rng, &[MouseButton::Left, MouseButton::Left, MouseButton::Right]),
        },
        3 | 4 => Intent::ActionInvoked {
            action: choose(rng, &ActionId::ALL),
            pos: anchor.offset(offset(rng, 1), offset(rng, 1)),
        },
        5 => Intent::PlayCard { hand_index: (rng.next_u64() % 6) as usize },
        6 => Intent::DiscardCard { hand_index: (rng.next_u64() % 6) as usize },
        _ => Intent::UseSupply {
            resource: choose(rng, &[Resource::Water, Resource::Food, Resource::Medicine]),
        },
    }
}

fn check(game: &Game, context: &str) -> Result<()> {
    let problems = game.audit();
    if !problems.is_empty() {
        bail!("Invariant failed after {context} on seed {}: {problems:?}", game.seed());
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for max {} turns...", args.seed, args.turns);
    let mut game = Game::new(args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut rejected = 0_u32;

    while game.turn() <= args.turns && !game.is_over() {
        for _ in 0..args.intents_per_turn {
            if game.is_over() {
                break;
            }
            let intent = random_intent(&game, &mut rng);
            if let Err(err) = game.apply_intent(intent.clone()) {
                debug!(?intent, %err, "intent rejected");
                rejected += 1;
            }
            check(&game, &format!("{intent:?}"))?;
        }
        if game.is_over() {
            break;
        }
        let turn = game.end_turn()?;
        check(&game, &format!("end of turn {}", turn - 1))?;
        info!(turn, survivors = game.unit_count(), "turn ended");
    }

    match game.outcome() {
        Some(outcome) => println!("Finished with outcome {outcome:?} on turn {}", game.turn()),
        None => println!("Stopped on turn {} without an outcome", game.turn()),
    }
    println!("Rejected intents: {rejected}");
    println!("Snapshot Hash: {:016x}", game.snapshot_hash());
    println!("Fuzzing completed successfully.");
    Ok(())
}
