pub mod config;
pub mod content;
pub mod error;
pub mod game;
pub mod interior;
pub mod noise_field;
pub mod pathfinding;
pub mod rng;
pub mod save;
pub mod types;
pub mod world;

pub use config::{ConfigError, GameConfig};
pub use error::{GameError, SaveError};
pub use game::{ActionId, Game, TileKind, TileView};
pub use save::SaveData;
pub use types::*;
