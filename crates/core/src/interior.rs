//! Building interiors.
//! This module exists so each building's indoor grid is a deterministic
//! function of its anchor tile and the world seed, generated on first entry
//! and cached by the game. It does not own the indoor/outdoor view switch.

mod generator;
mod model;

pub use generator::generate_interior;
pub use model::{BuildingInterior, Door, FurnitureState, InteriorTile, Room};
