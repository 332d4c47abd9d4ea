//! Tunable game constants.
//! This module exists so balance numbers live in one serde tree that can be
//! overridden from TOML. It does not own the catalogs of terrain, furniture
//! or cards, which are fixed content.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game: RulesConfig,
    pub world: WorldConfig,
    pub unit: UnitConfig,
    pub radiation: RadiationConfig,
    pub combat: CombatConfig,
    pub cards: CardConfig,
    pub resources: StartingResources,
    pub enemy: EnemyConfig,
}

impl GameConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_toml_str(&raw)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub max_turns: u32,
    pub starting_units: usize,
    pub starting_ap: i32,
    pub enemy_spawn_interval: u32,
    pub starting_enemies: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_turns: 30,
            starting_units: 3,
            starting_ap: 3,
            enemy_spawn_interval: 3,
            starting_enemies: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub chunk_size: i32,
    pub max_coord: i32,
    pub reveal_radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { chunk_size: 20, max_coord: 10_000, reveal_radius: 5 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    pub max_health: i32,
    pub max_hydration: i32,
    pub max_nutrition: i32,
    pub max_radiation: f64,
    pub base_move_range: i32,
    pub hydration_decay: i32,
    pub nutrition_decay: i32,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_hydration: 100,
            max_nutrition: 100,
            max_radiation: 100.0,
            base_move_range: 3,
            hydration_decay: 5,
            nutrition_decay: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiationConfig {
    pub dose_per_turn: f64,
    /// Ascending dose thresholds for ARS stages 1 through 4.
    pub ars_thresholds: [f64; 4],
    pub movement_dose_factor: f64,
}

impl Default for RadiationConfig {
    fn default() -> Self {
        Self {
            dose_per_turn: 10.0,
            ars_thresholds: [25.0, 50.0, 75.0, 100.0],
            movement_dose_factor: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub base_damage: i32,
    pub damage_variance: f64,
    pub miss_chance: f64,
    pub melee_range: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self { base_damage: 20, damage_variance: 10.0, miss_chance: 0.1, melee_range: 1.5 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub hand_limit: usize,
    pub opening_hand: usize,
    pub draw_per_turn: usize,
    pub copies_per_card: usize,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self { hand_limit: 7, opening_hand: 5, draw_per_turn: 2, copies_per_card: 2 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingResources {
    pub scrap: i32,
    pub medicine: i32,
    pub food: i32,
    pub water: i32,
}

impl Default for StartingResources {
    fn default() -> Self {
        Self { scrap: 10, medicine: 2, food: 5, water: 5 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub health: i32,
    pub damage: i32,
    pub move_range: usize,
    pub attack_range: f64,
    pub sight_range: f64,
    pub flee_fraction: f64,
    pub min_spawn_distance: f64,
    pub spawn_attempts: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            health: 60,
            damage: 20,
            move_range: 2,
            attack_range: 1.0,
            sight_range: 6.0,
            flee_fraction: 0.2,
            min_spawn_distance: 8.0,
            spawn_attempts: 50,
        }
    }
}
