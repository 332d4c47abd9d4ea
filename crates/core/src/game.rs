//! The explicit game aggregate.
//! This module exists so every subsystem mutates one owned `Game` value
//! instead of ambient globals, and `reset()` simply builds a fresh one. It
//! owns units, enemies, the deck, shared resources, cached interiors and the
//! turn machine. It does not own terrain generation or interior layout.

mod audit;
mod buildings;
mod cards;
mod combat;
mod enemies;
mod hash;
mod intent;
mod interactions;
mod interpolation;
mod modifiers;
mod movement;
mod persist;
mod survival;
#[cfg(test)]
pub(crate) mod test_support;
mod turn;
mod units;
mod views;

use std::collections::BTreeMap;

use slotmap::SlotMap;
use tracing::info;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::interior::BuildingInterior;
use crate::rng::{Dice, mix_seed_stream};
use crate::types::*;
use crate::world::World;

pub use cards::Deck;
pub use combat::{CombatRoll, resolve_combat};
pub use enemies::{AiState, Enemy};
pub use interactions::ActionId;
pub use interpolation::{DisplayTrack, ENEMY_TRACK_SPEED, UNIT_TRACK_SPEED};
pub use modifiers::TurnModifier;
pub use survival::GlobalResources;
pub use units::{IndoorState, Unit, ars_stage_for};
pub use views::{TileKind, TileView};

const STARTING_SURVIVORS: [(&str, Pos); 3] =
    [("Alex", Pos::new(0, 0)), ("Jordan", Pos::new(1, 0)), ("Casey", Pos::new(0, 1))];

pub struct Game {
    seed: u64,
    config: GameConfig,
    dice: Dice,
    world: World,
    units: SlotMap<UnitId, Unit>,
    enemies: SlotMap<EnemyId, Enemy>,
    next_unit_serial: u32,
    next_enemy_serial: u32,
    resources: GlobalResources,
    deck: Deck,
    turn: u32,
    phase: Phase,
    outcome: Option<RunOutcome>,
    selected: Option<UnitId>,
    view: ViewMode,
    interiors: BTreeMap<Pos, BuildingInterior>,
    modifiers: Vec<TurnModifier>,
    log: Vec<LogEvent>,
    message: Option<String>,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameConfig::default())
    }

    /// Starting party, opening reveal, starting raiders and the opening hand.
    pub fn with_config(seed: u64, config: GameConfig) -> Self {
        let mut game = Self::blank(seed, config);
        let survivors = game.config.game.starting_units;
        for (name, pos) in STARTING_SURVIVORS.into_iter().take(survivors) {
            game.add_unit(name, pos);
        }
        game.reveal_around_units();
        for _ in 0..game.config.game.starting_enemies {
            game.spawn_enemy();
        }
        game.begin_first_turn();
        info!(seed, units = game.units.len(), enemies = game.enemies.len(), "new game");
        game
    }

    /// World, deck and resources for `seed` with nobody on the map yet.
    fn blank(seed: u64, config: GameConfig) -> Self {
        let mut dice = Dice::from_seed(mix_seed_stream(seed, 0));
        let deck = Deck::starter(&config.cards, &mut dice);
        Self {
            seed,
            world: World::new(seed, &config.world),
            resources: GlobalResources::from_config(&config.resources),
            config,
            dice,
            units: SlotMap::with_key(),
            enemies: SlotMap::with_key(),
            next_unit_serial: 1,
            next_enemy_serial: 1,
            deck,
            turn: 1,
            phase: Phase::EventDraw,
            outcome: None,
            selected: None,
            view: ViewMode::Outdoor,
            interiors: BTreeMap::new(),
            modifiers: Vec::new(),
            log: Vec::new(),
            message: None,
        }
    }

    /// Discards everything and starts over with the same seed and config.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.seed, self.config.clone());
    }

    pub fn reset_with_seed(&mut self, seed: u64) {
        *self = Self::with_config(seed, self.config.clone());
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units.iter()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        self.enemies.iter()
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    pub fn resources(&self) -> &GlobalResources {
        &self.resources
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    /// Transient message for the most recent rejection or notable result.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Only the ACTIONS phase of a running game accepts player input.
    fn ensure_active(&self) -> Result<(), GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        if self.phase != Phase::Actions {
            return Err(GameError::WrongPhase(self.phase));
        }
        Ok(())
    }

    fn selected_unit(&self) -> Result<UnitId, GameError> {
        let id = self.selected.ok_or(GameError::NoSelection)?;
        if self.units.contains_key(id) { Ok(id) } else { Err(GameError::UnknownUnit) }
    }

    fn reveal_around_units(&mut self) {
        let radius = self.config.world.reveal_radius;
        let outdoor: Vec<Pos> =
            self.units.values().filter(|unit| !unit.is_indoors()).map(|unit| unit.pos).collect();
        for pos in outdoor {
            self.world.reveal_around_position(pos, radius);
        }
    }

    fn note(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }
}
