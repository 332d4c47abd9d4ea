//! The turn/phase machine.
//! EVENT_DRAW and PLAYER_HAND run once to deal the opening hand; after that
//! the game loops ACTIONS -> END_PHASE -> ACTIONS, incrementing the turn.
//! END_PHASE processing is synchronous, so callers never observe it idle.

use tracing::{debug, info};

use super::*;

impl Game {
    pub(super) fn begin_first_turn(&mut self) {
        self.set_phase(Phase::EventDraw);
        self.set_phase(Phase::PlayerHand);
        let opening = self.config.cards.opening_hand;
        self.draw_cards(opening);
        self.set_phase(Phase::Actions);
    }

    pub(super) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.log.push(LogEvent::PhaseChanged { turn: self.turn, phase });
    }

    /// Runs the end phase and returns the new turn number.
    pub fn end_turn(&mut self) -> Result<u32, GameError> {
        self.ensure_active()?;
        self.set_phase(Phase::EndPhase);
        self.run_end_phase();
        if self.outcome.is_none() {
            self.set_phase(Phase::Actions);
        }
        Ok(self.turn)
    }

    fn run_end_phase(&mut self) {
        self.apply_radiation_phase();
        if self.outcome.is_some() {
            return;
        }
        self.apply_decay_phase();
        if self.outcome.is_some() {
            return;
        }
        self.update_enemies();
        if self.outcome.is_some() {
            return;
        }
        let interval = self.config.game.enemy_spawn_interval;
        if interval > 0 && self.turn % interval == 0 {
            self.spawn_enemy();
        }
        let draws = self.config.cards.draw_per_turn;
        let drawn = self.draw_cards(draws);
        self.clear_turn_modifiers();
        for unit in self.units.values_mut() {
            unit.reset_ap();
        }
        self.turn += 1;
        debug!(turn = self.turn, drawn, enemies = self.enemies.len(), "end phase done");
        self.check_game_end();
    }

    /// Defeat once nobody is left. Called after every death.
    pub(super) fn check_defeat(&mut self) {
        if self.outcome.is_none() && self.units.is_empty() {
            self.finish(RunOutcome::Defeat);
        }
    }

    pub(super) fn check_game_end(&mut self) {
        self.check_defeat();
        if self.outcome.is_none() && self.turn > self.config.game.max_turns {
            self.finish(RunOutcome::Victory);
        }
    }

    fn finish(&mut self, outcome: RunOutcome) {
        self.outcome = Some(outcome);
        self.selected = None;
        info!(?outcome, turn = self.turn, "game over");
        self.log.push(LogEvent::GameOver(outcome));
    }
}
