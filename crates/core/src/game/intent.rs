//! Intent dispatch: the single entry point for front-end input.

use tracing::debug;

use super::*;

impl Game {
    /// Applies one intent. A rejection leaves state untouched apart from the
    /// transient message and a `Rejected` journal entry.
    pub fn apply_intent(&mut self, intent: Intent) -> Result<IntentOutcome, GameError> {
        let result = self.dispatch_intent(intent);
        if let Err(err) = &result {
            debug!(%err, "intent rejected");
            self.note(err.to_string());
            self.log.push(LogEvent::Rejected(err.clone()));
        }
        result
    }

    fn dispatch_intent(&mut self, intent: Intent) -> Result<IntentOutcome, GameError> {
        match intent {
            Intent::TileClicked { pos, button: MouseButton::Left } => self.left_click(pos),
            Intent::TileClicked { button: MouseButton::Right, .. } => {
                self.deselect();
                Ok(IntentOutcome::Deselected)
            }
            Intent::ActionInvoked { action, pos } => {
                self.perform_action(action, pos)?;
                Ok(IntentOutcome::Acted(action))
            }
            Intent::PlayCard { hand_index } => {
                self.play_card(hand_index).map(IntentOutcome::CardPlayed)
            }
            Intent::DiscardCard { hand_index } => {
                self.discard_card(hand_index).map(IntentOutcome::CardDiscarded)
            }
            Intent::UseSupply { resource } => {
                self.use_supply(resource).map(IntentOutcome::SupplyUsed)
            }
            Intent::EndTurnRequested => {
                self.end_turn().map(|turn| IntentOutcome::TurnEnded { turn })
            }
        }
    }

    /// Selects a unit standing on `pos`, otherwise moves the selected unit
    /// there when it is in range.
    fn left_click(&mut self, pos: Pos) -> Result<IntentOutcome, GameError> {
        self.ensure_active()?;
        if let Some(id) = self.unit_at(pos) {
            self.select_unit(id)?;
            return Ok(IntentOutcome::Selected(id));
        }
        let Some(id) = self.selected else {
            return Ok(IntentOutcome::Ignored);
        };
        if !self.movement_range(id).contains_key(&pos) {
            return Ok(IntentOutcome::Ignored);
        }
        let ap_spent = self.move_unit(id, pos)?;
        Ok(IntentOutcome::Moved { unit: id, to: pos, ap_spent })
    }

    /// The unit on `pos` in the current scene.
    pub fn unit_at(&self, pos: Pos) -> Option<UnitId> {
        match self.view {
            ViewMode::Outdoor => self.world.occupant(pos).unit(),
            ViewMode::Indoor { .. } => {
                self.current_interior().and_then(|interior| interior.tile(pos))?.occupant.unit()
            }
        }
    }

    /// Selects `id` and switches the view to wherever it stands.
    pub fn select_unit(&mut self, id: UnitId) -> Result<(), GameError> {
        let unit = self.units.get(id).ok_or(GameError::UnknownUnit)?;
        self.view = match unit.indoors {
            Some(state) => ViewMode::Indoor { building: state.building },
            None => ViewMode::Outdoor,
        };
        self.selected = Some(id);
        Ok(())
    }

    /// Cycles the selection in roster order, wrapping around.
    pub fn select_next_unit(&mut self) -> Option<UnitId> {
        let ids: Vec<UnitId> = self.units.keys().collect();
        let current = self.selected.and_then(|id| ids.iter().position(|&other| other == id));
        let next = match current {
            Some(idx) => ids[(idx + 1) % ids.len()],
            None => *ids.first()?,
        };
        self.select_unit(next).ok()?;
        Some(next)
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{first_unit, flatten, quiet_game};

    #[test]
    fn click_selects_then_moves() {
        let mut game = quiet_game(31);
        let (id, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 6);
        let click = |pos| Intent::TileClicked { pos, button: MouseButton::Left };
        assert_eq!(game.apply_intent(click(pos)), Ok(IntentOutcome::Selected(id)));
        let target = pos.offset(-3, 0);
        assert_eq!(
            game.apply_intent(click(target)),
            Ok(IntentOutcome::Moved { unit: id, to: target, ap_spent: 1 })
        );
        assert_eq!(game.apply_intent(click(pos.offset(-6, -6))), Ok(IntentOutcome::Ignored));
        assert_eq!(
            game.apply_intent(Intent::TileClicked { pos, button: MouseButton::Right }),
            Ok(IntentOutcome::Deselected)
        );
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn rejection_sets_the_message_and_journals_it() {
        let mut game = quiet_game(32);
        let before = game.snapshot_hash();
        let err = game.apply_intent(Intent::PlayCard { hand_index: 0 }).expect_err("no selection");
        assert_eq!(err, GameError::NoSelection);
        assert_eq!(game.message(), Some("no survivor selected"));
        assert_eq!(game.log().last(), Some(&LogEvent::Rejected(GameError::NoSelection)));
        assert_eq!(game.snapshot_hash(), before);
    }

    #[test]
    fn select_next_wraps_around_the_roster() {
        let mut game = quiet_game(33);
        let ids: Vec<UnitId> = game.units().map(|(id, _)| id).collect();
        assert_eq!(game.select_next_unit(), Some(ids[0]));
        assert_eq!(game.select_next_unit(), Some(ids[1]));
        assert_eq!(game.select_next_unit(), Some(ids[2]));
        assert_eq!(game.select_next_unit(), Some(ids[0]));
    }

    #[test]
    fn end_turn_intent_reports_the_new_turn() {
        let mut game = quiet_game(34);
        let outcome = game.apply_intent(Intent::EndTurnRequested);
        assert_eq!(outcome, Ok(IntentOutcome::TurnEnded { turn: 2 }));
    }
}
