//! Temporary modifiers that last until the end of the current turn.

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnModifier {
    MoveBonus { unit: UnitId, amount: i32 },
}

impl TurnModifier {
    pub fn unit(self) -> UnitId {
        match self {
            TurnModifier::MoveBonus { unit, .. } => unit,
        }
    }
}

impl Game {
    pub fn modifiers(&self) -> &[TurnModifier] {
        &self.modifiers
    }

    pub(super) fn add_modifier(&mut self, modifier: TurnModifier) {
        self.modifiers.push(modifier);
    }

    /// Base move range plus every active bonus for this unit.
    pub fn effective_move_range(&self, id: UnitId) -> i32 {
        let Some(unit) = self.units.get(id) else {
            return 0;
        };
        let bonus: i32 = self
            .modifiers
            .iter()
            .filter_map(|modifier| match *modifier {
                TurnModifier::MoveBonus { unit, amount } if unit == id => Some(amount),
                _ => None,
            })
            .sum();
        (unit.move_range + bonus).max(0)
    }

    pub(super) fn clear_turn_modifiers(&mut self) {
        self.modifiers.clear();
    }
}
