//! Cross-collection consistency checks.
//! This module exists so fuzzers and tests share one definition of a healthy
//! game: stats inside their bounds, tile occupancy agreeing with the actor
//! tables, and the deck holding every card exactly once. It does not repair
//! anything.

use super::*;
use crate::content::CardKind;

impl Game {
    /// Every broken invariant, described. Empty when the game is consistent.
    pub fn audit(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (id, unit) in &self.units {
            let bounded = [
                ("health", unit.health, unit.max_health),
                ("action points", unit.action_points, unit.max_action_points),
                ("hydration", unit.hydration, unit.max_hydration),
                ("nutrition", unit.nutrition, unit.max_nutrition),
            ];
            for (stat, value, max) in bounded {
                if !(0..=max).contains(&value) {
                    problems.push(format!("{} has {stat} {value} outside 0..={max}", unit.name));
                }
            }
            if !(0.0..=unit.max_radiation).contains(&unit.radiation_dose) {
                problems.push(format!("{} has dose {}", unit.name, unit.radiation_dose));
            }
            if unit.max_action_points < 1 {
                problems.push(format!("{} lost every action point", unit.name));
            }
            let on_tile = match unit.indoors {
                Some(state) => self
                    .interiors
                    .get(&state.building)
                    .and_then(|interior| interior.tile(unit.pos))
                    .map(|tile| tile.occupant),
                None => self.world.tile(unit.pos).map(|tile| tile.occupant),
            };
            if on_tile != Some(Occupant::Unit(id)) {
                problems.push(format!("{} is not on its tile {:?}", unit.name, unit.pos));
            }
        }
        for (id, enemy) in &self.enemies {
            if self.world.occupant(enemy.pos) != Occupant::Enemy(id) {
                let serial = enemy.serial;
                problems.push(format!("raider {serial} is not on its tile {:?}", enemy.pos));
            }
        }
        for chunk in self.world.chunks() {
            for tile in &chunk.tiles {
                let stale = match tile.occupant {
                    Occupant::Unit(id) => self
                        .units
                        .get(id)
                        .is_none_or(|unit| unit.is_indoors() || unit.pos != tile.pos),
                    Occupant::Enemy(id) => {
                        self.enemies.get(id).is_none_or(|enemy| enemy.pos != tile.pos)
                    }
                    Occupant::Empty => false,
                };
                if stale {
                    problems.push(format!("stale occupant on {:?}", tile.pos));
                }
            }
        }
        let expected = CardKind::STARTER.len() * self.config.cards.copies_per_card;
        if self.deck.total() != expected {
            problems.push(format!("deck holds {} cards, expected {expected}", self.deck.total()));
        }
        if self.deck.hand().len() > self.deck.hand_limit() {
            problems.push(format!("hand holds {} cards", self.deck.hand().len()));
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{first_unit, quiet_game};

    #[test]
    fn fresh_game_is_consistent() {
        assert_eq!(Game::new(1).audit(), Vec::<String>::new());
    }

    #[test]
    fn detached_occupant_is_reported() {
        let mut game = quiet_game(2);
        let (_, pos) = first_unit(&game).expect("unit");
        game.world.set_occupant(pos, Occupant::Empty);
        let problems = game.audit();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("Alex is not on its tile"));
    }
}
