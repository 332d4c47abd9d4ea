//! Deck, hand and discard pile, plus card play.
//! Cards only ever move between the three piles, so their total is fixed for
//! the whole game. Effects resolve in template order against the selected unit.

use std::iter;

use tracing::debug;

use super::*;
use crate::config::CardConfig;
use crate::content::{CardEffect, CardKind, TargetType};
use crate::error::SaveError;
use crate::rng::RandomSource;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    /// Drawn from the back.
    draw_pile: Vec<CardKind>,
    hand: Vec<CardKind>,
    discard: Vec<CardKind>,
    hand_limit: usize,
}

impl Deck {
    /// `copies_per_card` of every starter card, shuffled.
    pub fn starter(config: &CardConfig, rng: &mut impl RandomSource) -> Self {
        let mut draw_pile: Vec<CardKind> = CardKind::STARTER
            .into_iter()
            .flat_map(|kind| iter::repeat_n(kind, config.copies_per_card))
            .collect();
        rng.shuffle(&mut draw_pile);
        Self { draw_pile, hand: Vec::new(), discard: Vec::new(), hand_limit: config.hand_limit }
    }

    /// Rebuilds a saved deck: named hand cards are pulled out of a fresh
    /// shuffled deck, then `discard_size` more go to the discard pile.
    pub(crate) fn restore(
        config: &CardConfig,
        rng: &mut impl RandomSource,
        hand: &[String],
        discard_size: usize,
    ) -> Result<Self, SaveError> {
        let mut deck = Self::starter(config, rng);
        for name in hand {
            let kind = CardKind::from_name(name)
                .ok_or_else(|| SaveError::UnknownCard(name.clone()))?;
            let idx = deck
                .draw_pile
                .iter()
                .position(|&card| card == kind)
                .ok_or_else(|| SaveError::UnknownCard(name.clone()))?;
            deck.draw_pile.remove(idx);
            deck.hand.push(kind);
        }
        for _ in 0..discard_size {
            let Some(card) = deck.draw_pile.pop() else {
                break;
            };
            deck.discard.push(card);
        }
        Ok(deck)
    }

    /// Draws one card. A full hand leaves the card in the deck; an empty deck
    /// reshuffles the discard pile first, and yields nothing if that is empty
    /// too.
    pub fn draw(&mut self, rng: &mut impl RandomSource) -> Option<CardKind> {
        if self.hand.len() >= self.hand_limit {
            return None;
        }
        if self.draw_pile.is_empty() {
            if self.discard.is_empty() {
                return None;
            }
            self.draw_pile.append(&mut self.discard);
            rng.shuffle(&mut self.draw_pile);
            debug!(cards = self.draw_pile.len(), "discard reshuffled into deck");
        }
        let card = self.draw_pile.pop()?;
        self.hand.push(card);
        Some(card)
    }

    /// Returns how many cards were actually drawn.
    pub fn draw_many(&mut self, count: usize, rng: &mut impl RandomSource) -> usize {
        (0..count).take_while(|_| self.draw(rng).is_some()).count()
    }

    /// Moves a hand card to the discard pile.
    pub fn discard_from_hand(&mut self, idx: usize) -> Option<CardKind> {
        if idx >= self.hand.len() {
            return None;
        }
        let card = self.hand.remove(idx);
        self.discard.push(card);
        Some(card)
    }

    pub fn hand(&self) -> &[CardKind] {
        &self.hand
    }

    pub fn draw_pile(&self) -> &[CardKind] {
        &self.draw_pile
    }

    pub fn discard_pile(&self) -> &[CardKind] {
        &self.discard
    }

    pub fn deck_size(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_size(&self) -> usize {
        self.discard.len()
    }

    pub fn hand_limit(&self) -> usize {
        self.hand_limit
    }

    pub fn total(&self) -> usize {
        self.draw_pile.len() + self.hand.len() + self.discard.len()
    }

    /// Moves one copy of `kind` into the hand from wherever it sits.
    #[cfg(test)]
    pub(crate) fn force_into_hand(&mut self, kind: CardKind) -> usize {
        if let Some(idx) = self.hand.iter().position(|&card| card == kind) {
            return idx;
        }
        for pile in [&mut self.draw_pile, &mut self.discard] {
            if let Some(idx) = pile.iter().position(|&card| card == kind) {
                pile.remove(idx);
                break;
            }
        }
        self.hand.push(kind);
        self.hand.len() - 1
    }
}

impl Game {
    pub(super) fn draw_cards(&mut self, count: usize) -> usize {
        self.deck.draw_many(count, &mut self.dice)
    }

    /// Plays a hand card on the selected unit, which pays its AP cost.
    pub fn play_card(&mut self, hand_index: usize) -> Result<&'static str, GameError> {
        self.ensure_active()?;
        let id = self.selected_unit()?;
        let kind =
            self.deck.hand().get(hand_index).copied().ok_or(GameError::CardNotInHand(hand_index))?;
        let template = kind.template();
        let unit = self.units.get_mut(id).ok_or(GameError::UnknownUnit)?;
        unit.spend_ap(template.cost)?;

        self.deck.discard_from_hand(hand_index);
        for &effect in template.effects {
            self.apply_card_effect(id, template.target, effect);
        }
        debug!(card = template.name, unit = ?id, "card played");
        self.log.push(LogEvent::CardPlayed { name: template.name });
        Ok(template.name)
    }

    pub fn discard_card(&mut self, hand_index: usize) -> Result<&'static str, GameError> {
        self.ensure_active()?;
        let kind =
            self.deck.discard_from_hand(hand_index).ok_or(GameError::CardNotInHand(hand_index))?;
        self.log.push(LogEvent::CardDiscarded { name: kind.name() });
        Ok(kind.name())
    }

    fn apply_card_effect(&mut self, id: UnitId, target: TargetType, effect: CardEffect) {
        if let CardEffect::GainScrap(amount) = effect {
            self.gain_resource(Resource::Scrap, amount);
            return;
        }
        if target == TargetType::Party {
            return;
        }
        match effect {
            CardEffect::MoveBonus(amount) => {
                self.add_modifier(TurnModifier::MoveBonus { unit: id, amount });
            }
            CardEffect::SelfDamage(amount) => {
                self.damage_unit(id, amount);
            }
            CardEffect::CureRadiation(amount) => {
                if let Some(unit) = self.units.get_mut(id)
                    && let Some(stage) = unit.cure_radiation(amount)
                {
                    self.log.push(LogEvent::ArsStageChanged { unit: id, stage });
                }
            }
            CardEffect::Heal(amount) => {
                if let Some(unit) = self.units.get_mut(id) {
                    unit.heal(amount);
                }
            }
            CardEffect::RestoreAp(amount) => {
                if let Some(unit) = self.units.get_mut(id) {
                    unit.restore_ap(amount);
                }
            }
            CardEffect::Hydrate(amount) => {
                if let Some(unit) = self.units.get_mut(id) {
                    unit.hydrate(amount);
                }
            }
            CardEffect::Nourish(amount) => {
                if let Some(unit) = self.units.get_mut(id) {
                    unit.nourish(amount);
                }
            }
            CardEffect::GainScrap(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::game::test_support::{quiet_game, select_first};
    use crate::rng::Dice;

    fn deck() -> (Deck, Dice) {
        let mut dice = Dice::from_seed(17);
        (Deck::starter(&CardConfig::default(), &mut dice), dice)
    }

    #[test]
    fn starter_deck_holds_two_of_each() {
        let (deck, _) = deck();
        assert_eq!(deck.deck_size(), 20);
        for kind in CardKind::STARTER {
            assert_eq!(deck.draw_pile().iter().filter(|&&card| card == kind).count(), 2);
        }
    }

    #[test]
    fn full_hand_leaves_cards_in_the_deck() {
        let (mut deck, mut dice) = deck();
        assert_eq!(deck.draw_many(10, &mut dice), 7);
        assert_eq!(deck.hand().len(), 7);
        assert_eq!(deck.deck_size(), 13);
        assert_eq!(deck.draw(&mut dice), None);
        assert_eq!(deck.total(), 20);
    }

    #[test]
    fn empty_deck_reshuffles_discard() {
        let mut dice = Dice::from_seed(3);
        let config = CardConfig { copies_per_card: 1, hand_limit: 20, ..CardConfig::default() };
        let mut deck = Deck::starter(&config, &mut dice);
        assert_eq!(deck.draw_many(10, &mut dice), 10);
        assert_eq!(deck.draw(&mut dice), None, "deck and discard are both empty");
        deck.discard_from_hand(0);
        deck.discard_from_hand(0);
        assert_eq!(deck.draw_many(5, &mut dice), 2);
        assert_eq!(deck.discard_size(), 0);
        assert_eq!(deck.hand().len(), 10);
    }

    #[test]
    fn restore_pulls_named_cards_out_of_a_fresh_deck() {
        let mut dice = Dice::from_seed(8);
        let hand = vec!["Sprint".to_string(), "Sprint".to_string(), "Bandage".to_string()];
        let deck = Deck::restore(&CardConfig::default(), &mut dice, &hand, 4).expect("restore");
        assert_eq!(deck.hand(), &[CardKind::Sprint, CardKind::Sprint, CardKind::Bandage]);
        assert_eq!(deck.discard_size(), 4);
        assert_eq!(deck.deck_size(), 13);

        let third = vec!["Sprint".to_string(); 3];
        let err = Deck::restore(&CardConfig::default(), &mut dice, &third, 0)
            .expect_err("only two Sprints exist");
        assert!(matches!(err, SaveError::UnknownCard(name) if name == "Sprint"));
    }

    #[test]
    fn playing_a_card_spends_ap_and_discards() {
        let mut game = quiet_game(21);
        let id = select_first(&mut game);
        let idx = game.deck.force_into_hand(CardKind::Sprint);
        let base = game.effective_move_range(id);
        assert_eq!(game.play_card(idx), Ok("Sprint"));
        assert_eq!(game.effective_move_range(id), base + 2);
        assert_eq!(game.unit(id).map(|unit| unit.action_points), Some(2));
        assert_eq!(game.deck().discard_pile().last(), Some(&CardKind::Sprint));
        assert_eq!(game.deck().total(), 20);
    }

    #[test]
    fn combat_stim_restores_then_hurts() {
        let mut game = quiet_game(22);
        let id = select_first(&mut game);
        game.units[id].action_points = 0;
        let idx = game.deck.force_into_hand(CardKind::CombatStim);
        assert_eq!(game.play_card(idx), Ok("Combat Stim"));
        let unit = game.unit(id).expect("alive");
        assert_eq!(unit.action_points, 2);
        assert_eq!(unit.health, unit.max_health - 10);
    }

    #[test]
    fn scavenge_feeds_the_shared_pool() {
        let mut game = quiet_game(25);
        select_first(&mut game);
        let scrap = game.resources().scrap;
        let idx = game.deck.force_into_hand(CardKind::Scavenge);
        assert_eq!(game.play_card(idx), Ok("Scavenge"));
        assert_eq!(game.resources().scrap, scrap + 5);
    }

    #[test]
    fn card_cost_is_checked_before_anything_moves() {
        let mut game = quiet_game(23);
        let id = select_first(&mut game);
        game.units[id].action_points = 0;
        let idx = game.deck.force_into_hand(CardKind::FirstAid);
        let before = game.deck().clone();
        let err = game.play_card(idx).expect_err("no AP");
        assert_eq!(err, GameError::NotEnoughAp { needed: 1, available: 0 });
        assert_eq!(game.deck(), &before);
    }

    #[test]
    fn discard_needs_a_real_hand_index() {
        let mut game = quiet_game(24);
        assert_eq!(game.discard_card(99), Err(GameError::CardNotInHand(99)));
        let size = game.deck().hand().len();
        assert!(game.discard_card(0).is_ok());
        assert_eq!(game.deck().hand().len(), size - 1);
        assert_eq!(game.deck().discard_size(), 1);
    }

    #[derive(Clone, Debug)]
    enum DeckOp {
        Draw(usize),
        Play(usize),
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn card_total_is_conserved(
            seed in any::<u64>(),
            ops in prop::collection::vec(
                prop_oneof![
                    (0..4_usize).prop_map(DeckOp::Draw),
                    (0..8_usize).prop_map(DeckOp::Play),
                ],
                1..60,
            ),
        ) {
            let mut dice = Dice::from_seed(seed);
            let mut deck = Deck::starter(&CardConfig::default(), &mut dice);
            let total = deck.total();
            for op in ops {
                match op {
                    DeckOp::Draw(count) => {
                        deck.draw_many(count, &mut dice);
                    }
                    DeckOp::Play(idx) => {
                        deck.discard_from_hand(idx);
                    }
                }
                prop_assert_eq!(deck.total(), total);
                prop_assert!(deck.hand().len() <= deck.hand_limit());
            }
        }
    }
}
