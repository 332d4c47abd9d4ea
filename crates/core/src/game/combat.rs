//! Melee resolution between survivors and raiders.

use tracing::debug;

use super::*;
use crate::config::CombatConfig;
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatRoll {
    pub hit: bool,
    pub damage: i32,
}

/// Flat miss roll, then `base ± variance` uniformly, rounded and floored at 1.
pub fn resolve_combat(
    rng: &mut impl RandomSource,
    base_damage: i32,
    config: &CombatConfig,
) -> CombatRoll {
    if rng.chance(config.miss_chance) {
        return CombatRoll { hit: false, damage: 0 };
    }
    let spread = (rng.next_f64() - 0.5) * 2.0 * config.damage_variance;
    let damage = ((f64::from(base_damage) + spread).round() as i32).max(1);
    CombatRoll { hit: true, damage }
}

impl Game {
    pub(super) fn unit_attacks(&mut self, attacker: UnitId, target: EnemyId) -> CombatRoll {
        let Some(unit) = self.units.get(attacker) else {
            return CombatRoll { hit: false, damage: 0 };
        };
        let attacker_name = unit.name.clone();
        let roll = resolve_combat(&mut self.dice, unit.damage, &self.config.combat);
        let Some(enemy) = self.enemies.get_mut(target) else {
            return roll;
        };
        let defender_name = enemy.name.to_string();
        let killed = roll.hit && enemy.take_damage(roll.damage);
        debug!(
            attacker = %attacker_name,
            hit = roll.hit,
            damage = roll.damage,
            killed,
            "unit attack"
        );
        self.log.push(LogEvent::Attack {
            attacker: attacker_name,
            defender: defender_name,
            hit: roll.hit,
            damage: roll.damage,
            killed,
        });
        if killed {
            self.kill_enemy(target);
        }
        roll
    }

    pub(super) fn enemy_attacks(&mut self, attacker: EnemyId, target: UnitId) -> CombatRoll {
        let Some(enemy) = self.enemies.get(attacker) else {
            return CombatRoll { hit: false, damage: 0 };
        };
        let attacker_name = enemy.name.to_string();
        let roll = resolve_combat(&mut self.dice, enemy.damage, &self.config.combat);
        let Some(unit) = self.units.get_mut(target) else {
            return roll;
        };
        let defender_name = unit.name.clone();
        let killed = roll.hit && unit.take_damage(roll.damage);
        debug!(
            attacker = %attacker_name,
            defender = %defender_name,
            hit = roll.hit,
            killed,
            "enemy attack"
        );
        self.log.push(LogEvent::Attack {
            attacker: attacker_name,
            defender: defender_name,
            hit: roll.hit,
            damage: roll.damage,
            killed,
        });
        if killed {
            self.kill_unit(target);
        }
        roll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{add_raider, first_unit, flatten, quiet_game};
    use crate::rng::Dice;

    #[test]
    fn damage_stays_in_band_around_base() {
        let config = CombatConfig { miss_chance: 0.0, ..CombatConfig::default() };
        let mut dice = Dice::from_seed(1000);
        let rolls: Vec<i32> =
            (0..1000).map(|_| resolve_combat(&mut dice, 20, &config).damage).collect();
        assert!(rolls.iter().all(|damage| (1..=30).contains(damage)));
        let mean = f64::from(rolls.iter().sum::<i32>()) / 1000.0;
        assert!((mean - 20.0).abs() < 1.0, "mean {mean}");
    }

    #[test]
    fn weak_hits_still_do_one_damage() {
        let config =
            CombatConfig { miss_chance: 0.0, damage_variance: 50.0, ..CombatConfig::default() };
        let mut dice = Dice::from_seed(4);
        for _ in 0..500 {
            assert!(resolve_combat(&mut dice, 1, &config).damage >= 1);
        }
    }

    #[test]
    fn certain_miss_deals_nothing() {
        let config = CombatConfig { miss_chance: 1.0, ..CombatConfig::default() };
        let mut dice = Dice::from_seed(9);
        assert_eq!(resolve_combat(&mut dice, 20, &config), CombatRoll { hit: false, damage: 0 });
    }

    #[test]
    fn killing_a_raider_frees_its_tile_and_drops_scrap() {
        let mut game = quiet_game(31);
        game.config.combat.miss_chance = 0.0;
        let (id, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 2);
        let raider_pos = pos.offset(1, 1);
        let raider = add_raider(&mut game, raider_pos);
        game.enemies[raider].health = 1;
        let scrap = game.resources().scrap;

        let roll = game.unit_attacks(id, raider);
        assert!(roll.hit);
        assert!(game.enemy(raider).is_none());
        assert!(game.world().occupant(raider_pos).is_empty());
        assert!((scrap + 1..=scrap + 5).contains(&game.resources().scrap));
    }
}
