//! Raiders and their four-state AI.
//! This module exists so enemy decisions are re-evaluated from scratch every
//! end phase: flee when badly hurt, otherwise attack, chase or patrol by the
//! distance to the nearest outdoor survivor. Enemies never go indoors.

use tracing::{debug, info};

use super::*;
use crate::config::EnemyConfig;
use crate::game::interpolation::{DisplayTrack, ENEMY_TRACK_SPEED};
use crate::pathfinding::{Avoiding, find_path, neighbors8};
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiState {
    Patrol,
    Chase,
    Attack,
    Flee,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub serial: u32,
    pub name: &'static str,
    pub pos: Pos,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub move_range: usize,
    pub attack_range: f64,
    pub sight_range: f64,
    pub flee_fraction: f64,
    pub state: AiState,
    pub display: DisplayTrack,
}

impl Enemy {
    pub const RAIDER: &'static str = "Raider";

    pub fn raider(serial: u32, pos: Pos, config: &EnemyConfig) -> Self {
        Self {
            serial,
            name: Self::RAIDER,
            pos,
            health: config.health,
            max_health: config.health,
            damage: config.damage,
            move_range: config.move_range,
            attack_range: config.attack_range,
            sight_range: config.sight_range,
            flee_fraction: config.flee_fraction,
            state: AiState::Patrol,
            display: DisplayTrack::new(pos, ENEMY_TRACK_SPEED),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Returns true when this blow killed the enemy.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount.max(0)).clamp(0, self.max_health);
        was_alive && !self.is_alive()
    }

    /// Low health overrides everything; then range bands decide.
    pub fn choose_state(&self, nearest: Option<f64>) -> AiState {
        if f64::from(self.health) < self.flee_fraction * f64::from(self.max_health) {
            return AiState::Flee;
        }
        match nearest {
            Some(distance) if distance <= self.attack_range => AiState::Attack,
            Some(distance) if distance <= self.sight_range => AiState::Chase,
            _ => AiState::Patrol,
        }
    }
}

impl Game {
    pub(super) fn add_enemy(&mut self, pos: Pos) -> EnemyId {
        let enemy = Enemy::raider(self.next_enemy_serial, pos, &self.config.enemy);
        self.next_enemy_serial += 1;
        let id = self.enemies.insert(enemy);
        self.world.set_occupant(pos, Occupant::Enemy(id));
        id
    }

    /// One raider on a streamed, open tile far enough from every survivor.
    pub(super) fn spawn_enemy(&mut self) -> Option<EnemyId> {
        let origins: Vec<Pos> = self
            .world
            .chunks()
            .filter(|chunk| chunk.is_rendered())
            .map(|chunk| chunk.origin())
            .collect();
        if origins.is_empty() {
            return None;
        }
        let size = self.world.chunk_size();
        let min_distance = self.config.enemy.min_spawn_distance;
        for _ in 0..self.config.enemy.spawn_attempts {
            let origin = origins[self.dice.index(origins.len())];
            let pos = origin
                .offset(self.dice.int_inclusive(0, size - 1), self.dice.int_inclusive(0, size - 1));
            if !self.world.is_open(pos) {
                continue;
            }
            if self.units.values().any(|unit| unit.outdoor_pos().euclidean(pos) < min_distance) {
                continue;
            }
            let id = self.add_enemy(pos);
            info!(x = pos.x, y = pos.y, turn = self.turn, "raider spawned");
            self.log.push(LogEvent::EnemySpawned { enemy: id, pos });
            return Some(id);
        }
        debug!(attempts = self.config.enemy.spawn_attempts, "no spawn site found");
        None
    }

    pub(super) fn kill_enemy(&mut self, id: EnemyId) {
        let Some(enemy) = self.enemies.remove(id) else {
            return;
        };
        self.world.set_occupant(enemy.pos, Occupant::Empty);
        let scrap = self.dice.int_inclusive(1, 5);
        self.gain_resource(Resource::Scrap, scrap);
        info!(x = enemy.pos.x, y = enemy.pos.y, scrap, "raider killed");
        self.log.push(LogEvent::EnemyDied { enemy: id, scrap_dropped: scrap });
    }

    /// Runs every enemy over a snapshot of ids; enemies removed mid-pass are
    /// skipped.
    pub(super) fn update_enemies(&mut self) {
        let ids: Vec<EnemyId> = self.enemies.keys().collect();
        for id in ids {
            if self.outcome.is_some() {
                break;
            }
            self.update_enemy(id);
        }
    }

    fn nearest_outdoor_unit(&self, from: Pos) -> Option<(UnitId, Pos, f64)> {
        let mut nearest: Option<(UnitId, Pos, f64)> = None;
        for (id, unit) in self.units.iter().filter(|(_, unit)| !unit.is_indoors()) {
            let distance = unit.pos.euclidean(from);
            if nearest.is_none_or(|(_, _, best)| distance < best) {
                nearest = Some((id, unit.pos, distance));
            }
        }
        nearest
    }

    fn update_enemy(&mut self, id: EnemyId) {
        let Some(enemy) = self.enemies.get(id) else {
            return;
        };
        let from = enemy.pos;
        let nearest = self.nearest_outdoor_unit(from);
        let state = enemy.choose_state(nearest.map(|(_, _, distance)| distance));
        if let Some(enemy) = self.enemies.get_mut(id) {
            enemy.state = state;
        }

        match (state, nearest) {
            (AiState::Attack, Some((target, _, _))) => {
                self.enemy_attacks(id, target);
            }
            (AiState::Chase, Some((_, goal, _))) => self.chase(id, from, goal),
            (AiState::Flee, Some((_, threat, _))) => {
                let away = from.offset((from.x - threat.x).signum(), (from.y - threat.y).signum());
                if away != from && self.world.is_open(away) {
                    self.move_enemy(id, away);
                }
            }
            (AiState::Flee, None) => {}
            _ => {
                let step = neighbors8(from)[self.dice.index(8)];
                if self.world.is_open(step) {
                    self.move_enemy(id, step);
                }
            }
        }
    }

    /// Follows the A* path toward `goal`, stopping short of occupied tiles.
    /// The path never runs through another actor, survivor or raider.
    fn chase(&mut self, id: EnemyId, from: Pos, goal: Pos) {
        let Some(move_range) = self.enemies.get(id).map(|enemy| enemy.move_range) else {
            return;
        };
        let world = &self.world;
        let grid = Avoiding {
            grid: world,
            blocked: |pos: Pos| pos != from && pos != goal && !world.occupant(pos).is_empty(),
        };
        let Some(path) = find_path(&grid, from, goal) else {
            return;
        };
        let mut idx = move_range.min(path.len() - 1);
        while idx > 0 && !self.world.is_open(path[idx]) {
            idx -= 1;
        }
        if idx > 0 {
            self.move_enemy(id, path[idx]);
        }
    }

    fn move_enemy(&mut self, id: EnemyId, to: Pos) {
        let Some(enemy) = self.enemies.get_mut(id) else {
            return;
        };
        let from = enemy.pos;
        enemy.pos = to;
        enemy.display.retarget(to);
        self.world.set_occupant(from, Occupant::Empty);
        self.world.set_occupant(to, Occupant::Enemy(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Terrain;
    use crate::game::test_support::{add_raider, first_unit, flatten, lone_game, paint, quiet_game};

    fn raider() -> Enemy {
        Enemy::raider(1, Pos::new(0, 0), &EnemyConfig::default())
    }

    #[test]
    fn state_bands_follow_distance() {
        let enemy = raider();
        assert_eq!(enemy.choose_state(Some(1.0)), AiState::Attack);
        assert_eq!(enemy.choose_state(Some(2.0_f64.sqrt())), AiState::Chase);
        assert_eq!(enemy.choose_state(Some(6.0)), AiState::Chase);
        assert_eq!(enemy.choose_state(Some(6.1)), AiState::Patrol);
        assert_eq!(enemy.choose_state(None), AiState::Patrol);
    }

    #[test]
    fn low_health_flees_even_in_reach() {
        let mut enemy = raider();
        enemy.health = 11;
        assert_eq!(enemy.choose_state(Some(1.0)), AiState::Flee);
        enemy.health = 12;
        assert_eq!(enemy.choose_state(Some(1.0)), AiState::Attack);
    }

    #[test]
    fn chase_stops_beside_the_target() {
        let mut game = lone_game(41);
        let (_, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 6);
        let raider = add_raider(&mut game, pos.offset(3, 0));
        game.update_enemies();
        let enemy = game.enemy(raider).expect("raider");
        assert_eq!(enemy.state, AiState::Chase);
        assert_eq!(enemy.pos, pos.offset(1, 0));
        assert_eq!(game.world().occupant(pos.offset(3, 0)), Occupant::Empty);
        assert_eq!(game.world().occupant(enemy.pos), Occupant::Enemy(raider));
    }

    #[test]
    fn chase_never_slips_past_a_survivor_in_a_corridor() {
        let mut game = lone_game(45);
        let (_, home) = first_unit(&game).expect("unit");
        let origin = home.offset(20, 0);
        flatten(&mut game, origin, 6);
        // A closed U: the only way from the raider to the far survivor runs
        // through the near survivor's tile.
        for (dx, dy) in (-1..=5).flat_map(|dx| [(dx, -1), (dx, 3)]) {
            paint(&mut game, origin.offset(dx, dy), Terrain::Water);
        }
        for dy in 0..=2 {
            paint(&mut game, origin.offset(-1, dy), Terrain::Water);
            paint(&mut game, origin.offset(5, dy), Terrain::Water);
        }
        for dx in -1..=3 {
            paint(&mut game, origin.offset(dx, 1), Terrain::Water);
        }
        let far = game.add_unit("Avery", origin.offset(0, 2));
        let near = game.add_unit("Blake", origin.offset(3, 0));
        let raider = add_raider(&mut game, origin);
        game.enemies[raider].move_range = 5;

        game.update_enemies();
        let enemy = game.enemy(raider).expect("raider");
        assert_eq!(enemy.state, AiState::Chase);
        assert_eq!(enemy.pos, origin, "the near survivor plugs the corridor");
        assert_eq!(game.unit(far).map(|unit| unit.health), Some(100));
        assert_eq!(game.world().occupant(origin.offset(3, 0)), Occupant::Unit(near));
    }

    #[test]
    fn adjacent_raider_attacks() {
        let mut game = lone_game(42);
        game.config.combat.miss_chance = 0.0;
        let (id, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 3);
        add_raider(&mut game, pos.offset(0, -1));
        game.update_enemies();
        let unit = game.unit(id).expect("survivor");
        assert!(unit.health < unit.max_health);
        let attacked = game.log().iter().any(|event| {
            matches!(event, LogEvent::Attack { defender, hit: true, .. } if *defender == unit.name)
        });
        assert!(attacked);
    }

    #[test]
    fn wounded_raider_steps_away() {
        let mut game = lone_game(43);
        let (_, pos) = first_unit(&game).expect("unit");
        flatten(&mut game, pos, 4);
        let raider = add_raider(&mut game, pos.offset(-2, -2));
        game.enemies[raider].health = 5;
        game.update_enemies();
        assert_eq!(game.enemy(raider).map(|enemy| enemy.pos), Some(pos.offset(-3, -3)));
    }

    #[test]
    fn spawns_keep_their_distance() {
        let mut game = quiet_game(44);
        for _ in 0..10 {
            let Some(id) = game.spawn_enemy() else {
                continue;
            };
            let at = game.enemy(id).map(|enemy| enemy.pos).expect("spawned");
            for (_, unit) in game.units() {
                assert!(unit.outdoor_pos().euclidean(at) >= 8.0);
            }
            assert_eq!(game.world().occupant(at), Occupant::Enemy(id));
            assert!(game.world().tile(at).is_some_and(|tile| tile.is_passable()));
        }
    }
}
