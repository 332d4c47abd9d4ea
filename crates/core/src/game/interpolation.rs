//! Display tracks for smooth movement.
//! This module exists so visual positions ease toward authoritative ones on an
//! external tick. It does not own positions; moving a track never moves a unit.

use super::*;

pub const UNIT_TRACK_SPEED: f64 = 0.15;
pub const ENEMY_TRACK_SPEED: f64 = 0.1;
const SNAP_DISTANCE: f64 = 0.01;

/// `{current, target, speed}` advanced once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayTrack {
    pub current: (f64, f64),
    pub target: (f64, f64),
    pub speed: f64,
}

impl DisplayTrack {
    pub fn new(pos: Pos, speed: f64) -> Self {
        let at = (f64::from(pos.x), f64::from(pos.y));
        Self { current: at, target: at, speed }
    }

    pub fn retarget(&mut self, pos: Pos) {
        self.target = (f64::from(pos.x), f64::from(pos.y));
    }

    /// Jumps straight to `pos`, used when changing scenes.
    pub fn snap_to(&mut self, pos: Pos) {
        self.retarget(pos);
        self.current = self.target;
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Returns true while still moving.
    pub fn advance(&mut self) -> bool {
        let dx = self.target.0 - self.current.0;
        let dy = self.target.1 - self.current.1;
        if dx.abs() < SNAP_DISTANCE && dy.abs() < SNAP_DISTANCE {
            self.current = self.target;
            return false;
        }
        self.current.0 += dx * self.speed;
        self.current.1 += dy * self.speed;
        true
    }
}

impl Game {
    /// Advances every display track one step. Returns true while anything is
    /// still in motion.
    pub fn tick_display(&mut self) -> bool {
        let mut moving = false;
        for unit in self.units.values_mut() {
            moving |= unit.display.advance();
        }
        for enemy in self.enemies.values_mut() {
            moving |= enemy.display.advance();
        }
        moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_converges_and_snaps() {
        let mut track = DisplayTrack::new(Pos::new(0, 0), UNIT_TRACK_SPEED);
        track.retarget(Pos::new(4, -2));
        let mut ticks = 0;
        while track.advance() {
            ticks += 1;
            assert!(ticks < 200, "track never settled");
        }
        assert_eq!(track.current, (4.0, -2.0));
        assert!(track.is_settled());
    }

    #[test]
    fn ticking_never_moves_authoritative_positions() {
        let mut game = Game::new(11);
        let before: Vec<Pos> = game.units().map(|(_, unit)| unit.pos).collect();
        for _ in 0..50 {
            game.tick_display();
        }
        let after: Vec<Pos> = game.units().map(|(_, unit)| unit.pos).collect();
        assert_eq!(before, after);
        assert!(!game.tick_display());
    }
}
