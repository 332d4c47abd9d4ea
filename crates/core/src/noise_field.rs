//! Deterministic 2D value noise and fractal Brownian motion.
//! This module exists so terrain is a pure function of (seed, x, y) and can be
//! regenerated instead of persisted. It does not own terrain classification.

use noise::{NoiseFn, Value};

use crate::rng::fold_seed;

#[derive(Clone, Debug)]
pub struct NoiseField {
    seed: u64,
    value: Value,
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        Self { seed, value: Value::new(fold_seed(seed)) }
    }

    /// Reseeds the lattice; every later sample depends only on `seed`.
    pub fn init(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Value noise in `[-1, 1]`.
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        self.value.get([x, y]).clamp(-1.0, 1.0)
    }

    /// Sum of `octaves` samples at doubling frequency and halving amplitude,
    /// normalized back into `[-1, 1]`.
    pub fn fbm(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;
        for _ in 0..octaves.max(1) {
            total += self.noise2d(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        total / max_amplitude
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn same_seed_same_samples() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        for i in 0..50 {
            let x = f64::from(i) * 0.37;
            let y = f64::from(i) * -1.13;
            assert_eq!(a.noise2d(x, y), b.noise2d(x, y));
            assert_eq!(a.fbm(x, y, 4), b.fbm(x, y, 4));
        }
    }

    #[test]
    fn different_seeds_disagree_somewhere() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..100).any(|i| {
            let x = f64::from(i) * 0.31 + 0.5;
            a.noise2d(x, x * 0.7) != b.noise2d(x, x * 0.7)
        });
        assert!(differs, "two seeds should not produce identical lattices");
    }

    #[test]
    fn init_resets_to_fresh_state() {
        let mut field = NoiseField::new(5);
        field.init(9);
        let fresh = NoiseField::new(9);
        assert_eq!(field.seed(), 9);
        assert_eq!(field.noise2d(3.3, 4.4), fresh.noise2d(3.3, 4.4));
    }

    proptest! {
        #[test]
        fn samples_stay_in_unit_range(
            seed in any::<u64>(),
            x in -5_000.0_f64..5_000.0,
            y in -5_000.0_f64..5_000.0,
            octaves in 1_u32..6,
        ) {
            let field = NoiseField::new(seed);
            let n = field.noise2d(x, y);
            let f = field.fbm(x, y, octaves);
            prop_assert!((-1.0..=1.0).contains(&n));
            prop_assert!((-1.0..=1.0).contains(&f));
        }
    }
}
