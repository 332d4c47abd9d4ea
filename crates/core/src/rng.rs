//! Seeded random streams.
//! This module exists so every consumer of randomness receives an explicit
//! value it owns, constructed per call from a seed. It does not keep any
//! global generator state.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Common draws layered on top of a uniform `[0, 1)` source.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `min..=max`.
    fn int_inclusive(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = f64::from(max - min + 1);
        let value = (self.next_f64() * span).floor() as i32 + min;
        value.min(max)
    }

    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let value = (self.next_f64() * len as f64).floor() as usize;
        value.min(len - 1)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Fisher-Yates from the back.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.int_inclusive(0, i as i32) as usize;
            items.swap(i, j);
        }
    }
}

/// 32-bit linear congruential stream used for per-chunk urban, prop and
/// road placement.
#[derive(Clone, Debug)]
pub struct Lcg32 {
    state: u32,
}

impl Lcg32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn for_chunk(world_seed: u64, cx: i32, cy: i32) -> Self {
        Self::new(spatial_seed(cx, cy, world_seed) ^ 0xA5A5_5A5A)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }
}

impl RandomSource for Lcg32 {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// xorshift32 stream used by the building interior generator.
#[derive(Clone, Debug)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    const ZERO_SEED_REPLACEMENT: u32 = 0x6D2B_79F5;

    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { Self::ZERO_SEED_REPLACEMENT } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomSource for XorShift32 {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX)
    }
}

/// Gameplay dice: combat, loot, AI wander, spawns and deck shuffles.
#[derive(Clone, Debug)]
pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for Dice {
    fn next_f64(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// Folds a 64-bit game seed into the 32-bit domain used by spatial hashes.
pub fn fold_seed(seed: u64) -> u32 {
    (seed as u32) ^ ((seed >> 32) as u32)
}

/// `(x * 73856093) ^ (y * 19349663) ^ seed`, wrapping in 32 bits.
pub fn spatial_seed(x: i32, y: i32, world_seed: u64) -> u32 {
    let hx = x.wrapping_mul(73_856_093);
    let hy = y.wrapping_mul(19_349_663);
    (hx ^ hy) as u32 ^ fold_seed(world_seed)
}

pub(crate) fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift_matches_reference_sequence() {
        let mut rng = XorShift32::new(1);
        assert_eq!(rng.next_u32(), 270_369);
        assert_eq!(rng.next_u32(), 67_634_689);
    }

    #[test]
    fn zero_seed_does_not_lock_the_stream() {
        let mut rng = XorShift32::new(0);
        let first = rng.next_u32();
        assert_ne!(first, 0);
        assert_ne!(rng.next_u32(), first);
    }

    #[test]
    fn int_inclusive_stays_inside_bounds() {
        let mut lcg = Lcg32::new(99);
        let mut xor = XorShift32::new(99);
        let mut dice = Dice::from_seed(99);
        for _ in 0..2_000 {
            assert!((3..=7).contains(&lcg.int_inclusive(3, 7)));
            assert!((3..=7).contains(&xor.int_inclusive(3, 7)));
            assert!((3..=7).contains(&dice.int_inclusive(3, 7)));
        }
    }

    #[test]
    fn int_inclusive_reaches_both_ends() {
        let mut dice = Dice::from_seed(7);
        let rolls: Vec<i32> = (0..500).map(|_| dice.int_inclusive(1, 3)).collect();
        assert!(rolls.contains(&1));
        assert!(rolls.contains(&3));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = XorShift32::new(4242);
        let mut items: Vec<u8> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<u8>>());
    }

    #[test]
    fn chunk_streams_differ_by_coordinate_and_seed() {
        let base = Lcg32::for_chunk(42, 0, 0).next_u32();
        assert_ne!(base, Lcg32::for_chunk(42, 1, 0).next_u32());
        assert_ne!(base, Lcg32::for_chunk(42, 0, 1).next_u32());
        assert_ne!(base, Lcg32::for_chunk(43, 0, 0).next_u32());
        assert_eq!(base, Lcg32::for_chunk(42, 0, 0).next_u32());
    }

    #[test]
    fn spatial_seed_wraps_like_32_bit_arithmetic() {
        let expected = (1000_i32.wrapping_mul(73_856_093) ^ (-5_i32).wrapping_mul(19_349_663))
            as u32
            ^ 7;
        assert_eq!(spatial_seed(1000, -5, 7), expected);
    }
}
