//! Noise sampling and the terrain priority cascade.

use crate::content::Terrain;
use crate::noise_field::NoiseField;

/// Raw per-tile climate before any urban, prop or road override.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    pub elevation: f64,
    pub moisture: f64,
    pub radiation: f64,
}

pub fn sample_climate(noise: &NoiseField, x: i32, y: i32) -> Climate {
    let (x, y) = (f64::from(x), f64::from(y));
    let elevation = (noise.fbm(x * 0.1, y * 0.1, 4) + 1.0) / 2.0;
    let moisture = (noise.fbm(x * 0.08 + 100.0, y * 0.08 + 100.0, 3) + 1.0) / 2.0;
    let band = noise.noise2d(x * 0.15, y * 0.15);
    let radiation = if band > 0.65 { (band - 0.65) / 0.35 } else { 0.0 };
    Climate { elevation, moisture, radiation }
}

/// First matching rule wins; the rules overlap on purpose.
pub fn classify(elevation: f64, moisture: f64, radiation: f64) -> Terrain {
    if radiation > 0.2 {
        Terrain::Toxic
    } else if elevation < 0.15 && moisture > 0.6 {
        Terrain::Water
    } else if elevation < 0.25 && moisture > 0.45 {
        Terrain::Mud
    } else if moisture < 0.25 && elevation < 0.35 {
        Terrain::Sand
    } else if moisture > 0.35 && moisture < 0.6 {
        Terrain::Grass
    } else {
        Terrain::Dirt
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn radiation_beats_every_other_rule() {
        assert_eq!(classify(0.05, 0.9, 0.25), Terrain::Toxic);
        assert_eq!(classify(0.05, 0.9, 0.2), Terrain::Water);
    }

    #[test]
    fn cascade_picks_first_match() {
        // Satisfies both the mud and the grass rule.
        assert_eq!(classify(0.2, 0.5, 0.0), Terrain::Mud);
        assert_eq!(classify(0.3, 0.1, 0.0), Terrain::Sand);
        assert_eq!(classify(0.5, 0.5, 0.0), Terrain::Grass);
        assert_eq!(classify(0.5, 0.8, 0.0), Terrain::Dirt);
        assert_eq!(classify(0.8, 0.1, 0.0), Terrain::Dirt);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn climate_stays_normalized(
            seed in any::<u64>(),
            x in -10_000_i32..10_000,
            y in -10_000_i32..10_000,
        ) {
            let climate = sample_climate(&NoiseField::new(seed), x, y);
            prop_assert!((0.0..=1.0).contains(&climate.elevation));
            prop_assert!((0.0..=1.0).contains(&climate.moisture));
            prop_assert!((0.0..=1.0).contains(&climate.radiation));
        }
    }
}
