//! Horizontal bands bubbles are biased toward.
//!
//! Positions are percentages of the container width. The middle of the
//! screen is left clear so bubbles frame whatever sits in front of them.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the two horizontal zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Left,
    Right,
}

/// Where a new bubble should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BandHint {
    Left,
    Right,
    /// Coin-flip between left and right.
    #[default]
    Either,
}

impl BandHint {
    /// Resolve the hint to a concrete band, flipping a coin for `Either`.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Band {
        match self {
            BandHint::Left => Band::Left,
            BandHint::Right => Band::Right,
            BandHint::Either => {
                if rng.random_bool(0.5) {
                    Band::Left
                } else {
                    Band::Right
                }
            }
        }
    }
}

impl From<Band> for BandHint {
    fn from(band: Band) -> Self {
        match band {
            Band::Left => BandHint::Left,
            Band::Right => BandHint::Right,
        }
    }
}

/// Inclusive percentage range for a band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRange {
    pub min: f32,
    pub max: f32,
}

impl BandRange {
    pub const LEFT: Self = Self::new(5.0, 30.0);
    pub const RIGHT: Self = Self::new(65.0, 90.0);

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, position: f32) -> bool {
        position >= self.min && position <= self.max
    }

    pub fn as_range(&self) -> RangeInclusive<f32> {
        self.min..=self.max
    }

    /// Swap inverted bounds and clamp into `[0, 100]`.
    pub fn normalized(self) -> Self {
        let (min, max) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        Self::new(min.clamp(0.0, 100.0), max.clamp(0.0, 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_fixed_hints_resolve_directly() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(BandHint::Left.resolve(&mut rng), Band::Left);
        assert_eq!(BandHint::Right.resolve(&mut rng), Band::Right);
    }

    #[test]
    fn test_either_reaches_both_bands() {
        let mut rng = StdRng::seed_from_u64(3);
        let bands: Vec<Band> = (0..64).map(|_| BandHint::Either.resolve(&mut rng)).collect();
        assert!(bands.contains(&Band::Left));
        assert!(bands.contains(&Band::Right));
    }

    #[test]
    fn test_normalized_swaps_and_clamps() {
        let range = BandRange::new(120.0, -4.0).normalized();
        assert_eq!(range, BandRange::new(0.0, 100.0));
        assert_eq!(BandRange::LEFT.normalized(), BandRange::LEFT);
    }
}
