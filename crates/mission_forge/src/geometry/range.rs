//! Inclusive numeric ranges.
use std::ops::Mul;

use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::{rand01, rand_between};

/// Inclusive `[min, max]` interval of distances or other real values.
///
/// Deserialized ranges are normalized like [`MinMax::new`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawBounds<f64>"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// Creates a range, swapping the bounds if given in reverse order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Finite bounds with `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Both bounds multiplied by a unit conversion factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }

    /// Widened search range: the lower bound shrinks by `min_decay`, the upper
    /// bound grows by `max_growth` and never drops below `floor`.
    pub fn decayed(&self, min_decay: f64, max_growth: f64, floor: f64) -> Self {
        Self {
            min: self.min * min_decay,
            max: (self.max * max_growth).max(floor),
        }
    }

    pub fn random(&self, rng: &mut dyn RngCore) -> f64 {
        rand_between(self.min, self.max, rng)
    }
}

impl Mul<f64> for MinMax {
    type Output = MinMax;

    fn mul(self, rhs: f64) -> MinMax {
        self.scaled(rhs)
    }
}

/// Inclusive range of unit counts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawBounds<u32>"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub const fn exactly(n: u32) -> Self {
        Self { min: n, max: n }
    }

    pub fn random(&self, rng: &mut dyn RngCore) -> u32 {
        let (min, max) = (self.min.min(self.max), self.min.max(self.max));
        let span = (max - min) as f64 + 1.0;
        let step = (rand01(rng) * span) as u32;
        (min + step).min(max)
    }
}

/// Wire form of a range before its bounds are ordered.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawBounds<T> {
    min: T,
    max: T,
}

#[cfg(feature = "serde")]
impl From<RawBounds<f64>> for MinMax {
    fn from(raw: RawBounds<f64>) -> Self {
        MinMax::new(raw.min, raw.max)
    }
}

#[cfg(feature = "serde")]
impl From<RawBounds<u32>> for CountRange {
    fn from(raw: RawBounds<u32>) -> Self {
        CountRange::new(raw.min, raw.max)
    }
}
