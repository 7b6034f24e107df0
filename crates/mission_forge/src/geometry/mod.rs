//! Planar geometry primitives: coordinates, inclusive ranges and polygon regions.
//!
//! All distances are in meters unless a name says otherwise. Ranges authored in
//! nautical miles are converted with [`MinMax::scaled`] and [`NM_TO_METERS`].
use std::ops::{Add, Mul, Sub};

use glam::DVec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::{rand01, random_heading};

pub mod polygon;
pub mod range;

pub use polygon::Polygon;
pub use range::{CountRange, MinMax};

/// Meters per nautical mile.
pub const NM_TO_METERS: f64 = 1852.0;

/// Range (in nautical miles) that accepts any practical distance.
pub const ANY_RANGE: MinMax = MinMax {
    min: 0.0,
    max: 99_999.0,
};

/// Tolerance (in nautical miles) around a template-provided coordinate hint.
pub const HINT_RANGE: MinMax = MinMax {
    min: 0.0,
    max: 10.0,
};

/// Immutable 2D map position in meters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub const ZERO: Coordinates = Coordinates { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, in meters.
    #[inline]
    pub fn distance(&self, other: Coordinates) -> f64 {
        DVec2::from(*self).distance(DVec2::from(other))
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Offset vector with a random heading and a magnitude drawn from `range`.
    pub fn random_offset(range: MinMax, rng: &mut dyn RngCore) -> Self {
        let (c, s) = random_heading(rng);
        let magnitude = range.random(rng);
        Self::new(c * magnitude, s * magnitude)
    }

    /// Point on the ring `range` around `origin`.
    pub fn random_around(origin: Coordinates, range: MinMax, rng: &mut dyn RngCore) -> Self {
        origin + Self::random_offset(range, rng)
    }

    /// Point uniformly distributed in the box spanned by `a` and `b`.
    pub fn random_between(a: Coordinates, b: Coordinates, rng: &mut dyn RngCore) -> Self {
        Self::new(
            a.x + (b.x - a.x) * rand01(rng),
            a.y + (b.y - a.y) * rand01(rng),
        )
    }

    /// This point moved by a random offset in `range`.
    pub fn random_near(&self, range: MinMax, rng: &mut dyn RngCore) -> Self {
        Self::random_around(*self, range, rng)
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Add for Coordinates {
    type Output = Coordinates;

    fn add(self, rhs: Coordinates) -> Coordinates {
        Coordinates::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinates {
    type Output = Coordinates;

    fn sub(self, rhs: Coordinates) -> Coordinates {
        Coordinates::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Coordinates {
    type Output = Coordinates;

    fn mul(self, rhs: f64) -> Coordinates {
        Coordinates::new(self.x * rhs, self.y * rhs)
    }
}

impl From<Coordinates> for DVec2 {
    fn from(value: Coordinates) -> Self {
        DVec2::new(value.x, value.y)
    }
}

impl From<DVec2> for Coordinates {
    fn from(value: DVec2) -> Self {
        Coordinates::new(value.x, value.y)
    }
}

impl From<mint::Point2<f64>> for Coordinates {
    fn from(value: mint::Point2<f64>) -> Self {
        Coordinates::new(value.x, value.y)
    }
}

impl From<Coordinates> for mint::Point2<f64> {
    fn from(value: Coordinates) -> Self {
        mint::Point2 {
            x: value.x,
            y: value.y,
        }
    }
}
