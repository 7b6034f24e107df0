//! Random draw helpers shared by the allocation engine and the objective pipeline.
//!
//! Everything here takes `&mut dyn RngCore` so callers can pass any seeded generator.
use std::f64::consts::TAU;

use rand::RngCore;

/// Generate a random float in the range [0, 1).
#[inline]
pub fn rand01(rng: &mut dyn RngCore) -> f64 {
    // 53 high bits fill the f64 mantissa exactly.
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}

/// Uniform float in `[min, max]`.
#[inline]
pub fn rand_between(min: f64, max: f64, rng: &mut dyn RngCore) -> f64 {
    min + rand01(rng) * (max - min)
}

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub fn random_index(len: usize, rng: &mut dyn RngCore) -> usize {
    debug_assert!(len > 0, "random_index on empty range");
    ((rand01(rng) * len as f64) as usize).min(len.saturating_sub(1))
}

/// Pick one element uniformly at random, or `None` for an empty slice.
pub fn pick<'a, T>(items: &'a [T], rng: &mut dyn RngCore) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(random_index(items.len(), rng))
}

/// Random unit-length heading as `(cos, sin)`.
#[inline]
pub(crate) fn random_heading(rng: &mut dyn RngCore) -> (f64, f64) {
    let angle = rand01(rng) * TAU;
    (angle.cos(), angle.sin())
}

#[cfg(test)]
pub(crate) mod test_rng {
    use rand::RngCore;

    /// Generator returning the same word forever.
    pub struct FixedRng {
        pub value: u64,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.value >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.value
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::test_rng::FixedRng;
    use super::*;

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_stays_below_one_for_max_input() {
        let mut rng = FixedRng { value: u64::MAX };
        let result = rand01(&mut rng);
        assert!(result < 1.0);
        assert!(result > 0.999);
    }

    #[test]
    fn random_index_covers_last_slot() {
        let mut rng = FixedRng { value: u64::MAX };
        assert_eq!(random_index(4, &mut rng), 3);
        let mut rng = FixedRng { value: 0 };
        assert_eq!(random_index(4, &mut rng), 0);
    }

    #[test]
    fn pick_handles_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(3);
        let empty: [u8; 0] = [];
        assert!(pick(&empty, &mut rng).is_none());
        assert_eq!(pick(&[7], &mut rng), Some(&7));
    }

    #[test]
    fn rand_between_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..256 {
            let v = rand_between(5.0, 10.0, &mut rng);
            assert!((5.0..=10.0).contains(&v));
        }
    }

    #[test]
    fn heading_is_unit_length() {
        let mut rng = StdRng::seed_from_u64(99);
        let (c, s) = random_heading(&mut rng);
        assert!(((c * c + s * s) - 1.0).abs() < 1e-9);
    }
}
