//! Widening searches shared by the allocation backends.
//!
//! - [`radius_search`] filters a finite candidate list by distance, widening the range
//!   until something matches.
//! - [`rejection_sample`] synthesizes ring positions and keeps those a predicate accepts,
//!   widening the ring the same way.
//!
//! Both stop after [`AllocationConfig::max_search_iterations`] evaluations.
use rand::RngCore;
use tracing::debug;

use crate::allocation::config::AllocationConfig;
use crate::geometry::{Coordinates, MinMax};
use crate::sampling::pick;

/// A pool candidate: index into the owning pool and its position.
pub(crate) type Candidate = (usize, Coordinates);

/// Candidates whose distance to `origin` falls in the first non-empty widening of `range`.
pub(crate) fn radius_search(
    candidates: &[Candidate],
    origin: Coordinates,
    range: MinMax,
    config: &AllocationConfig,
) -> Vec<Candidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut search = range;
    for iteration in 0..config.max_search_iterations {
        let in_range: Vec<Candidate> = candidates
            .iter()
            .copied()
            .filter(|(_, c)| search.contains(origin.distance(*c)))
            .collect();
        if !in_range.is_empty() {
            if iteration > 0 {
                debug!(
                    "Radius search widened {} time(s) to [{:.0}, {:.0}] m.",
                    iteration, search.min, search.max
                );
            }
            return in_range;
        }
        search = config.widen(search);
    }

    Vec::new()
}

/// A random ring position around `origin` accepted by `accept`, or `None` once the
/// iteration bound is reached.
pub(crate) fn rejection_sample(
    origin: Coordinates,
    range: MinMax,
    config: &AllocationConfig,
    rng: &mut dyn RngCore,
    accept: impl Fn(Coordinates) -> bool,
) -> Option<Coordinates> {
    let mut search = range;
    for iteration in 0..config.max_search_iterations {
        let mut survivors = Vec::with_capacity(config.candidates_per_iteration);
        for _ in 0..config.candidates_per_iteration {
            let candidate = Coordinates::random_around(origin, search, rng);
            if accept(candidate) {
                survivors.push(candidate);
            }
        }
        if let Some(chosen) = pick(&survivors, rng) {
            if iteration > 0 {
                debug!(
                    "Rejection sampling widened {} time(s) to [{:.0}, {:.0}] m.",
                    iteration, search.min, search.max
                );
            }
            return Some(*chosen);
        }
        search = config.widen(search);
    }

    None
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn line(points: &[f64]) -> Vec<Candidate> {
        points
            .iter()
            .enumerate()
            .map(|(i, x)| (i, Coordinates::new(*x, 0.0)))
            .collect()
    }

    #[test]
    fn returns_matches_without_widening() {
        let candidates = line(&[0.0, 10_000.0, 50_000.0]);
        let found = radius_search(
            &candidates,
            Coordinates::ZERO,
            MinMax::new(9_000.0, 11_000.0),
            &AllocationConfig::default(),
        );
        assert_eq!(found, vec![(1, Coordinates::new(10_000.0, 0.0))]);
    }

    #[test]
    fn widens_towards_sparse_points() {
        let candidates = line(&[20_000.0]);
        let found = radius_search(
            &candidates,
            Coordinates::ZERO,
            MinMax::new(1_000.0, 2_000.0),
            &AllocationConfig::default(),
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn gives_up_after_iteration_bound() {
        let candidates = line(&[1.0e9]);
        let found = radius_search(
            &candidates,
            Coordinates::ZERO,
            MinMax::new(0.0, 10.0),
            &AllocationConfig::default().with_max_search_iterations(4),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn rejection_sample_respects_predicate() {
        let mut rng = StdRng::seed_from_u64(21);
        let found = rejection_sample(
            Coordinates::ZERO,
            MinMax::new(100.0, 200.0),
            &AllocationConfig::default(),
            &mut rng,
            |c| c.x > 0.0,
        )
        .expect("half the ring is acceptable");
        assert!(found.x > 0.0);
        let d = found.distance(Coordinates::ZERO);
        assert!((100.0..=200.0 + 1e-6).contains(&d));
    }

    #[test]
    fn rejection_sample_is_bounded() {
        let mut rng = StdRng::seed_from_u64(22);
        let calls = Cell::new(0usize);
        let config = AllocationConfig::default();
        let found = rejection_sample(
            Coordinates::ZERO,
            MinMax::new(100.0, 200.0),
            &config,
            &mut rng,
            |_| {
                calls.set(calls.get() + 1);
                false
            },
        );
        assert!(found.is_none());
        assert_eq!(
            calls.get(),
            config.max_search_iterations * config.candidates_per_iteration
        );
    }
}
