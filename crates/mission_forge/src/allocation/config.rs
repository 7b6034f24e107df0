//! Tunables for the spawn point allocation engine.
use crate::error::{Error, Result};
use crate::geometry::MinMax;

/// Configuration for a [`crate::allocation::SpawnAllocator`].
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct AllocationConfig {
    /// Maximum number of range evaluations before a search gives up.
    pub max_search_iterations: usize,
    /// Random candidates drawn per iteration by the air/sea sampler.
    pub candidates_per_iteration: usize,
    /// Factor applied to the lower search bound on each widening.
    pub min_decay: f64,
    /// Factor applied to the upper search bound on each widening.
    pub max_growth: f64,
    /// Smallest upper search bound after a widening, in meters.
    pub max_floor: f64,
    /// Use the polygon backend when the theater provides it.
    pub use_shape_spawning: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_search_iterations: 32,
            candidates_per_iteration: 50,
            min_decay: 0.9,
            max_growth: 1.1,
            max_floor: 100.0,
            use_shape_spawning: true,
        }
    }
}

impl AllocationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration bound of the widening searches.
    pub fn with_max_search_iterations(mut self, iterations: usize) -> Self {
        self.max_search_iterations = iterations;
        self
    }

    /// Sets how many candidates the air/sea sampler draws per iteration.
    pub fn with_candidates_per_iteration(mut self, candidates: usize) -> Self {
        self.candidates_per_iteration = candidates;
        self
    }

    /// Sets the widening factors and the upper-bound floor.
    pub fn with_decay(mut self, min_decay: f64, max_growth: f64, max_floor: f64) -> Self {
        self.min_decay = min_decay;
        self.max_growth = max_growth;
        self.max_floor = max_floor;
        self
    }

    /// Allows or forbids the polygon backend.
    pub fn with_shape_spawning(mut self, enabled: bool) -> Self {
        self.use_shape_spawning = enabled;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.max_search_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max_search_iterations must be > 0".into(),
            ));
        }
        if self.candidates_per_iteration == 0 {
            return Err(Error::InvalidConfig(
                "candidates_per_iteration must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_decay) {
            return Err(Error::InvalidConfig("min_decay must be in [0, 1]".into()));
        }
        if self.max_growth < 1.0 {
            return Err(Error::InvalidConfig("max_growth must be >= 1".into()));
        }
        Ok(())
    }

    /// The next, wider search range.
    #[inline]
    pub fn widen(&self, range: MinMax) -> MinMax {
        range.decayed(self.min_decay, self.max_growth, self.max_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_search_constants() {
        let config = AllocationConfig::default();
        assert_eq!(config.max_search_iterations, 32);
        assert_eq!(config.candidates_per_iteration, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        assert!(AllocationConfig::new()
            .with_max_search_iterations(0)
            .validate()
            .is_err());
        assert!(AllocationConfig::new()
            .with_candidates_per_iteration(0)
            .validate()
            .is_err());
        assert!(AllocationConfig::new()
            .with_decay(1.5, 1.1, 100.0)
            .validate()
            .is_err());
        assert!(AllocationConfig::new()
            .with_decay(0.9, 0.5, 100.0)
            .validate()
            .is_err());
    }

    #[test]
    fn widen_applies_decay() {
        let config = AllocationConfig::default();
        let r = config.widen(MinMax::new(1000.0, 2000.0));
        assert!((r.min - 900.0).abs() < 1e-9);
        assert!((r.max - 2200.0).abs() < 1e-9);
        assert_eq!(config.widen(MinMax::new(0.0, 10.0)).max, 100.0);
    }
}
