//! Parking spot selection for one airbase.
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Coordinates;
use crate::sampling::random_index;
use crate::theater::{ParkingSpot, ParkingSpotId};

/// A reserved parking spot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParkingAllocation {
    pub spot_id: ParkingSpotId,
    pub coordinates: Coordinates,
}

/// Index of the spot to take next when clustering around `last`.
///
/// One pass over the candidates seeded with the first entry: a later spot replaces the
/// running choice when it is strictly closer to `last` and not at `last` itself. This is
/// an approximate nearest neighbour, kept as such on purpose.
pub(crate) fn cluster_pick(candidates: &[ParkingSpot], last: Coordinates) -> Option<usize> {
    let first = candidates.first()?;
    let mut best = 0usize;
    let mut best_distance = first.coordinates.distance(last);
    for (i, spot) in candidates.iter().enumerate().skip(1) {
        let d = spot.coordinates.distance(last);
        if best_distance > d && d != 0.0 {
            best = i;
            best_distance = d;
        }
    }
    Some(best)
}

/// Chooses `count` spots from `candidates`: the first uniformly at random, each
/// following one clustered around the previous. Returns `None` if too few candidates.
pub(crate) fn select_spots(
    mut candidates: Vec<ParkingSpot>,
    count: usize,
    rng: &mut dyn RngCore,
) -> Option<Vec<ParkingAllocation>> {
    if candidates.len() < count {
        return None;
    }

    let mut chosen: Vec<ParkingAllocation> = Vec::with_capacity(count);
    for _ in 0..count {
        let index = match chosen.last() {
            Some(previous) => cluster_pick(&candidates, previous.coordinates)?,
            None => random_index(candidates.len(), rng),
        };
        let spot = candidates.remove(index);
        chosen.push(ParkingAllocation {
            spot_id: spot.id,
            coordinates: spot.coordinates,
        });
    }
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::theater::ParkingSpotKind;

    fn spot(id: u32, x: f64) -> ParkingSpot {
        ParkingSpot {
            id,
            airbase_id: 1,
            coordinates: Coordinates::new(x, 0.0),
            kind: ParkingSpotKind::OpenAir,
        }
    }

    #[test]
    fn cluster_pick_prefers_closer_spot() {
        let spots = vec![spot(1, 100.0), spot(2, 30.0), spot(3, 10.0)];
        assert_eq!(cluster_pick(&spots, Coordinates::ZERO), Some(2));
    }

    #[test]
    fn cluster_pick_skips_zero_distance() {
        let spots = vec![spot(1, 100.0), spot(2, 0.0), spot(3, 50.0)];
        assert_eq!(cluster_pick(&spots, Coordinates::ZERO), Some(2));
    }

    #[test]
    fn cluster_pick_keeps_seed_when_nothing_beats_it() {
        let spots = vec![spot(1, 5.0), spot(2, 50.0), spot(3, 500.0)];
        assert_eq!(cluster_pick(&spots, Coordinates::ZERO), Some(0));
        assert_eq!(cluster_pick(&[], Coordinates::ZERO), None);
    }

    #[test]
    fn select_spots_is_all_or_nothing() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(select_spots(vec![spot(1, 0.0)], 2, &mut rng).is_none());
        let picked = select_spots(vec![spot(1, 0.0), spot(2, 10.0)], 2, &mut rng).unwrap();
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0].spot_id, picked[1].spot_id);
    }

    #[test]
    fn select_spots_clusters_after_first() {
        let mut rng = StdRng::seed_from_u64(9);
        let spots: Vec<_> = (0..10).map(|i| spot(i, i as f64 * 20.0)).collect();
        let picked = select_spots(spots, 3, &mut rng).unwrap();
        for pair in picked.windows(2) {
            let gap = pair[0].coordinates.distance(pair[1].coordinates);
            assert!(gap <= 200.0);
        }
    }
}
