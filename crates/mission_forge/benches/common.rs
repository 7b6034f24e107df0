use std::time::Duration;

use criterion::{Criterion, Throughput};
use mission_forge::prelude::{
    Airbase, Coalition, Coordinates, LegacySpawnPoint, ParkingSpot, ParkingSpotKind,
    SpawnPointType, Theater,
};

pub const ALLOCATION_SAMPLES: usize = 40;
pub const ALLOCATION_WARM_UP: Duration = Duration::from_millis(500);
pub const ALLOCATION_WINDOW: Duration = Duration::from_secs(3);
pub const NOISE_THRESHOLD: f64 = 0.03;

pub fn allocation_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(ALLOCATION_SAMPLES)
        .warm_up_time(ALLOCATION_WARM_UP)
        .measurement_time(ALLOCATION_WINDOW)
        .noise_threshold(NOISE_THRESHOLD)
}

/// Throughput counted in spawn requests served per iteration.
pub fn spawn_requests(requests: usize) -> Throughput {
    Throughput::Elements(requests as u64)
}

/// Throughput counted in parking spots reserved per iteration.
pub fn reserved_spots(spots: usize) -> Throughput {
    Throughput::Elements(spots as u64)
}

/// Square grid of red land points, `side` x `side`, spaced `spacing` meters apart.
pub fn grid_theater(side: usize, spacing: f64) -> Theater {
    let mut theater = Theater::new("bench-grid");
    theater.legacy_spawn_points = (0..side * side)
        .map(|i| LegacySpawnPoint {
            coordinates: Coordinates::new(
                (i % side) as f64 * spacing,
                (i / side) as f64 * spacing,
            ),
            point_type: SpawnPointType::LandMedium,
            coalition: Some(Coalition::Red),
        })
        .collect();
    theater
}

/// One airbase with `spots` open-air parking spots in a row.
pub fn airbase_theater(spots: usize) -> Theater {
    let mut theater = Theater::new("bench-airbase");
    theater.airbases = vec![Airbase {
        id: 1,
        name: "Bench".into(),
        coordinates: Coordinates::ZERO,
        coalition: Coalition::Red,
        parking_spots: (0..spots)
            .map(|i| ParkingSpot {
                id: i as u32,
                airbase_id: 1,
                coordinates: Coordinates::new(i as f64 * 25.0, 0.0),
                kind: ParkingSpotKind::OpenAir,
            })
            .collect(),
    }];
    theater
}
