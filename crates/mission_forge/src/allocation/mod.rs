//! Spawn point allocation engine.
//!
//! A [`SpawnAllocator`] owns the mutable candidate pools of one theater for one mission
//! build. Discrete spawn points and parking spots are removed when allocated, so no two
//! objectives can claim the same site. Air and sea positions under the polygon backend
//! are synthesized and consume nothing.
//!
//! Every allocation returns `None` on exhaustion; callers decide whether that is fatal.
//! The allocator is not meant to be shared: each in-flight build owns its own instance
//! over a shared, read-only [`Theater`].
use std::collections::HashMap;
use std::fmt;

use rand::RngCore;
use tracing::{debug, warn};

use crate::geometry::{Coordinates, MinMax, NM_TO_METERS};
use crate::sampling::pick;
use crate::theater::{
    AircraftSpec, AirbaseId, Coalition, LegacySpawnPoint, ParkingSpot, ShapeSpawnPoint,
    SpawnPointType, SpawnTypeSet, Theater,
};

pub mod config;
pub mod parking;
pub(crate) mod search;

pub use config::AllocationConfig;
pub use parking::ParkingAllocation;

use search::{radius_search, rejection_sample, Candidate};

/// Starting ring, in meters, for nearest-point queries on continuous air/sea space.
const NEAREST_AIR_SEA_RING: MinMax = MinMax {
    min: 0.0,
    max: NM_TO_METERS,
};

/// Which pool representation answers spawn point queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnBackend {
    /// Discrete coalition-tagged point list.
    Legacy,
    /// Polygon-validated points for land, sampled positions for air and sea.
    Shape,
}

/// Constraints for one spawn point allocation. Ranges are in meters.
#[derive(Clone, Debug)]
pub struct SpawnRequest {
    pub valid_types: SpawnTypeSet,
    pub origin: Coordinates,
    pub range: MinMax,
    pub secondary: Option<(Coordinates, MinMax)>,
    pub coalition: Option<Coalition>,
}

impl SpawnRequest {
    pub fn new(valid_types: SpawnTypeSet, origin: Coordinates, range: MinMax) -> Self {
        Self {
            valid_types,
            origin,
            range,
            secondary: None,
            coalition: None,
        }
    }

    /// Adds a second origin whose distance must also fall in `range`.
    pub fn with_secondary(mut self, origin: Coordinates, range: MinMax) -> Self {
        self.secondary = Some((origin, range));
        self
    }

    pub fn with_coalition(mut self, coalition: Option<Coalition>) -> Self {
        self.coalition = coalition;
        self
    }
}

impl fmt::Display for SpawnRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "types {:?}, {:.0}-{:.0} m from ({:.0}, {:.0})",
            self.valid_types.as_slice(),
            self.range.min,
            self.range.max,
            self.origin.x,
            self.origin.y
        )?;
        if let Some((origin, range)) = self.secondary {
            write!(
                f,
                ", {:.0}-{:.0} m from ({:.0}, {:.0})",
                range.min, range.max, origin.x, origin.y
            )?;
        }
        match self.coalition {
            Some(c) => write!(f, ", coalition {c}"),
            None => write!(f, ", any coalition"),
        }
    }
}

pub struct SpawnAllocator<'a> {
    theater: &'a Theater,
    config: AllocationConfig,
    legacy_points: Vec<LegacySpawnPoint>,
    shape_points: Vec<ShapeSpawnPoint>,
    parking: HashMap<AirbaseId, Vec<ParkingSpot>>,
}

impl<'a> SpawnAllocator<'a> {
    /// Creates an allocator with pools populated from `theater`.
    pub fn new(theater: &'a Theater, config: AllocationConfig) -> Self {
        let mut allocator = Self {
            theater,
            config,
            legacy_points: Vec::new(),
            shape_points: Vec::new(),
            parking: HashMap::new(),
        };
        allocator.reset();
        allocator
    }

    pub fn theater(&self) -> &'a Theater {
        self.theater
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    pub fn backend(&self) -> SpawnBackend {
        if self.theater.shape_spawn_system && self.config.use_shape_spawning {
            SpawnBackend::Shape
        } else {
            SpawnBackend::Legacy
        }
    }

    /// Repopulates every pool from the theater, discarding all allocations so far.
    pub fn reset(&mut self) {
        self.legacy_points.clear();
        self.legacy_points
            .extend_from_slice(&self.theater.legacy_spawn_points);
        self.shape_points.clear();
        self.shape_points
            .extend_from_slice(&self.theater.shape_spawn_points);

        self.parking.clear();
        for airbase in &self.theater.airbases {
            if airbase.parking_spots.is_empty() || self.parking.contains_key(&airbase.id) {
                continue;
            }
            self.parking
                .insert(airbase.id, airbase.parking_spots.clone());
        }
    }

    /// Spawn points left in the active backend's pool.
    pub fn remaining_spawn_points(&self) -> usize {
        match self.backend() {
            SpawnBackend::Legacy => self.legacy_points.len(),
            SpawnBackend::Shape => self.shape_points.len(),
        }
    }

    pub fn remaining_parking(&self, airbase_id: AirbaseId) -> usize {
        self.parking.get(&airbase_id).map_or(0, Vec::len)
    }

    /// Finds a point matching every constraint of `request` and, for pooled
    /// backends, removes it from the pool.
    pub fn allocate(
        &mut self,
        request: &SpawnRequest,
        rng: &mut dyn RngCore,
    ) -> Option<Coordinates> {
        let found = match self.backend() {
            SpawnBackend::Legacy => self.allocate_legacy(request, rng),
            SpawnBackend::Shape if request.valid_types.is_air_or_sea() => {
                self.sample_air_or_sea(request, rng)
            }
            SpawnBackend::Shape => self.allocate_shape_land(request, rng),
        };
        match found {
            Some(c) => debug!("Allocated spawn point ({:.0}, {:.0}).", c.x, c.y),
            None => warn!("No spawn point found for {}.", request),
        }
        found
    }

    /// Closest matching point to `origin`, without randomization on pooled backends.
    ///
    /// With `consume == false` the point stays in the pool; use this when the point only
    /// serves as a direction or destination.
    pub fn allocate_nearest(
        &mut self,
        valid_types: &SpawnTypeSet,
        origin: Coordinates,
        consume: bool,
        rng: &mut dyn RngCore,
    ) -> Option<Coordinates> {
        match self.backend() {
            SpawnBackend::Legacy => {
                let index = nearest_index(
                    self.legacy_points
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| legacy_type_matches(valid_types, p.point_type))
                        .map(|(i, p)| (i, p.coordinates)),
                    origin,
                )?;
                let coordinates = self.legacy_points[index].coordinates;
                if consume {
                    self.legacy_points.remove(index);
                }
                Some(coordinates)
            }
            SpawnBackend::Shape if valid_types.is_air_or_sea() => {
                let theater = self.theater;
                let sea = valid_types.is_sea();
                rejection_sample(origin, NEAREST_AIR_SEA_RING, &self.config, rng, |c| {
                    !sea || theater.is_valid_water(c)
                })
            }
            SpawnBackend::Shape => {
                let index = nearest_index(
                    self.shape_points
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| valid_types.contains(p.point_type))
                        .map(|(i, p)| (i, p.coordinates)),
                    origin,
                )?;
                let coordinates = self.shape_points[index].coordinates;
                if consume {
                    self.shape_points.remove(index);
                }
                Some(coordinates)
            }
        }
    }

    /// Reserves `count` compatible parking spots at one airbase.
    ///
    /// All or nothing: when fewer than `count` compatible spots remain, nothing is
    /// removed and `None` is returned.
    pub fn allocate_parking(
        &mut self,
        airbase_id: AirbaseId,
        count: usize,
        aircraft: &AircraftSpec,
        require_open_air: bool,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<ParkingAllocation>> {
        let pool = self.parking.get_mut(&airbase_id)?;
        let compatible: Vec<ParkingSpot> = pool
            .iter()
            .filter(|s| s.accepts(aircraft, require_open_air))
            .copied()
            .collect();

        let Some(chosen) = parking::select_spots(compatible, count, rng) else {
            warn!(
                "Airbase {} has fewer than {} compatible parking spot(s).",
                airbase_id, count
            );
            return None;
        };

        pool.retain(|s| !chosen.iter().any(|c| c.spot_id == s.id));
        debug!(
            "Reserved {} parking spot(s) at airbase {}.",
            chosen.len(),
            airbase_id
        );
        Some(chosen)
    }

    /// Reserves parking at the airbase of `coalition` closest to `origin` that can fit
    /// `count` aircraft.
    pub fn allocate_parking_near(
        &mut self,
        origin: Coordinates,
        coalition: Coalition,
        invert_coalitions: bool,
        count: usize,
        aircraft: &AircraftSpec,
        rng: &mut dyn RngCore,
    ) -> Option<(AirbaseId, Vec<ParkingAllocation>)> {
        let mut airbases: Vec<(AirbaseId, f64)> = self
            .theater
            .airbases
            .iter()
            .filter(|a| a.coalition_for(invert_coalitions) == coalition)
            .map(|a| (a.id, a.coordinates.distance(origin)))
            .collect();
        airbases.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (airbase_id, _) in airbases {
            if let Some(spots) = self.allocate_parking(airbase_id, count, aircraft, false, rng) {
                return Some((airbase_id, spots));
            }
        }
        None
    }

    fn allocate_legacy(
        &mut self,
        request: &SpawnRequest,
        rng: &mut dyn RngCore,
    ) -> Option<Coordinates> {
        let candidates: Vec<Candidate> = self
            .legacy_points
            .iter()
            .enumerate()
            .filter(|(_, p)| legacy_type_matches(&request.valid_types, p.point_type))
            .filter(|(_, p)| match request.coalition {
                Some(wanted) => p.coalition == Some(wanted),
                None => true,
            })
            .map(|(i, p)| (i, p.coordinates))
            .collect();

        let index = self.search_pool(&candidates, request, rng)?;
        Some(self.legacy_points.remove(index).coordinates)
    }

    fn allocate_shape_land(
        &mut self,
        request: &SpawnRequest,
        rng: &mut dyn RngCore,
    ) -> Option<Coordinates> {
        let theater = self.theater;
        let candidates: Vec<Candidate> = self
            .shape_points
            .iter()
            .enumerate()
            .filter(|(_, p)| request.valid_types.contains(p.point_type))
            .filter(|(_, p)| match request.coalition {
                Some(c) => !theater.is_in_hostile_territory(p.coordinates, c),
                None => true,
            })
            .map(|(i, p)| (i, p.coordinates))
            .collect();

        let index = self.search_pool(&candidates, request, rng)?;
        Some(self.shape_points.remove(index).coordinates)
    }

    /// Narrows `candidates` by each origin in turn and picks one pool index uniformly.
    fn search_pool(
        &self,
        candidates: &[Candidate],
        request: &SpawnRequest,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        let mut remaining = radius_search(candidates, request.origin, request.range, &self.config);
        if let Some((origin, range)) = request.secondary {
            remaining = radius_search(&remaining, origin, range, &self.config);
        }
        pick(&remaining, rng).map(|(index, _)| *index)
    }

    fn sample_air_or_sea(
        &self,
        request: &SpawnRequest,
        rng: &mut dyn RngCore,
    ) -> Option<Coordinates> {
        let theater = self.theater;
        let sea = request.valid_types.is_sea();
        rejection_sample(request.origin, request.range, &self.config, rng, |c| {
            if let Some(coalition) = request.coalition {
                if theater.is_in_hostile_territory(c, coalition) {
                    return false;
                }
            }
            if let Some((origin, range)) = request.secondary {
                if !range.contains(origin.distance(c)) {
                    return false;
                }
            }
            !sea || theater.is_valid_water(c)
        })
    }
}

/// Legacy point lists accept any point type when air spawns are allowed.
fn legacy_type_matches(valid_types: &SpawnTypeSet, point_type: SpawnPointType) -> bool {
    valid_types.contains(SpawnPointType::Air) || valid_types.contains(point_type)
}

fn nearest_index(
    candidates: impl Iterator<Item = Candidate>,
    origin: Coordinates,
) -> Option<usize> {
    candidates
        .min_by(|a, b| origin.distance(a.1).total_cmp(&origin.distance(b.1)))
        .map(|(i, _)| i)
}
