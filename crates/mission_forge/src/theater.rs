//! Static theater definitions: airbases, parking spots, spawn points and territory polygons.
//!
//! A [`Theater`] is read-only. Many mission builds may borrow the same theater while each
//! owns its own [`crate::allocation::SpawnAllocator`].
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::polygon::any_contains;
use crate::geometry::{Coordinates, Polygon};

pub type AirbaseId = u32;
pub type ParkingSpotId = u32;

/// One of the two opposing sides of a mission.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Coalition {
    Blue,
    Red,
}

impl Coalition {
    pub fn enemy(self) -> Coalition {
        match self {
            Coalition::Blue => Coalition::Red,
            Coalition::Red => Coalition::Blue,
        }
    }
}

impl fmt::Display for Coalition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coalition::Blue => f.write_str("Blue"),
            Coalition::Red => f.write_str("Red"),
        }
    }
}

/// Side relative to the players.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Ally,
    Enemy,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Ally => f.write_str("Ally"),
            Side::Enemy => f.write_str("Enemy"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnPointType {
    LandSmall,
    LandMedium,
    LandLarge,
    Sea,
    Air,
}

impl SpawnPointType {
    pub fn is_land(self) -> bool {
        matches!(
            self,
            SpawnPointType::LandSmall | SpawnPointType::LandMedium | SpawnPointType::LandLarge
        )
    }
}

/// Non-empty set of accepted spawn point types that never mixes sea and land.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<SpawnPointType>", into = "Vec<SpawnPointType>")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnTypeSet {
    types: Vec<SpawnPointType>,
}

impl SpawnTypeSet {
    pub fn new(types: impl IntoIterator<Item = SpawnPointType>) -> Result<Self> {
        let mut collected: Vec<SpawnPointType> = Vec::new();
        for t in types {
            if !collected.contains(&t) {
                collected.push(t);
            }
        }
        if collected.is_empty() {
            return Err(Error::ConstraintViolation(
                "spawn type set must not be empty".into(),
            ));
        }
        if mixes_land_and_sea(&collected) {
            return Err(Error::ConstraintViolation(format!(
                "cannot mix land and sea spawn types: {collected:?}"
            )));
        }
        Ok(Self { types: collected })
    }

    pub fn single(t: SpawnPointType) -> Self {
        Self { types: vec![t] }
    }

    pub fn contains(&self, t: SpawnPointType) -> bool {
        self.types.contains(&t)
    }

    pub fn as_slice(&self) -> &[SpawnPointType] {
        &self.types
    }

    pub fn is_air_or_sea(&self) -> bool {
        self.contains(SpawnPointType::Air) || self.contains(SpawnPointType::Sea)
    }

    /// Sea checks apply when the leading accepted type is `Sea`.
    pub fn is_sea(&self) -> bool {
        self.types.first() == Some(&SpawnPointType::Sea)
    }
}

impl TryFrom<Vec<SpawnPointType>> for SpawnTypeSet {
    type Error = Error;

    fn try_from(value: Vec<SpawnPointType>) -> Result<Self> {
        SpawnTypeSet::new(value)
    }
}

impl From<SpawnTypeSet> for Vec<SpawnPointType> {
    fn from(value: SpawnTypeSet) -> Self {
        value.types
    }
}

/// Whether a collection of spawn types contains both sea and land entries.
pub fn mixes_land_and_sea(types: &[SpawnPointType]) -> bool {
    types.contains(&SpawnPointType::Sea) && types.iter().any(|t| t.is_land())
}

/// Spawn point from the discrete, coalition-tagged list.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegacySpawnPoint {
    pub coordinates: Coordinates,
    pub point_type: SpawnPointType,
    pub coalition: Option<Coalition>,
}

/// Spawn point validated against territory polygons at allocation time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeSpawnPoint {
    pub coordinates: Coordinates,
    pub point_type: SpawnPointType,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParkingSpotKind {
    OpenAir,
    HardenedAirShelter,
    HelicopterOnly,
    AirplaneOnly,
}

/// Parking requirements of the aircraft being placed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AircraftSpec {
    pub helicopter: bool,
}

impl AircraftSpec {
    pub const AIRPLANE: AircraftSpec = AircraftSpec { helicopter: false };
    pub const HELICOPTER: AircraftSpec = AircraftSpec { helicopter: true };
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParkingSpot {
    pub id: ParkingSpotId,
    pub airbase_id: AirbaseId,
    pub coordinates: Coordinates,
    pub kind: ParkingSpotKind,
}

impl ParkingSpot {
    pub fn accepts(&self, aircraft: &AircraftSpec, require_open_air: bool) -> bool {
        match self.kind {
            ParkingSpotKind::OpenAir => true,
            ParkingSpotKind::HardenedAirShelter => !require_open_air && !aircraft.helicopter,
            ParkingSpotKind::HelicopterOnly => aircraft.helicopter,
            ParkingSpotKind::AirplaneOnly => !aircraft.helicopter,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Airbase {
    pub id: AirbaseId,
    pub name: String,
    pub coordinates: Coordinates,
    pub coalition: Coalition,
    pub parking_spots: Vec<ParkingSpot>,
}

impl Airbase {
    /// Controlling coalition, flipped when the mission inverts country coalitions.
    pub fn coalition_for(&self, invert: bool) -> Coalition {
        if invert {
            self.coalition.enemy()
        } else {
            self.coalition
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct Theater {
    pub id: String,
    pub airbases: Vec<Airbase>,
    pub legacy_spawn_points: Vec<LegacySpawnPoint>,
    pub shape_spawn_points: Vec<ShapeSpawnPoint>,
    /// Selects the polygon-validated spawn backend.
    pub shape_spawn_system: bool,
    pub blue_territory: Vec<Polygon>,
    pub red_territory: Vec<Polygon>,
    pub water: Vec<Polygon>,
    pub water_exclusion: Vec<Polygon>,
}

impl Theater {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn airbase(&self, id: AirbaseId) -> Option<&Airbase> {
        self.airbases.iter().find(|a| a.id == id)
    }

    pub fn require_airbase(&self, id: AirbaseId) -> Result<&Airbase> {
        self.airbase(id)
            .ok_or_else(|| Error::not_found("airbase", id.to_string()))
    }

    /// Whether `point` lies inside the territory of the coalition opposing `coalition`.
    pub fn is_in_hostile_territory(&self, point: Coordinates, coalition: Coalition) -> bool {
        match coalition {
            Coalition::Blue => any_contains(&self.red_territory, point),
            Coalition::Red => any_contains(&self.blue_territory, point),
        }
    }

    /// Inside some water polygon and outside every water exclusion polygon.
    pub fn is_valid_water(&self, point: Coordinates) -> bool {
        any_contains(&self.water, point) && !any_contains(&self.water_exclusion, point)
    }
}
