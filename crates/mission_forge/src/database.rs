//! Read-only reference records keyed by string id.
//!
//! A [`Database`] is assembled once (in code or, with the `serde` feature, from JSON) and
//! then only borrowed. Lookups return `Option`; [`Registry::require`] turns absence into
//! [`Error::ReferenceNotFound`] at the point of use.
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::CountRange;
use crate::options::ObjectiveOption;
use crate::template::TargetCount;
use crate::theater::{AircraftSpec, Side, SpawnPointType};

/// A record stored in a [`Registry`].
pub trait Record {
    /// Human-readable record kind used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Immutable map from id to record.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))
)]
#[derive(Clone, Debug)]
pub struct Registry<T> {
    records: HashMap<String, T>,
}

impl<T: Record> Registry<T> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = T>) -> Self {
        let mut registry = Self::new();
        for r in records {
            registry.insert(r);
        }
        registry
    }

    /// Inserts a record, replacing any record with the same id.
    pub fn insert(&mut self, record: T) {
        self.records.insert(record.id().to_string(), record);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.get(id)
    }

    pub fn require(&self, id: &str) -> Result<&T> {
        self.get(id).ok_or_else(|| Error::not_found(T::KIND, id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl<T: Record> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    Plane,
    Helicopter,
    Ship,
    Static,
    Vehicle,
    Infantry,
}

impl UnitCategory {
    pub fn is_aircraft(self) -> bool {
        matches!(self, UnitCategory::Plane | UnitCategory::Helicopter)
    }

    pub fn script_category(self) -> ScriptCategory {
        match self {
            UnitCategory::Plane => ScriptCategory::Plane,
            UnitCategory::Helicopter => ScriptCategory::Helicopter,
            UnitCategory::Ship => ScriptCategory::Ship,
            UnitCategory::Static => ScriptCategory::Static,
            UnitCategory::Vehicle | UnitCategory::Infantry => ScriptCategory::Vehicle,
        }
    }

    /// Name of the category in the mission scripting environment.
    pub fn script_name(self) -> &'static str {
        match self {
            UnitCategory::Plane => "AIRPLANE",
            UnitCategory::Helicopter => "HELICOPTER",
            UnitCategory::Ship => "SHIP",
            UnitCategory::Static => "STRUCTURE",
            UnitCategory::Vehicle | UnitCategory::Infantry => "GROUND_UNIT",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Category used to pick group and unit script templates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScriptCategory {
    Helicopter,
    Plane,
    Ship,
    Static,
    Vehicle,
}

/// One script template id per [`ScriptCategory`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptTemplates {
    pub helicopter: String,
    pub plane: String,
    pub ship: String,
    pub static_: String,
    pub vehicle: String,
}

impl ScriptTemplates {
    /// The same template for every category.
    pub fn uniform(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            helicopter: id.clone(),
            plane: id.clone(),
            ship: id.clone(),
            static_: id.clone(),
            vehicle: id,
        }
    }

    pub fn get(&self, category: ScriptCategory) -> &str {
        match category {
            ScriptCategory::Helicopter => &self.helicopter,
            ScriptCategory::Plane => &self.plane,
            ScriptCategory::Ship => &self.ship,
            ScriptCategory::Static => &self.static_,
            ScriptCategory::Vehicle => &self.vehicle,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    HelicopterAttack,
    HelicopterTransport,
    InfantryMANPADS,
    Infantry,
    PlaneAttack,
    PlaneBomber,
    PlaneFighter,
    PlaneInterceptor,
    PlaneStrike,
    PlaneTransport,
    ShipCarrier,
    ShipFrigate,
    ShipCargo,
    StaticStructureMilitary,
    StaticStructureProduction,
    VehicleAAA,
    VehicleAPC,
    VehicleMBT,
    VehicleSAMShort,
    VehicleTransport,
}

impl UnitFamily {
    pub fn category(self) -> UnitCategory {
        use UnitFamily::*;
        match self {
            HelicopterAttack | HelicopterTransport => UnitCategory::Helicopter,
            Infantry | InfantryMANPADS => UnitCategory::Infantry,
            PlaneAttack | PlaneBomber | PlaneFighter | PlaneInterceptor | PlaneStrike
            | PlaneTransport => UnitCategory::Plane,
            ShipCarrier | ShipFrigate | ShipCargo => UnitCategory::Ship,
            StaticStructureMilitary | StaticStructureProduction => UnitCategory::Static,
            VehicleAAA | VehicleAPC | VehicleMBT | VehicleSAMShort | VehicleTransport => {
                UnitCategory::Vehicle
            }
        }
    }

    /// Briefing display name, singular or plural.
    pub fn display_name(self, plural: bool) -> &'static str {
        use UnitFamily::*;
        let (one, many) = match self {
            HelicopterAttack => ("attack helicopter", "attack helicopters"),
            HelicopterTransport => ("transport helicopter", "transport helicopters"),
            InfantryMANPADS => ("MANPADS team", "MANPADS teams"),
            Infantry => ("infantry squad", "infantry"),
            PlaneAttack => ("attack aircraft", "attack aircraft"),
            PlaneBomber => ("bomber", "bombers"),
            PlaneFighter => ("fighter", "fighters"),
            PlaneInterceptor => ("interceptor", "interceptors"),
            PlaneStrike => ("strike aircraft", "strike aircraft"),
            PlaneTransport => ("transport aircraft", "transport aircraft"),
            ShipCarrier => ("aircraft carrier", "aircraft carriers"),
            ShipFrigate => ("frigate", "frigates"),
            ShipCargo => ("cargo ship", "cargo ships"),
            StaticStructureMilitary => ("military building", "military buildings"),
            StaticStructureProduction => ("production facility", "production facilities"),
            VehicleAAA => ("AAA vehicle", "AAA vehicles"),
            VehicleAPC => ("APC", "APCs"),
            VehicleMBT => ("tank", "tanks"),
            VehicleSAMShort => ("short-range SAM", "short-range SAMs"),
            VehicleTransport => ("truck", "trucks"),
        };
        if plural {
            many
        } else {
            one
        }
    }

    /// Parking requirements for aircraft families.
    pub fn aircraft_spec(self) -> AircraftSpec {
        AircraftSpec {
            helicopter: self.category() == UnitCategory::Helicopter,
        }
    }
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Where a target group is placed and how it moves.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BehaviorLocation {
    #[default]
    Default,
    Patrolling,
    SpawnOnAirbase,
    SpawnOnAirbaseParking,
    SpawnOnAirbaseParkingNoHardenedShelter,
    GoToPlayerAirbase,
    GoToAirbase,
}

impl BehaviorLocation {
    pub fn is_airbase(self) -> bool {
        matches!(
            self,
            BehaviorLocation::SpawnOnAirbase
                | BehaviorLocation::SpawnOnAirbaseParking
                | BehaviorLocation::SpawnOnAirbaseParkingNoHardenedShelter
        )
    }

    /// Aircraft sit parked rather than spawning in flight.
    pub fn is_air_on_ground(self) -> bool {
        matches!(
            self,
            BehaviorLocation::SpawnOnAirbaseParking
                | BehaviorLocation::SpawnOnAirbaseParkingNoHardenedShelter
        )
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct ObjectiveTarget {
    pub id: String,
    pub unit_category: UnitCategory,
    pub unit_families: Vec<UnitFamily>,
    /// Unit count range per [`TargetCount`], in declaration order.
    pub unit_counts: [CountRange; 5],
    pub valid_spawn_points: Vec<SpawnPointType>,
}

impl ObjectiveTarget {
    pub fn unit_count(&self, count: TargetCount) -> CountRange {
        self.unit_counts[count.index()]
    }
}

impl Record for ObjectiveTarget {
    const KIND: &'static str = "target";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct TargetBehavior {
    pub id: String,
    pub location: BehaviorLocation,
    pub group_scripts: ScriptTemplates,
    pub unit_scripts: ScriptTemplates,
}

impl Record for TargetBehavior {
    const KIND: &'static str = "target behavior";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct ObjectiveTask {
    pub id: String,
    pub target_side: Side,
    pub valid_unit_categories: Vec<UnitCategory>,
    /// Briefing task templates, singular then plural.
    pub briefing_task: [String; 2],
    /// Semicolon-delimited list of flavor remarks.
    pub briefing_remarks: String,
    /// Script fragments appended per objective; `$OBJECTIVEINDEX$` is substituted.
    pub completion_triggers: Vec<String>,
    pub include_ogg: Vec<String>,
    pub required_features: Vec<String>,
    pub transport: bool,
    pub escort: bool,
}

impl Record for ObjectiveTask {
    const KIND: &'static str = "task";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct ObjectivePreset {
    pub id: String,
    pub targets: Vec<String>,
    pub behaviors: Vec<String>,
    pub task: String,
    pub options: Vec<ObjectiveOption>,
    pub features: Vec<String>,
}

impl Record for ObjectivePreset {
    const KIND: &'static str = "preset";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Companion script expanded once per objective that requests it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct ObjectiveFeature {
    pub id: String,
    pub script: String,
    pub include_ogg: Vec<String>,
}

impl Record for ObjectiveFeature {
    const KIND: &'static str = "feature";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct Database {
    pub targets: Registry<ObjectiveTarget>,
    pub behaviors: Registry<TargetBehavior>,
    pub tasks: Registry<ObjectiveTask>,
    pub presets: Registry<ObjectivePreset>,
    pub features: Registry<ObjectiveFeature>,
}
