#![forbid(unsafe_code)]
//! mission_forge: Procedural mission generation with constrained spawn point allocation.
//!
//! Modules:
//! - allocation: spawn point and parking allocation with widening radius searches
//! - objectives: objective pipeline (resolution, placement, waypoints, briefing and scripts)
//! - generator: top-level mission build over a theater and a reference database
//! - theater, database, template: the read-only inputs of a build
//! - mission, units, events: build output, unit creation seam and progress events
//!
//! For examples and docs, see README and docs.rs.
pub mod allocation;
pub mod database;
pub mod error;
pub mod events;
pub mod generator;
pub mod geometry;
pub mod mission;
pub mod objectives;
pub mod options;
pub mod sampling;
pub mod template;
pub mod theater;
pub mod units;

#[cfg(test)]
pub(crate) mod fixtures;

/// Convenient re-exports for common types. Import with `use mission_forge::prelude::*;`.
pub mod prelude {
    pub use crate::allocation::{
        AllocationConfig, ParkingAllocation, SpawnAllocator, SpawnBackend, SpawnRequest,
    };
    pub use crate::database::{
        BehaviorLocation, Database, ObjectiveFeature, ObjectivePreset, ObjectiveTarget,
        ObjectiveTask, Registry, ScriptCategory, ScriptTemplates, TargetBehavior, UnitCategory,
        UnitFamily,
    };
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        AsEventSink, EventSink, FnSink, GenerationEvent, GenerationEventKind, MultiSink, VecSink,
    };
    pub use crate::generator::{generate_mission, MissionGenerator};
    pub use crate::geometry::{
        Coordinates, CountRange, MinMax, Polygon, ANY_RANGE, HINT_RANGE, NM_TO_METERS,
    };
    pub use crate::mission::{BriefingItem, BriefingItemKind, Drawing, Mission, Waypoint};
    pub use crate::objectives::{ObjectiveGenerator, ObjectiveOutcome, WaypointNameGenerator};
    pub use crate::options::{GroupFlags, ObjectiveOption, ObjectiveOptions, Visibility};
    pub use crate::template::{
        MissionOptions, MissionTemplate, ObjectiveTemplate, TargetCount, TaskTemplate,
    };
    pub use crate::theater::{
        AircraftSpec, Airbase, AirbaseId, Coalition, LegacySpawnPoint, ParkingSpot,
        ParkingSpotKind, ShapeSpawnPoint, Side, SpawnPointType, SpawnTypeSet, Theater,
    };
    pub use crate::units::{
        GroupInfo, GroupRequest, GroupSettings, SequentialUnitFactory, UnitFactory,
    };
}
