//! Shared records and theaters for unit tests.
use crate::database::{
    BehaviorLocation, Database, ObjectiveFeature, ObjectivePreset, ObjectiveTarget,
    ObjectiveTask, Registry, ScriptTemplates, TargetBehavior, UnitCategory, UnitFamily,
};
use crate::geometry::{CountRange, Coordinates, NM_TO_METERS};
use crate::objectives::resolve::ResolvedTask;
use crate::options::{ObjectiveOption, ObjectiveOptions};
use crate::template::{MissionTemplate, ObjectiveTemplate, TargetCount};
use crate::theater::{
    Airbase, AirbaseId, Coalition, LegacySpawnPoint, ParkingSpot, ParkingSpotKind, Side,
    SpawnPointType, Theater,
};

pub const HOME: AirbaseId = 1;
pub const FORWARD: AirbaseId = 2;

const LAND: [SpawnPointType; 3] = [
    SpawnPointType::LandSmall,
    SpawnPointType::LandMedium,
    SpawnPointType::LandLarge,
];

pub fn nm(x: f64, y: f64) -> Coordinates {
    Coordinates::new(x * NM_TO_METERS, y * NM_TO_METERS)
}

fn target(
    id: &str,
    unit_category: UnitCategory,
    family: UnitFamily,
    counts: [CountRange; 5],
    valid_spawn_points: &[SpawnPointType],
) -> ObjectiveTarget {
    ObjectiveTarget {
        id: id.into(),
        unit_category,
        unit_families: vec![family],
        unit_counts: counts,
        valid_spawn_points: valid_spawn_points.to_vec(),
    }
}

fn counts(average: u32) -> [CountRange; 5] {
    [
        CountRange::exactly(1),
        CountRange::new(1, average),
        CountRange::exactly(average),
        CountRange::new(average, average + 2),
        CountRange::new(average + 2, average + 4),
    ]
}

fn behavior(id: &str, location: BehaviorLocation) -> TargetBehavior {
    TargetBehavior {
        id: id.into(),
        location,
        group_scripts: ScriptTemplates::uniform(format!("Group{id}")),
        unit_scripts: ScriptTemplates::uniform(format!("Unit{id}")),
    }
}

fn task(id: &str, target_side: Side, categories: &[UnitCategory]) -> ObjectiveTask {
    ObjectiveTask {
        id: id.into(),
        target_side,
        valid_unit_categories: categories.to_vec(),
        briefing_task: [
            "Destroy the $UNITFAMILY$ at $OBJECTIVENAME$".into(),
            "Destroy all $UNITFAMILY$ at $OBJECTIVENAME$".into(),
        ],
        briefing_remarks: String::new(),
        completion_triggers: vec!["briefingRoom.trigger($OBJECTIVEINDEX$)\n".into()],
        include_ogg: Vec::new(),
        required_features: Vec::new(),
        transport: false,
        escort: false,
    }
}

fn feature(id: &str) -> ObjectiveFeature {
    ObjectiveFeature {
        id: id.into(),
        script: format!("feature{id}($OBJECTIVEINDEX$, \"$GROUPNAME$\")\n"),
        include_ogg: vec![format!("{id}.ogg")],
    }
}

pub fn database() -> Database {
    use UnitCategory::*;

    let idle = TargetBehavior {
        group_scripts: ScriptTemplates {
            vehicle: "GroundIdle".into(),
            ..ScriptTemplates::uniform("Idle")
        },
        ..behavior("Idle", BehaviorLocation::Default)
    };

    let transport = ObjectiveTask {
        transport: true,
        ..task("TransportTroops", Side::Ally, &[Infantry])
    };
    let escort = ObjectiveTask {
        transport: true,
        escort: true,
        ..task("EscortConvoy", Side::Ally, &[Vehicle])
    };

    Database {
        targets: Registry::from_records([
            target("tanks", Vehicle, UnitFamily::VehicleMBT, counts(3), &LAND),
            target(
                "fighters",
                Plane,
                UnitFamily::PlaneFighter,
                counts(2),
                &[SpawnPointType::Air],
            ),
            target(
                "strikers",
                Plane,
                UnitFamily::PlaneStrike,
                counts(2),
                &[SpawnPointType::Air],
            ),
            target("infantry", Infantry, UnitFamily::Infantry, counts(4), &LAND),
            target(
                "ships",
                Ship,
                UnitFamily::ShipFrigate,
                counts(1),
                &[SpawnPointType::Sea],
            ),
            target(
                "factory",
                Static,
                UnitFamily::StaticStructureProduction,
                counts(2),
                &LAND,
            ),
        ]),
        behaviors: Registry::from_records([
            idle,
            behavior("Patrol", BehaviorLocation::Patrolling),
            behavior("Parked", BehaviorLocation::SpawnOnAirbaseParking),
            behavior("AttackBase", BehaviorLocation::GoToPlayerAirbase),
            behavior("ReturnToBase", BehaviorLocation::GoToAirbase),
            behavior("RecoverToBase", BehaviorLocation::Default),
            behavior("RelocateToNewPosition", BehaviorLocation::Default),
        ]),
        tasks: Registry::from_records([
            task("DestroyAll", Side::Enemy, &[Vehicle, Infantry, Ship, Static]),
            task("Intercept", Side::Enemy, &[Plane, Helicopter]),
            transport,
            escort,
        ]),
        presets: Registry::from_records([ObjectivePreset {
            id: "ArmorStrike".into(),
            targets: vec!["tanks".into()],
            behaviors: vec!["Idle".into()],
            task: "DestroyAll".into(),
            options: vec![ObjectiveOption::ShowTarget],
            features: vec!["Smoke".into()],
        }]),
        features: Registry::from_records([feature("Smoke"), feature("Flare")]),
    }
}

/// Looks up records directly, bypassing preset expansion and category checks.
pub fn resolved<'a>(
    database: &'a Database,
    target: &str,
    behavior: &str,
    task: &str,
) -> ResolvedTask<'a> {
    ResolvedTask {
        target: database.targets.get(target).expect("fixture target"),
        behavior: database.behaviors.get(behavior).expect("fixture behavior"),
        task: database.tasks.get(task).expect("fixture task"),
        options: ObjectiveOptions::default(),
        preset: None,
        target_count: TargetCount::Average,
        unit_count: None,
    }
}

pub fn airbase(
    id: AirbaseId,
    at: Coordinates,
    coalition: Coalition,
    spots: &[ParkingSpotKind],
) -> Airbase {
    Airbase {
        id,
        name: format!("Airbase {id}"),
        coordinates: at,
        coalition,
        parking_spots: spots
            .iter()
            .enumerate()
            .map(|(i, &kind)| ParkingSpot {
                id: id * 100 + i as u32,
                airbase_id: id,
                coordinates: at + Coordinates::new(i as f64 * 30.0, 50.0),
                kind,
            })
            .collect(),
    }
}

pub fn point(
    at: Coordinates,
    point_type: SpawnPointType,
    coalition: Coalition,
) -> LegacySpawnPoint {
    LegacySpawnPoint {
        coordinates: at,
        point_type,
        coalition: Some(coalition),
    }
}

/// Blue home airbase at the origin, red airbase 120 NM east, red land points 40-80 NM
/// east on a 5 x 10 NM grid, a few blue land points and two red sea points.
pub fn theater() -> Theater {
    use ParkingSpotKind::*;

    let mut theater = Theater::new("fixture");
    theater.airbases = vec![
        airbase(
            HOME,
            Coordinates::ZERO,
            Coalition::Blue,
            &[OpenAir, OpenAir, OpenAir, OpenAir, HelicopterOnly],
        ),
        airbase(
            FORWARD,
            nm(120.0, 0.0),
            Coalition::Red,
            &[
                AirplaneOnly,
                AirplaneOnly,
                AirplaneOnly,
                AirplaneOnly,
                HardenedAirShelter,
                HardenedAirShelter,
            ],
        ),
    ];
    for step in 0..9 {
        let x = 40.0 + 5.0 * step as f64;
        for y in [-10.0, 0.0, 10.0] {
            theater.legacy_spawn_points.push(point(
                nm(x, y),
                SpawnPointType::LandMedium,
                Coalition::Red,
            ));
        }
    }
    for x in [5.0, 10.0, 15.0] {
        theater.legacy_spawn_points.push(point(
            nm(x, 0.0),
            SpawnPointType::LandSmall,
            Coalition::Blue,
        ));
    }
    for x in [50.0, 60.0] {
        theater
            .legacy_spawn_points
            .push(point(nm(x, -40.0), SpawnPointType::Sea, Coalition::Red));
    }
    theater
}

/// Blue mission from [`HOME`] with the given objectives.
pub fn template(objectives: impl IntoIterator<Item = ObjectiveTemplate>) -> MissionTemplate {
    let mut template = MissionTemplate::new(Coalition::Blue, HOME);
    template.objectives = objectives.into_iter().collect();
    template
}
