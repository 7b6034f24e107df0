#![forbid(unsafe_code)]
//! Shared setup for the mission_forge demos: logging plus a small hand-built theater and
//! reference database.
use mission_forge::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn nm(x: f64, y: f64) -> Coordinates {
    Coordinates::new(x * NM_TO_METERS, y * NM_TO_METERS)
}

fn airbase(id: AirbaseId, name: &str, at: Coordinates, coalition: Coalition) -> Airbase {
    let kinds = [
        ParkingSpotKind::OpenAir,
        ParkingSpotKind::OpenAir,
        ParkingSpotKind::HardenedAirShelter,
        ParkingSpotKind::HardenedAirShelter,
        ParkingSpotKind::AirplaneOnly,
        ParkingSpotKind::AirplaneOnly,
        ParkingSpotKind::HelicopterOnly,
        ParkingSpotKind::HelicopterOnly,
    ];
    Airbase {
        id,
        name: name.into(),
        coordinates: at,
        coalition,
        parking_spots: kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| ParkingSpot {
                id: id * 100 + i as u32,
                airbase_id: id,
                coordinates: at + Coordinates::new(40.0 * i as f64, 120.0),
                kind,
            })
            .collect(),
    }
}

/// Two blue and two red airbases along an east-west axis with land spawn points between
/// them and a sea lane to the south.
pub fn demo_theater() -> Theater {
    let mut theater = Theater::new("Demo Coast");
    theater.airbases = vec![
        airbase(1, "Westfield", Coordinates::ZERO, Coalition::Blue),
        airbase(2, "Harbor Point", nm(-20.0, -15.0), Coalition::Blue),
        airbase(3, "Redmont", nm(110.0, 5.0), Coalition::Red),
        airbase(4, "Eastgate", nm(140.0, -20.0), Coalition::Red),
    ];

    for ix in 0..20 {
        for iy in 0..8 {
            let x = 20.0 + ix as f64 * 6.0;
            let y = -20.0 + iy as f64 * 6.0;
            let point_type = match (ix + iy) % 3 {
                0 => SpawnPointType::LandSmall,
                1 => SpawnPointType::LandMedium,
                _ => SpawnPointType::LandLarge,
            };
            theater.legacy_spawn_points.push(LegacySpawnPoint {
                coordinates: nm(x, y),
                point_type,
                coalition: Some(if x < 60.0 {
                    Coalition::Blue
                } else {
                    Coalition::Red
                }),
            });
        }
    }
    for ix in 0..10 {
        theater.legacy_spawn_points.push(LegacySpawnPoint {
            coordinates: nm(40.0 + ix as f64 * 10.0, -45.0),
            point_type: SpawnPointType::Sea,
            coalition: Some(Coalition::Red),
        });
    }
    theater
}

fn behavior(id: &str, location: BehaviorLocation, vehicle_script: &str) -> TargetBehavior {
    TargetBehavior {
        id: id.into(),
        location,
        group_scripts: ScriptTemplates {
            vehicle: vehicle_script.into(),
            ..ScriptTemplates::uniform(format!("Aircraft{id}"))
        },
        unit_scripts: ScriptTemplates::uniform("Default"),
    }
}

fn counts(low: u32, high: u32) -> [CountRange; 5] {
    [
        CountRange::exactly(1),
        CountRange::new(low, low + 1),
        CountRange::new(low + 1, high),
        CountRange::new(high, high + 2),
        CountRange::new(high + 2, high + 4),
    ]
}

fn task(
    id: &str,
    side: Side,
    categories: &[UnitCategory],
    singular: &str,
    plural: &str,
) -> ObjectiveTask {
    ObjectiveTask {
        id: id.into(),
        target_side: side,
        valid_unit_categories: categories.to_vec(),
        briefing_task: [singular.into(), plural.into()],
        briefing_remarks: [
            "Expect {light|heavy} resistance near $OBJECTIVENAME$.",
            "Intel on the $UNITFAMILY$ is {fresh|a day old}.",
        ]
        .join(";"),
        completion_triggers: vec![format!(
            "briefingRoom.mission.objectiveTriggers[$OBJECTIVEINDEX$] = {}\n",
            "briefingRoom.mission.objectiveTriggersCommon.destroyTrackUnits"
        )],
        include_ogg: vec!["Radio0.ogg".into()],
        required_features: Vec::new(),
        transport: false,
        escort: false,
    }
}

/// Targets, behaviors, tasks, one preset and two features.
pub fn demo_database() -> Database {
    let land = vec![
        SpawnPointType::LandSmall,
        SpawnPointType::LandMedium,
        SpawnPointType::LandLarge,
    ];
    let target = |id: &str,
                  unit_category: UnitCategory,
                  unit_families: Vec<UnitFamily>,
                  unit_counts: [CountRange; 5],
                  spawn: &[SpawnPointType]| ObjectiveTarget {
        id: id.into(),
        unit_category,
        unit_families,
        unit_counts,
        valid_spawn_points: spawn.to_vec(),
    };

    let mut transport = task(
        "TransportTroops",
        Side::Ally,
        &[UnitCategory::Infantry],
        "Fly the $UNITFAMILY$ to $OBJECTIVENAME$",
        "Fly the $UNITFAMILY$ to $OBJECTIVENAME$",
    );
    transport.transport = true;

    Database {
        targets: Registry::from_records([
            target(
                "Armor",
                UnitCategory::Vehicle,
                vec![UnitFamily::VehicleMBT, UnitFamily::VehicleAPC],
                counts(2, 4),
                &land,
            ),
            target(
                "AirDefense",
                UnitCategory::Vehicle,
                vec![UnitFamily::VehicleAAA, UnitFamily::VehicleSAMShort],
                counts(1, 3),
                &land,
            ),
            target(
                "Factory",
                UnitCategory::Static,
                vec![UnitFamily::StaticStructureProduction],
                counts(1, 2),
                &land,
            ),
            target(
                "Troops",
                UnitCategory::Infantry,
                vec![UnitFamily::Infantry],
                counts(4, 6),
                &land,
            ),
            target(
                "Frigates",
                UnitCategory::Ship,
                vec![UnitFamily::ShipFrigate],
                counts(1, 2),
                &[SpawnPointType::Sea],
            ),
            target(
                "ParkedStrike",
                UnitCategory::Plane,
                vec![UnitFamily::PlaneStrike, UnitFamily::PlaneAttack],
                counts(2, 2),
                &[SpawnPointType::Air],
            ),
        ]),
        behaviors: Registry::from_records([
            behavior("Idle", BehaviorLocation::Default, "GroundIdle"),
            behavior("Patrol", BehaviorLocation::Patrolling, "GroundPatrol"),
            behavior("Parked", BehaviorLocation::SpawnOnAirbaseParking, "GroundIdle"),
            behavior("RecoverToBase", BehaviorLocation::Default, "GroundIdle"),
        ]),
        tasks: Registry::from_records([
            task(
                "DestroyAll",
                Side::Enemy,
                &[
                    UnitCategory::Vehicle,
                    UnitCategory::Static,
                    UnitCategory::Ship,
                    UnitCategory::Infantry,
                    UnitCategory::Plane,
                ],
                "Destroy the {enemy|hostile} $UNITFAMILY$ at $OBJECTIVENAME$",
                "Destroy all {enemy|hostile} $UNITFAMILY$ at $OBJECTIVENAME$",
            ),
            transport,
        ]),
        presets: Registry::from_records([ObjectivePreset {
            id: "SEAD".into(),
            targets: vec!["AirDefense".into()],
            behaviors: vec!["Idle".into(), "Patrol".into()],
            task: "DestroyAll".into(),
            options: vec![ObjectiveOption::InaccurateWaypoint],
            features: vec!["SmokeMarker".into()],
        }]),
        features: Registry::from_records([
            ObjectiveFeature {
                id: "SmokeMarker".into(),
                script: "briefingRoom.smoke($OBJECTIVEINDEX$, \"$GROUPNAME$\")\n".into(),
                include_ogg: Vec::new(),
            },
            ObjectiveFeature {
                id: "TargetLaser".into(),
                script: "briefingRoom.laser($OBJECTIVEINDEX$, $UNITNAMES$)\n".into(),
                include_ogg: vec!["Laser.ogg".into()],
            },
        ]),
    }
}
