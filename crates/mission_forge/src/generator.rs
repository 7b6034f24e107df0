//! Top-level mission build.
use rand::RngCore;
use tracing::{info, warn};

use crate::allocation::AllocationConfig;
use crate::database::Database;
use crate::error::Result;
use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::mission::Mission;
use crate::objectives::ObjectiveGenerator;
use crate::template::MissionTemplate;
use crate::theater::Theater;
use crate::units::UnitFactory;

/// Builds missions over one theater and database.
///
/// The generator itself holds only shared references; every build creates its own
/// allocation pools, so several builds may run side by side over the same theater.
pub struct MissionGenerator<'a> {
    /// Reference records used by every build.
    pub database: &'a Database,
    /// Theater whose spawn points and parking spots are allocated.
    pub theater: &'a Theater,
    /// Allocation tunables applied to each build.
    pub config: AllocationConfig,
}

impl<'a> MissionGenerator<'a> {
    pub fn new(database: &'a Database, theater: &'a Theater, config: AllocationConfig) -> Self {
        Self {
            database,
            theater,
            config,
        }
    }

    /// Builds a mission from `template`.
    pub fn generate(
        &self,
        template: &MissionTemplate,
        units: &mut dyn UnitFactory,
        rng: &mut impl RngCore,
    ) -> Result<Mission> {
        generate_mission(
            self.database,
            self.theater,
            &self.config,
            template,
            units,
            rng,
            None,
        )
    }

    /// Builds a mission from `template`, reporting progress to `sink`.
    pub fn generate_with_events(
        &self,
        template: &MissionTemplate,
        units: &mut dyn UnitFactory,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Mission> {
        generate_mission(
            self.database,
            self.theater,
            &self.config,
            template,
            units,
            rng,
            Some(sink),
        )
    }
}

pub fn generate_mission<R: RngCore>(
    database: &Database,
    theater: &Theater,
    config: &AllocationConfig,
    template: &MissionTemplate,
    units: &mut dyn UnitFactory,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<Mission> {
    if let Some(s) = sink {
        generate_mission_with_events(database, theater, config, template, units, rng, s)
    } else {
        generate_mission_with_events(database, theater, config, template, units, rng, &mut ())
    }
}

/// Runs the objective pipeline for every objective of `template`, in order.
///
/// Each objective is separated from the previous one; the first is placed relative to
/// the player airbase. The build stops at the first failing objective.
pub fn generate_mission_with_events<R: RngCore>(
    database: &Database,
    theater: &Theater,
    config: &AllocationConfig,
    template: &MissionTemplate,
    units: &mut dyn UnitFactory,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<Mission> {
    template.validate()?;
    if sink.wants(GenerationEventKind::BuildStarted) {
        sink.send(GenerationEvent::BuildStarted {
            objective_count: template.objectives.len(),
        });
    }
    info!(
        "Generating mission with {} objective(s) from airbase {}.",
        template.objectives.len(),
        template.player_airbase
    );

    let mut mission = Mission::new();
    let mut generator =
        ObjectiveGenerator::new(database, theater, template, config.clone(), units, rng)?
            .with_sink(&mut *sink);
    let mut last_coordinates = generator.player_airbase().coordinates;
    for objective in &template.objectives {
        let outcome = generator
            .generate_objective(&mut mission, objective, last_coordinates)
            .inspect_err(|e| warn!("Mission generation aborted: {}", e))?;
        last_coordinates = outcome.coordinates;
    }
    let objective_count = generator.objective_count();
    drop(generator);

    info!(
        "Mission generated: {} objective(s), {} waypoint(s).",
        objective_count,
        mission.waypoints.len()
    );
    if sink.wants(GenerationEventKind::BuildFinished) {
        sink.send(GenerationEvent::BuildFinished {
            objective_count,
            waypoint_count: mission.waypoints.len(),
        });
    }
    Ok(mission)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::Error;
    use crate::events::VecSink;
    use crate::fixtures;
    use crate::geometry::{Coordinates, NM_TO_METERS};
    use crate::template::{ObjectiveTemplate, TaskTemplate};
    use crate::theater::{Coalition, ParkingSpotKind, SpawnPointType};
    use crate::units::SequentialUnitFactory;

    fn objective(target: &str, behavior: &str, task: &str) -> ObjectiveTemplate {
        ObjectiveTemplate::new(TaskTemplate::new(target, behavior, task))
    }

    #[test]
    fn builds_every_objective_in_order() {
        let database = fixtures::database();
        let theater = fixtures::theater();
        let generator = MissionGenerator::new(&database, &theater, AllocationConfig::default());
        let template = fixtures::template([
            objective("tanks", "Idle", "DestroyAll"),
            objective("factory", "Idle", "DestroyAll"),
            objective("infantry", "Patrol", "DestroyAll"),
        ]);
        let mut units = SequentialUnitFactory::new();
        let mut rng = StdRng::seed_from_u64(1);

        let mission = generator.generate(&template, &mut units, &mut rng).unwrap();
        assert_eq!(mission.objective_coordinates.len(), 3);
        assert_eq!(mission.waypoints.len(), 3);
        assert_eq!(units.created().len(), 3);
        for (i, c) in mission.objective_coordinates.iter().enumerate() {
            let d = c.distance(theater.airbases[0].coordinates);
            assert!(d >= 40.0 * NM_TO_METERS - 1e-6, "objective {i} too close");
        }
        let mut distinct = mission.objective_coordinates.clone();
        distinct.dedup();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let database = fixtures::database();
        let theater = fixtures::theater();
        let generator = MissionGenerator::new(&database, &theater, AllocationConfig::default());
        let template = fixtures::template([
            objective("tanks", "Patrol", "DestroyAll")
                .with_sub_task(TaskTemplate::new("infantry", "Idle", "DestroyAll")),
            objective("ships", "Idle", "DestroyAll"),
        ]);

        let build = |seed| {
            let mut units = SequentialUnitFactory::new();
            let mut rng = StdRng::seed_from_u64(seed);
            generator.generate(&template, &mut units, &mut rng).unwrap()
        };
        let (a, b) = (build(7), build(7));
        assert_eq!(a.waypoints, b.waypoints);
        assert_eq!(a.objective_coordinates, b.objective_coordinates);
        assert_eq!(a.scripts, b.scripts);
    }

    #[test]
    fn events_bracket_the_build() {
        let database = fixtures::database();
        let theater = fixtures::theater();
        let generator = MissionGenerator::new(&database, &theater, AllocationConfig::default());
        let template = fixtures::template([
            objective("tanks", "Idle", "DestroyAll")
                .with_sub_task(TaskTemplate::new("tanks", "Idle", "DestroyAll")),
            objective("factory", "Idle", "DestroyAll"),
        ]);
        let mut units = SequentialUnitFactory::new();
        let mut rng = StdRng::seed_from_u64(2);
        let mut sink = VecSink::new();

        generator
            .generate_with_events(&template, &mut units, &mut rng, &mut sink)
            .unwrap();
        let events = sink.as_slice();
        assert!(matches!(
            events.first(),
            Some(GenerationEvent::BuildStarted { objective_count: 2 })
        ));
        assert!(matches!(
            events.last(),
            Some(GenerationEvent::BuildFinished {
                objective_count: 3,
                waypoint_count: 3
            })
        ));
        assert_eq!(sink.count(GenerationEventKind::ObjectiveFinished), 3);
    }

    #[test]
    fn first_failure_aborts_the_build() {
        let database = fixtures::database();
        let theater = fixtures::theater();
        let generator = MissionGenerator::new(&database, &theater, AllocationConfig::default());
        let template = fixtures::template([
            objective("tanks", "Idle", "DestroyAll"),
            objective("tanks", "Idle", "NoSuchTask"),
            objective("factory", "Idle", "DestroyAll"),
        ]);
        let mut units = SequentialUnitFactory::new();
        let mut rng = StdRng::seed_from_u64(3);

        let err = generator
            .generate(&template, &mut units, &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::ReferenceNotFound { kind: "task", .. }));
        assert_eq!(units.created().len(), 1);
    }

    #[test]
    fn empty_template_is_invalid() {
        let database = fixtures::database();
        let theater = fixtures::theater();
        let generator = MissionGenerator::new(&database, &theater, AllocationConfig::default());
        let template = fixtures::template(Vec::<ObjectiveTemplate>::new());
        let mut rng = StdRng::seed_from_u64(4);
        let err = generator
            .generate(&template, &mut SequentialUnitFactory::new(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn builds_do_not_share_allocations() {
        let database = fixtures::database();
        let mut theater = Theater::new("single-point");
        theater.airbases = vec![fixtures::airbase(
            fixtures::HOME,
            Coordinates::ZERO,
            Coalition::Blue,
            &[ParkingSpotKind::OpenAir],
        )];
        theater.legacy_spawn_points = vec![fixtures::point(
            fixtures::nm(50.0, 0.0),
            SpawnPointType::LandMedium,
            Coalition::Red,
        )];
        let generator = MissionGenerator::new(&database, &theater, AllocationConfig::default());
        let template = fixtures::template([objective("tanks", "Idle", "DestroyAll")]);

        for seed in [5, 6] {
            let mut rng = StdRng::seed_from_u64(seed);
            let mission = generator
                .generate(&template, &mut SequentialUnitFactory::new(), &mut rng)
                .unwrap();
            assert_eq!(mission.objective_coordinates, vec![fixtures::nm(50.0, 0.0)]);
        }
    }
}
