use mission_forge::prelude::*;
use mission_forge_examples::{demo_database, demo_theater, init_tracing};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let theater = demo_theater();
    let database = demo_database();

    // Two strikes and a troop transport, the second objective anchored near a hint.
    let template = MissionTemplate::new(Coalition::Blue, 1)
        .with_objective_distance(MinMax::new(50.0, 90.0))
        .with_objective_separation(MinMax::new(10.0, 25.0))
        .with_options(MissionOptions {
            mark_waypoints: true,
            ..Default::default()
        })
        .with_objective(
            ObjectiveTemplate::new(
                TaskTemplate::new("Armor", "Patrol", "DestroyAll")
                    .with_target_count(TargetCount::High),
            )
            .with_features(["TargetLaser"])
            .with_sub_task(TaskTemplate::from_preset("SEAD")),
        )
        .with_objective(
            ObjectiveTemplate::new(
                TaskTemplate::new("Factory", "Idle", "DestroyAll")
                    .with_options(vec![ObjectiveOption::EmbeddedAirDefense]),
            )
            .with_hint(Coordinates::new(90.0 * NM_TO_METERS, 10.0 * NM_TO_METERS)),
        )
        .with_objective(ObjectiveTemplate::new(TaskTemplate::new(
            "Troops",
            "Idle",
            "TransportTroops",
        )));

    let generator = MissionGenerator::new(&database, &theater, AllocationConfig::default());
    let mut units = SequentialUnitFactory::new();
    let mut rng = StdRng::seed_from_u64(2025);
    let mission = generator.generate(&template, &mut units, &mut rng)?;
    tracing::info!(
        "Mission ready: {} group(s), {} waypoint(s).",
        mission.groups.len(),
        mission.waypoints.len()
    );

    println!("{}", serde_json::to_string_pretty(&mission)?);
    Ok(())
}
