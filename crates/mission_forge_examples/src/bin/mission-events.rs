use mission_forge::prelude::*;
use mission_forge_examples::{demo_database, demo_theater, init_tracing};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let theater = demo_theater();
    let database = demo_database();

    // Parked aircraft at the nearest red airbase, then a naval strike.
    let template = MissionTemplate::new(Coalition::Blue, 1)
        .with_objective(ObjectiveTemplate::new(TaskTemplate::new(
            "ParkedStrike",
            "Parked",
            "DestroyAll",
        )))
        .with_objective(ObjectiveTemplate::new(TaskTemplate::new(
            "Frigates",
            "Patrol",
            "DestroyAll",
        )));

    // One sink for finished objectives, one for every allocation the build made.
    let mut sink = MultiSink::with_sinks(vec![
        VecSink::filtered([GenerationEventKind::ObjectiveFinished]),
        VecSink::filtered([
            GenerationEventKind::Allocated,
            GenerationEventKind::Warning,
        ]),
    ]);

    let generator = MissionGenerator::new(&database, &theater, AllocationConfig::default());
    let mut units = SequentialUnitFactory::new();
    let mut rng = StdRng::seed_from_u64(7);
    let mission = generator.generate_with_events(&template, &mut units, &mut rng, &mut sink)?;

    let [objectives, allocations]: [VecSink; 2] = sink
        .into_inner()
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected two sinks"))?;
    for event in objectives.as_slice() {
        if let GenerationEvent::ObjectiveFinished {
            index,
            name,
            family,
            coordinates,
        } = event
        {
            println!(
                "objective #{} {name}: {family} at ({:.0}, {:.0})",
                index + 1,
                coordinates.x,
                coordinates.y
            );
        }
    }
    println!("{} allocation event(s):", allocations.len());
    for event in allocations.as_slice() {
        println!("  {event:?}");
    }
    println!("{}", serde_json::to_string_pretty(&mission.waypoints)?);
    Ok(())
}
