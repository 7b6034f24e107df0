//! Objective generation pipeline.
//!
//! An [`ObjectiveGenerator`] turns one [`ObjectiveTemplate`] (and its sub-tasks) into
//! mission content:
//!
//! 1. resolve records (or a preset) and check the task fits the target category;
//! 2. validate sub-task structure before anything is allocated;
//! 3. allocate the anchor (hint or distance/separation from the previous objective);
//! 4. place, route and create the target group through the [`UnitFactory`];
//! 5. record waypoints, briefing text, scripts and map data on the [`Mission`];
//! 6. anchor each sub-task at the nearest free spawn point to its parent.
//!
//! An objective either completes or fails the build; consumed spawn points are never
//! returned to the pool.
use rand::RngCore;
use tracing::{debug, info};

use crate::allocation::{AllocationConfig, SpawnAllocator};
use crate::database::{Database, UnitCategory};
use crate::error::{Error, Result};
use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::geometry::{Coordinates, MinMax};
use crate::mission::{BriefingItemKind, Mission, Waypoint};
use crate::options::ObjectiveOption;
use crate::template::{MissionTemplate, ObjectiveTemplate};
use crate::theater::{mixes_land_and_sea, Airbase, SpawnPointType, Theater};
use crate::units::{EmbarkZone, GroupRequest, GroupSettings, UnitFactory};

pub mod briefing;
mod placement;
pub mod resolve;
pub mod waypoints;

use briefing::ObjectiveText;
use resolve::{objective_features, resolve_task, union, unit_data, ResolvedTask, UnitData};
pub use waypoints::WaypointNameGenerator;
use waypoints::{objective_waypoint, WaypointSite};

/// Behavior whose scripts keep unescorted transport cargo in place.
pub const IDLE_BEHAVIOR: &str = "Idle";

/// Distance from the pickup point to an infantry embark zone, in meters.
const EMBARK_OFFSET: MinMax = MinMax {
    min: 5.0,
    max: 50.0,
};
const EMBARK_RADIUS: f64 = 500.0;

/// Result of generating one objective with its sub-tasks.
#[derive(Debug, Clone)]
pub struct ObjectiveOutcome {
    /// Final coordinates of the main objective; the next objective is separated from it.
    pub coordinates: Coordinates,
    /// Waypoints of the objective and its sub-tasks, in flight order.
    pub waypoints: Vec<Waypoint>,
    /// Objective indices used, counting sub-tasks.
    pub indices: std::ops::Range<usize>,
}

/// Generates objectives for one mission build.
///
/// Owns the build's [`SpawnAllocator`]; everything else is borrowed.
pub struct ObjectiveGenerator<'a, 'b> {
    database: &'a Database,
    template: &'a MissionTemplate,
    player_airbase: &'a Airbase,
    allocator: SpawnAllocator<'a>,
    names: WaypointNameGenerator,
    units: &'b mut dyn UnitFactory,
    rng: &'b mut dyn RngCore,
    sink: Option<&'b mut dyn EventSink>,
    next_index: usize,
}

impl<'a, 'b> ObjectiveGenerator<'a, 'b> {
    /// Creates a generator with fresh allocation pools over `theater`.
    ///
    /// Fails if the template's player airbase is not part of the theater.
    pub fn new(
        database: &'a Database,
        theater: &'a Theater,
        template: &'a MissionTemplate,
        config: AllocationConfig,
        units: &'b mut dyn UnitFactory,
        rng: &'b mut dyn RngCore,
    ) -> Result<Self> {
        config.validate()?;
        let player_airbase = theater.require_airbase(template.player_airbase)?;
        Ok(Self {
            database,
            template,
            player_airbase,
            allocator: SpawnAllocator::new(theater, config),
            names: WaypointNameGenerator::new(),
            units,
            rng,
            sink: None,
            next_index: 0,
        })
    }

    pub fn with_sink(mut self, sink: &'b mut dyn EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn allocator(&self) -> &SpawnAllocator<'a> {
        &self.allocator
    }

    pub fn player_airbase(&self) -> &'a Airbase {
        self.player_airbase
    }

    /// Number of objectives generated so far, counting sub-tasks.
    pub fn objective_count(&self) -> usize {
        self.next_index
    }

    /// Generates `objective` and its sub-tasks.
    ///
    /// `last_coordinates` is the previous objective (or the player airbase for the first
    /// one); the anchor is kept within the mission's separation range from it.
    pub fn generate_objective(
        &mut self,
        mission: &mut Mission,
        objective: &ObjectiveTemplate,
        last_coordinates: Coordinates,
    ) -> Result<ObjectiveOutcome> {
        let first_index = self.next_index;
        let parent = resolve_task(self.database, &objective.task, self.rng)?;
        let features = objective_features(parent.preset, &objective.features);
        let sub_tasks = objective
            .sub_tasks
            .iter()
            .map(|t| resolve_task(self.database, t, self.rng))
            .collect::<Result<Vec<_>>>()?;
        check_sub_tasks(&parent, &sub_tasks)?;

        let anchor = self.spawn_anchor(&parent, last_coordinates, objective.hint())?;
        let mut waypoints = Vec::new();
        let coordinates =
            self.create_objective(mission, &parent, &features, anchor, false, &mut waypoints)?;

        for sub_task in &sub_tasks {
            let sub_anchor = self.nearest_anchor(sub_task, coordinates)?;
            self.create_objective(
                mission,
                sub_task,
                &features,
                sub_anchor,
                true,
                &mut waypoints,
            )?;
        }

        Ok(ObjectiveOutcome {
            coordinates,
            waypoints,
            indices: first_index..self.next_index,
        })
    }

    /// Creates the target group of one objective or sub-task and records its mission
    /// content. Returns the final objective coordinates.
    fn create_objective(
        &mut self,
        mission: &mut Mission,
        resolved: &ResolvedTask<'a>,
        features: &[String],
        anchor: Coordinates,
        sub_task: bool,
        waypoints: &mut Vec<Waypoint>,
    ) -> Result<Coordinates> {
        let index = self.next_index;
        self.next_index += 1;
        info!(
            "Generating objective #{} ({}, target {}).",
            index + 1,
            resolved.task.id,
            resolved.target.id
        );
        self.emit(GenerationEventKind::ObjectiveStarted, || {
            GenerationEvent::ObjectiveStarted {
                index,
                task: resolved.task.id.clone(),
                sub_task,
            }
        });

        let UnitData {
            family,
            count,
            mut flags,
        } = unit_data(resolved, self.rng)?;
        if count == 0 {
            return Err(Error::GroupCreationFailed(format!(
                "no units requested for {family} in objective #{}",
                index + 1
            )));
        }

        let location = resolved.behavior.location;
        let category = resolved.target.unit_category;
        let side = resolved.task.target_side;
        let mark_waypoints = self.template.options.mark_waypoints;
        let mut objective_coordinates = anchor;
        let mut settings = GroupSettings::default();

        if location.is_airbase() && category.is_aircraft() {
            objective_coordinates = self.place_in_airbase(
                resolved,
                index,
                objective_coordinates,
                count,
                family,
                &mut settings,
            )?;
        }

        let (destination, group_script) =
            self.movement(mission, resolved, family, objective_coordinates, &mut settings)?;
        let mut destination = Some(destination);
        let mut group_script = group_script.to_string();

        let name = self.names.next_name(self.rng);
        let mut unit_coordinates = objective_coordinates;
        let mut pickup = None;
        let mut reversed = false;
        if resolved.task.transport {
            unit_coordinates = self.transport_pickup(resolved, objective_coordinates, index)?;
            if resolved.behavior.id.starts_with("RecoverToBase") {
                std::mem::swap(&mut unit_coordinates, &mut objective_coordinates);
                reversed = true;
            }
            let pickup_name = format!("{name} Pickup");
            let site = WaypointSite {
                script_ignore: true,
                ..WaypointSite::new(&pickup_name, unit_coordinates)
            };
            pickup = Some(objective_waypoint(
                mission,
                resolved,
                site,
                mark_waypoints,
                self.rng,
            ));

            if resolved.task.escort {
                destination = Some(objective_coordinates);
                flags.radio_aircraft_spawn = true;
            } else {
                destination = None;
                let idle = self.database.behaviors.require(IDLE_BEHAVIOR)?;
                group_script = idle.group_scripts.get(resolved.script_category()).to_string();
            }
        }

        if family.category().is_aircraft()
            && !flags.radio_aircraft_spawn
            && !location.is_air_on_ground()
        {
            flags.immediate_aircraft_spawn = true;
        }

        settings.destination = destination;
        settings.unlimited_fuel = category.is_aircraft();
        settings.late_activation = category.is_aircraft()
            && !flags.immediate_aircraft_spawn
            && !(self.template.options.scramble_start && !resolved.task.transport);
        if category == UnitCategory::Infantry && resolved.task.transport {
            settings.embark_zone = Some(EmbarkZone {
                coordinates: unit_coordinates.random_near(EMBARK_OFFSET, self.rng),
                radius: EMBARK_RADIUS,
            });
        }

        let request = GroupRequest {
            family,
            count,
            side,
            flags,
            coordinates: unit_coordinates,
            group_script,
            unit_script: resolved.unit_script().to_string(),
            settings,
        };
        let mut group = self
            .units
            .create_group(&request)
            .filter(|g| !g.unit_names.is_empty())
            .ok_or_else(|| {
                Error::GroupCreationFailed(format!(
                    "no group created for {count} x {family} at objective {name}"
                ))
            })?;

        if resolved.options.contains(ObjectiveOption::EmbeddedAirDefense)
            && category == UnitCategory::Static
        {
            self.add_embedded_air_defense(mission, &request, objective_coordinates);
        }

        let suffix = format!("-TGT-{name}");
        group.apply_name_suffix(&suffix);
        mission.add_briefing(BriefingItemKind::TargetGroupName, suffix);

        let length = if family.category() == UnitCategory::Static {
            group.groups.len()
        } else {
            group.unit_names.len()
        };
        let text = ObjectiveText {
            index,
            name: &name,
            family,
            plural: length != 1,
            group: &group,
        };
        let task_string = briefing::add_task_string(mission, resolved.task, &text, self.rng);
        briefing::add_objective_script(
            mission,
            self.template.player_coalition,
            resolved.target,
            resolved.task,
            &text,
            &task_string,
        );
        briefing::add_remark(mission, resolved.task, &text, self.rng);
        briefing::add_media_files(mission, &resolved.task.include_ogg);

        let feature_ids = union(&resolved.task.required_features, features);
        let skipped = briefing::add_features(
            mission,
            self.database,
            &feature_ids,
            side,
            resolved.options.contains(ObjectiveOption::HideTarget),
            &text,
        );
        for id in skipped {
            self.emit(GenerationEventKind::Warning, || GenerationEvent::Warning {
                context: name.clone(),
                message: format!("feature '{id}' not found"),
            });
        }

        mission.objective_coordinates.push(if reversed {
            unit_coordinates
        } else {
            objective_coordinates
        });
        let site = WaypointSite {
            destination: group.furthest_route_point(objective_coordinates),
            group_id: Some(group.group_id),
            ..WaypointSite::new(&name, objective_coordinates)
        };
        let waypoint = objective_waypoint(mission, resolved, site, mark_waypoints, self.rng);
        mission.add_map_data(format!("OBJECTIVE_AREA_{index}"), vec![waypoint.coordinates]);
        mission.objective_target_families.push(family);
        if !group.aircraft {
            mission.add_map_data(
                format!("UNIT-{}-{}-{}", group.family, side, group.group_id),
                vec![group.coordinates],
            );
        }

        let ordered = match pickup {
            Some(pickup) if reversed => vec![waypoint, pickup],
            Some(pickup) => vec![pickup, waypoint],
            None => vec![waypoint],
        };
        mission.waypoints.extend(ordered.iter().cloned());
        waypoints.extend(ordered);

        debug!("Objective {} uses group {}.", name, group.name);
        mission.groups.push(group);
        self.emit(GenerationEventKind::ObjectiveFinished, || {
            GenerationEvent::ObjectiveFinished {
                index,
                name: name.clone(),
                family,
                coordinates: objective_coordinates,
            }
        });
        Ok(objective_coordinates)
    }

    fn emit(&mut self, kind: GenerationEventKind, event: impl FnOnce() -> GenerationEvent) {
        if let Some(sink) = self.sink.as_deref_mut() {
            if sink.wants(kind) {
                sink.send(event());
            }
        }
    }
}

/// Structural rules between an objective and its sub-tasks, checked before any
/// allocation.
fn check_sub_tasks(parent: &ResolvedTask<'_>, sub_tasks: &[ResolvedTask<'_>]) -> Result<()> {
    let mut types: Vec<SpawnPointType> = parent.target.valid_spawn_points.clone();
    if mixes_land_and_sea(&types) {
        return Err(Error::ConstraintViolation(format!(
            "target '{}' mixes land and sea spawn points",
            parent.target.id
        )));
    }
    for sub_task in sub_tasks {
        types.extend_from_slice(&sub_task.target.valid_spawn_points);
        if mixes_land_and_sea(&types) {
            return Err(Error::ConstraintViolation(format!(
                "cannot mix land and sea objectives (sub-task target '{}')",
                sub_task.target.id
            )));
        }
        if sub_task.behavior.location.is_airbase() && !parent.behavior.location.is_airbase() {
            return Err(Error::ConstraintViolation(format!(
                "sub-task behavior '{}' spawns on an airbase but the main objective does not",
                sub_task.behavior.id
            )));
        }
    }
    Ok(())
}
