//! Objective names, waypoints and their map overlays.
use std::collections::HashSet;

use rand::RngCore;

use crate::database::BehaviorLocation;
use crate::geometry::{Coordinates, MinMax, NM_TO_METERS};
use crate::mission::{Mission, Waypoint};
use crate::objectives::resolve::ResolvedTask;
use crate::options::ObjectiveOption;
use crate::sampling::random_index;

const CODE_NAMES: &[&str] = &[
    "ALPHA", "ANVIL", "BISON", "BRAVO", "CASTLE", "CHARLIE", "COBRA", "DAGGER", "DELTA",
    "ECHO", "FALCON", "FOXTROT", "GOLF", "GRANITE", "HAMMER", "HOTEL", "INDIA", "JAVELIN",
    "JULIET", "KILO", "LANCE", "LIMA", "MAGNET", "MIKE", "NOVEMBER", "ORCHARD", "OSCAR",
    "PAPA", "QUEBEC", "RAPIER", "ROMEO", "SIERRA", "TANGO", "THUNDER", "UNIFORM", "VICTOR",
    "WHISKEY", "XRAY", "YANKEE", "ZULU",
];

/// Jitter applied to waypoints of objectives with inaccurate waypoints, in nautical miles.
const INACCURATE_JITTER_NM: MinMax = MinMax { min: 3.0, max: 6.0 };
/// Radius of the marker drawn around a jittered waypoint, in nautical miles.
const INACCURATE_MARKER_NM: f64 = 6.0;
/// Radius of the marker drawn around transport waypoints, in meters.
const TRANSPORT_MARKER_M: f64 = 500.0;

/// Hands out unique objective names for one mission.
#[derive(Debug, Default, Clone)]
pub struct WaypointNameGenerator {
    used: HashSet<String>,
}

impl WaypointNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A random unused code name; once all are taken, names gain a numeric suffix.
    pub fn next_name(&mut self, rng: &mut dyn RngCore) -> String {
        let free: Vec<&str> = CODE_NAMES
            .iter()
            .copied()
            .filter(|n| !self.used.contains(*n))
            .collect();
        let name = if free.is_empty() {
            let base = CODE_NAMES[random_index(CODE_NAMES.len(), rng)];
            (2..)
                .map(|n| format!("{base} {n}"))
                .find(|candidate| !self.used.contains(candidate))
                .unwrap_or_else(|| base.to_string())
        } else {
            free[random_index(free.len(), rng)].to_string()
        };
        self.used.insert(name.clone());
        name
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }
}

/// Where an objective waypoint goes and what it refers to.
pub(crate) struct WaypointSite<'a> {
    pub coordinates: Coordinates,
    /// Farthest point the target group travels to; sizes patrol overlays.
    pub destination: Coordinates,
    pub name: &'a str,
    pub group_id: Option<u32>,
    pub script_ignore: bool,
}

impl<'a> WaypointSite<'a> {
    pub fn new(name: &'a str, coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            destination: coordinates,
            name,
            group_id: None,
            script_ignore: false,
        }
    }
}

/// Builds the waypoint for an objective (or its pickup point) and draws its overlay.
pub(crate) fn objective_waypoint(
    mission: &mut Mission,
    resolved: &ResolvedTask<'_>,
    site: WaypointSite<'_>,
    mark_waypoints: bool,
    rng: &mut dyn RngCore,
) -> Waypoint {
    let WaypointSite {
        coordinates,
        destination,
        name,
        group_id,
        script_ignore,
    } = site;
    let location = resolved.behavior.location;
    let transport = resolved.task.transport;
    let on_ground = !resolved.target.unit_category.is_aircraft() || location.is_air_on_ground();
    let zone = format!("Target Zone {name}");

    let mut waypoint_coordinates = coordinates;
    if resolved.options.contains(ObjectiveOption::InaccurateWaypoint)
        && (!transport || name.ends_with("Pickup"))
    {
        waypoint_coordinates = waypoint_coordinates
            + Coordinates::random_offset(INACCURATE_JITTER_NM.scaled(NM_TO_METERS), rng);
        if mark_waypoints {
            mission.add_circle(
                zone,
                waypoint_coordinates,
                INACCURATE_MARKER_NM * NM_TO_METERS,
            );
        }
    } else if transport {
        mission.add_circle(zone, waypoint_coordinates, TRANSPORT_MARKER_M);
    } else if location == BehaviorLocation::Patrolling {
        mission.add_circle(zone, waypoint_coordinates, destination.distance(coordinates));
    }

    Waypoint {
        name: name.to_string(),
        coordinates: waypoint_coordinates,
        on_ground,
        group_id,
        script_ignore,
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::fixtures;
    use crate::mission::DrawingShape;
    use crate::options::ObjectiveOptions;

    #[test]
    fn names_are_unique() {
        let mut names = WaypointNameGenerator::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        for _ in 0..(CODE_NAMES.len() * 2) {
            assert!(seen.insert(names.next_name(&mut rng)));
        }
        names.reset();
        assert!(CODE_NAMES.contains(&names.next_name(&mut rng).as_str()));
    }

    #[test]
    fn inaccurate_waypoint_is_jittered_and_marked() {
        let database = fixtures::database();
        let mut resolved = fixtures::resolved(&database, "tanks", "Idle", "DestroyAll");
        resolved.options = ObjectiveOptions::new([ObjectiveOption::InaccurateWaypoint]);
        let mut mission = Mission::new();
        let mut rng = StdRng::seed_from_u64(2);
        let origin = Coordinates::new(1_000.0, 1_000.0);
        let site = WaypointSite {
            group_id: Some(1),
            ..WaypointSite::new("ALPHA", origin)
        };
        let wp = objective_waypoint(&mut mission, &resolved, site, true, &mut rng);
        let d = wp.coordinates.distance(origin);
        assert!(d >= 3.0 * NM_TO_METERS - 1e-6 && d <= 6.0 * NM_TO_METERS + 1e-6);
        assert!(wp.on_ground);
        assert_eq!(
            mission.drawings[0].shape,
            DrawingShape::Circle {
                radius: 6.0 * NM_TO_METERS
            }
        );
    }

    #[test]
    fn patrol_circle_uses_destination_distance() {
        let database = fixtures::database();
        let resolved = fixtures::resolved(&database, "tanks", "Patrol", "DestroyAll");
        let mut mission = Mission::new();
        let mut rng = StdRng::seed_from_u64(3);
        let site = WaypointSite {
            destination: Coordinates::new(3_000.0, 4_000.0),
            ..WaypointSite::new("BRAVO", Coordinates::ZERO)
        };
        let wp = objective_waypoint(&mut mission, &resolved, site, false, &mut rng);
        assert_eq!(wp.coordinates, Coordinates::ZERO);
        assert_eq!(mission.drawings[0].name, "Target Zone BRAVO");
        assert_eq!(
            mission.drawings[0].shape,
            DrawingShape::Circle { radius: 5_000.0 }
        );
    }

    #[test]
    fn transport_waypoint_gets_fixed_circle() {
        let database = fixtures::database();
        let resolved = fixtures::resolved(&database, "infantry", "Idle", "TransportTroops");
        let mut mission = Mission::new();
        let mut rng = StdRng::seed_from_u64(4);
        let site = WaypointSite {
            script_ignore: true,
            ..WaypointSite::new("CHARLIE Pickup", Coordinates::ZERO)
        };
        let wp = objective_waypoint(&mut mission, &resolved, site, false, &mut rng);
        assert!(wp.script_ignore);
        assert_eq!(
            mission.drawings[0].shape,
            DrawingShape::Circle { radius: 500.0 }
        );
    }
}
