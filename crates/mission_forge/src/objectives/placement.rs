//! Where objective groups spawn and where they head to.
use tracing::warn;

use crate::allocation::SpawnRequest;
use crate::database::{BehaviorLocation, ScriptCategory, UnitCategory, UnitFamily};
use crate::error::{Error, Result};
use crate::events::{GenerationEvent, GenerationEventKind};
use crate::geometry::{Coordinates, MinMax, ANY_RANGE, HINT_RANGE, NM_TO_METERS};
use crate::mission::Mission;
use crate::objectives::resolve::ResolvedTask;
use crate::objectives::ObjectiveGenerator;
use crate::sampling::pick;
use crate::theater::{AircraftSpec, Airbase, Side};
use crate::units::{GroupRequest, GroupSettings};

/// Behavior that moves transport cargo to a fresh spawn point instead of an airbase.
pub const RELOCATE_BEHAVIOR: &str = "RelocateToNewPosition";

/// Distance from a static target to its embedded air defense group, in meters.
const EMBEDDED_AIR_DEFENSE_OFFSET: MinMax = MinMax {
    min: 100.0,
    max: 500.0,
};
const EMBEDDED_AIR_DEFENSE_UNITS: u32 = 2;

/// Movement vector length, in nautical miles, by what is moving.
fn destination_range_nm(category: UnitCategory, family: UnitFamily) -> MinMax {
    match category {
        UnitCategory::Plane => MinMax::new(30.0, 60.0),
        UnitCategory::Helicopter => MinMax::new(10.0, 20.0),
        _ if matches!(family, UnitFamily::Infantry | UnitFamily::InfantryMANPADS) => {
            MinMax::new(1.0, 5.0)
        }
        _ => MinMax::new(5.0, 10.0),
    }
}

/// Script profile for aircraft sent against the player airbase.
fn attack_profile(family: UnitFamily) -> Option<&'static str> {
    match family {
        UnitFamily::PlaneAttack
        | UnitFamily::PlaneBomber
        | UnitFamily::PlaneStrike
        | UnitFamily::HelicopterAttack => Some("AircraftBomb"),
        UnitFamily::PlaneFighter | UnitFamily::PlaneInterceptor => Some("AircraftCAP"),
        _ => None,
    }
}

impl<'a> ObjectiveGenerator<'a, '_> {
    /// Allocates the anchor of a main objective.
    ///
    /// With a hint the anchor may lie anywhere but must be close to the hint; otherwise it
    /// respects the mission's distance from the player airbase and separation from
    /// `last_coordinates`.
    pub(super) fn spawn_anchor(
        &mut self,
        resolved: &ResolvedTask<'a>,
        last_coordinates: Coordinates,
        hint: Option<Coordinates>,
    ) -> Result<Coordinates> {
        let (secondary, distance, separation) = match hint {
            Some(hint) => (hint, ANY_RANGE, HINT_RANGE),
            None => (
                last_coordinates,
                self.template.objective_distance,
                self.template.objective_separation,
            ),
        };
        let request = SpawnRequest::new(
            resolved.spawn_types()?,
            self.player_airbase.coordinates,
            distance.scaled(NM_TO_METERS),
        )
        .with_secondary(secondary, separation.scaled(NM_TO_METERS))
        .with_coalition(self.template.spawn_point_coalition(Side::Enemy, false));

        let anchor = self
            .allocator
            .allocate(&request, self.rng)
            .ok_or_else(|| Error::exhausted("objective spawn point", request.to_string()))?;
        let index = self.next_index;
        self.allocated(index, "objective anchor", anchor);
        Ok(anchor)
    }

    /// Takes the free spawn point nearest to the parent objective for a sub-task.
    pub(super) fn nearest_anchor(
        &mut self,
        resolved: &ResolvedTask<'a>,
        parent: Coordinates,
    ) -> Result<Coordinates> {
        let types = resolved.spawn_types()?;
        let anchor = self
            .allocator
            .allocate_nearest(&types, parent, true, self.rng)
            .ok_or_else(|| {
                Error::exhausted(
                    "sub-task spawn point",
                    format!(
                        "types {:?}, nearest to ({:.0}, {:.0})",
                        types.as_slice(),
                        parent.x,
                        parent.y
                    ),
                )
            })?;
        let index = self.next_index;
        self.allocated(index, "sub-task anchor", anchor);
        Ok(anchor)
    }

    /// Parks the group at the enemy airbase closest to `anchor` that has room for it.
    ///
    /// Airbases are tried in order of distance; the first with enough compatible spots
    /// wins. Returns the position of one of the reserved spots.
    pub(super) fn place_in_airbase(
        &mut self,
        resolved: &ResolvedTask<'a>,
        index: usize,
        anchor: Coordinates,
        count: u32,
        family: UnitFamily,
        settings: &mut GroupSettings,
    ) -> Result<Coordinates> {
        let theater = self.allocator.theater();
        let options = self.template.options;
        let enemy = self.template.player_coalition.enemy();
        let mut airbases: Vec<&Airbase> = theater
            .airbases
            .iter()
            .filter(|a| a.id != self.player_airbase.id)
            .filter(|a| {
                options.spawn_anywhere
                    || a.coalition_for(options.invert_countries_coalitions) == enemy
            })
            .collect();
        airbases.sort_by(|a, b| {
            a.coordinates
                .distance(anchor)
                .total_cmp(&b.coordinates.distance(anchor))
        });

        let require_open_air =
            resolved.behavior.location == BehaviorLocation::SpawnOnAirbaseParkingNoHardenedShelter;
        let aircraft = family.aircraft_spec();
        for airbase in airbases {
            let Some(spots) = self.allocator.allocate_parking(
                airbase.id,
                count as usize,
                &aircraft,
                require_open_air,
                self.rng,
            ) else {
                continue;
            };
            let Some(spot) = pick(&spots, self.rng).copied() else {
                continue;
            };
            settings.airbase_id = Some(airbase.id);
            settings.parking = spots;
            self.allocated(index, &format!("parking at {}", airbase.name), spot.coordinates);
            return Ok(spot.coordinates);
        }

        Err(Error::exhausted(
            format!("{count} parking spot(s)"),
            format!(
                "{family} at enemy airbases near ({:.0}, {:.0}){}",
                anchor.x,
                anchor.y,
                if require_open_air { ", open air only" } else { "" }
            ),
        ))
    }

    /// Destination and group script of the target group.
    ///
    /// Groups normally get a movement vector of a category-dependent length; vehicle
    /// groups snap it to the nearest spawn point without taking it. Behaviors heading to
    /// an airbase replace the destination.
    pub(super) fn movement(
        &mut self,
        mission: &mut Mission,
        resolved: &ResolvedTask<'a>,
        family: UnitFamily,
        origin: Coordinates,
        settings: &mut GroupSettings,
    ) -> Result<(Coordinates, &'a str)> {
        let range = destination_range_nm(resolved.target.unit_category, family);
        let mut destination =
            origin + Coordinates::random_offset(range.scaled(NM_TO_METERS), self.rng);
        if resolved.script_category() == ScriptCategory::Vehicle {
            let snapped = resolved.spawn_types().ok().and_then(|types| {
                self.allocator
                    .allocate_nearest(&types, destination, false, self.rng)
            });
            match snapped {
                Some(point) => destination = point,
                None => warn!(
                    "No spawn point near destination ({:.0}, {:.0}), keeping raw offset.",
                    destination.x, destination.y
                ),
            }
        }

        let mut group_script = resolved.group_script();
        match resolved.behavior.location {
            BehaviorLocation::GoToPlayerAirbase => {
                destination = self.player_destination();
                if family.category().is_aircraft() {
                    if let Some(profile) = attack_profile(family) {
                        group_script = profile;
                    }
                }
            }
            BehaviorLocation::GoToAirbase => {
                destination = self.destination_airbase(mission, resolved, destination, settings)?;
            }
            _ => {}
        }
        Ok((destination, group_script))
    }

    /// A random parking spot of the player airbase, or the airbase itself.
    fn player_destination(&mut self) -> Coordinates {
        let airbase = self.player_airbase;
        if airbase.parking_spots.len() > 1 {
            if let Some(spot) = pick(&airbase.parking_spots, self.rng) {
                return spot.coordinates;
            }
        }
        airbase.coordinates
    }

    /// Nearest airbase of the target's coalition to `destination`, registered as the
    /// group's landing airbase.
    fn destination_airbase(
        &mut self,
        mission: &mut Mission,
        resolved: &ResolvedTask<'a>,
        destination: Coordinates,
        settings: &mut GroupSettings,
    ) -> Result<Coordinates> {
        let coalition = self.template.side_coalition(resolved.task.target_side);
        let invert = self.template.options.invert_countries_coalitions;
        let airbase = self
            .allocator
            .theater()
            .airbases
            .iter()
            .filter(|a| a.coalition_for(invert) == coalition)
            .min_by(|a, b| {
                a.coordinates
                    .distance(destination)
                    .total_cmp(&b.coordinates.distance(destination))
            })
            .ok_or_else(|| {
                Error::exhausted("destination airbase", format!("no {coalition} airbase"))
            })?;
        settings.end_airbase_id = Some(airbase.id);
        mission.add_populated_airbase(coalition, airbase.id);
        Ok(airbase.coordinates)
    }

    /// Where transport cargo waits to be picked up.
    ///
    /// Relocation cargo takes a fresh ally spawn point within the separation range of the
    /// objective; other cargo sits on a helicopter spot at the ally airbase closest to the
    /// player airbase.
    pub(super) fn transport_pickup(
        &mut self,
        resolved: &ResolvedTask<'a>,
        anchor: Coordinates,
        index: usize,
    ) -> Result<Coordinates> {
        let pickup = if resolved.behavior.id == RELOCATE_BEHAVIOR {
            let request = SpawnRequest::new(
                resolved.spawn_types()?,
                anchor,
                self.template.objective_separation.scaled(NM_TO_METERS),
            )
            .with_coalition(self.template.spawn_point_coalition(Side::Ally, false));
            self.allocator
                .allocate(&request, self.rng)
                .ok_or_else(|| Error::exhausted("cargo spawn point", request.to_string()))?
        } else {
            let coalition = self.template.side_coalition(Side::Ally);
            let (_, spots) = self
                .allocator
                .allocate_parking_near(
                    self.player_airbase.coordinates,
                    coalition,
                    self.template.options.invert_countries_coalitions,
                    1,
                    &AircraftSpec::HELICOPTER,
                    self.rng,
                )
                .ok_or_else(|| {
                    Error::exhausted(
                        "cargo parking spot",
                        format!("helicopter spot at a {coalition} airbase"),
                    )
                })?;
            spots
                .first()
                .map(|s| s.coordinates)
                .ok_or_else(|| Error::exhausted("cargo parking spot", "empty reservation"))?
        };
        self.allocated(index, "cargo pickup", pickup);
        Ok(pickup)
    }

    /// Adds a separate AAA group next to a static target.
    pub(super) fn add_embedded_air_defense(
        &mut self,
        mission: &mut Mission,
        target_request: &GroupRequest,
        anchor: Coordinates,
    ) {
        let request = GroupRequest {
            family: UnitFamily::VehicleAAA,
            count: EMBEDDED_AIR_DEFENSE_UNITS,
            coordinates: anchor.random_near(EMBEDDED_AIR_DEFENSE_OFFSET, self.rng),
            ..target_request.clone()
        };
        match self.units.create_group(&request) {
            Some(group) => mission.groups.push(group),
            None => warn!("Embedded air defense group could not be created."),
        }
    }

    fn allocated(&mut self, index: usize, what: &str, coordinates: Coordinates) {
        self.emit(GenerationEventKind::Allocated, || GenerationEvent::Allocated {
            index,
            what: what.to_string(),
            coordinates,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_ranges_by_category() {
        let plane = destination_range_nm(UnitCategory::Plane, UnitFamily::PlaneFighter);
        assert_eq!((plane.min, plane.max), (30.0, 60.0));
        let helo = destination_range_nm(UnitCategory::Helicopter, UnitFamily::HelicopterAttack);
        assert_eq!((helo.min, helo.max), (10.0, 20.0));
        let troops = destination_range_nm(UnitCategory::Infantry, UnitFamily::InfantryMANPADS);
        assert_eq!((troops.min, troops.max), (1.0, 5.0));
        let tanks = destination_range_nm(UnitCategory::Vehicle, UnitFamily::VehicleMBT);
        assert_eq!((tanks.min, tanks.max), (5.0, 10.0));
    }

    #[test]
    fn attack_profiles() {
        assert_eq!(attack_profile(UnitFamily::PlaneStrike), Some("AircraftBomb"));
        assert_eq!(attack_profile(UnitFamily::HelicopterAttack), Some("AircraftBomb"));
        assert_eq!(attack_profile(UnitFamily::PlaneInterceptor), Some("AircraftCAP"));
        assert_eq!(attack_profile(UnitFamily::PlaneTransport), None);
    }
}
