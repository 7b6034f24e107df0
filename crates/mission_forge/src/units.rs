//! Unit-creation collaborator used by the objective pipeline.
//!
//! The pipeline decides *where* and *how* a target group spawns; a [`UnitFactory`]
//! materializes it. Returning `None` (or a group without units) aborts the objective.
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::allocation::ParkingAllocation;
use crate::database::{UnitCategory, UnitFamily};
use crate::geometry::Coordinates;
use crate::options::GroupFlags;
use crate::theater::{AirbaseId, Side};

/// Zone an infantry group moves to when boarding a transport.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmbarkZone {
    pub coordinates: Coordinates,
    pub radius: f64,
}

/// Per-group placement and behavior settings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupSettings {
    /// Movement target; `None` keeps the group stationary.
    pub destination: Option<Coordinates>,
    /// Airbase the group is parked at.
    pub airbase_id: Option<AirbaseId>,
    /// Reserved parking spots, one per unit.
    pub parking: Vec<ParkingAllocation>,
    /// Airbase the group lands at when its route ends.
    pub end_airbase_id: Option<AirbaseId>,
    pub unlimited_fuel: bool,
    pub late_activation: bool,
    pub embark_zone: Option<EmbarkZone>,
}

/// Everything a [`UnitFactory`] needs to create one group.
#[derive(Clone, Debug)]
pub struct GroupRequest {
    pub family: UnitFamily,
    pub count: u32,
    pub side: Side,
    pub flags: GroupFlags,
    pub coordinates: Coordinates,
    /// Movement script template id.
    pub group_script: String,
    /// Per-unit script template id.
    pub unit_script: String,
    pub settings: GroupSettings,
}

/// Name records of one created group.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct GroupRecord {
    pub name: String,
    pub unit_names: Vec<String>,
}

/// Descriptor of a created group.
///
/// Static families produce one [`GroupRecord`] per unit; every other family produces a
/// single record holding all units.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct GroupInfo {
    pub group_id: u32,
    pub name: String,
    pub coordinates: Coordinates,
    pub unit_names: Vec<String>,
    pub groups: Vec<GroupRecord>,
    /// Route points, starting at the spawn position.
    pub route: Vec<Coordinates>,
    pub aircraft: bool,
    pub family: UnitFamily,
}

impl GroupInfo {
    /// Appends `suffix` to every group name and, for statics, every unit name.
    ///
    /// The first group receives the bare suffix, later ones are prefixed by their index.
    pub fn apply_name_suffix(&mut self, suffix: &str) {
        let rename_units = self.family.category() == UnitCategory::Static;
        for (i, group) in self.groups.iter_mut().enumerate() {
            let tag = if i == 0 {
                suffix.to_string()
            } else {
                format!("{i}{suffix}")
            };
            group.name.push_str(&tag);
            if rename_units {
                for unit in &mut group.unit_names {
                    unit.push_str(&tag);
                }
            }
        }
        if let Some(first) = self.groups.first() {
            self.name = first.name.clone();
        }
        if rename_units {
            self.unit_names = self
                .groups
                .iter()
                .flat_map(|g| g.unit_names.iter().cloned())
                .collect();
        }
    }

    /// Route point farthest from `origin`, or `origin` itself if none is farther.
    pub fn furthest_route_point(&self, origin: Coordinates) -> Coordinates {
        self.route.iter().fold(origin, |furthest, &p| {
            if origin.distance(p) > origin.distance(furthest) {
                p
            } else {
                furthest
            }
        })
    }
}

/// Materializes unit groups for the pipeline.
pub trait UnitFactory {
    fn create_group(&mut self, request: &GroupRequest) -> Option<GroupInfo>;
}

/// Deterministic factory naming groups and units by sequential ids.
#[derive(Debug, Clone)]
pub struct SequentialUnitFactory {
    next_group_id: u32,
    next_unit_id: u32,
    created: Vec<GroupRequest>,
}

impl Default for SequentialUnitFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialUnitFactory {
    pub fn new() -> Self {
        Self {
            next_group_id: 1,
            next_unit_id: 1,
            created: Vec::new(),
        }
    }

    /// Requests that produced a group, in creation order.
    pub fn created(&self) -> &[GroupRequest] {
        &self.created
    }

    fn unit_name(&mut self, family: UnitFamily) -> String {
        let name = format!("{family} unit #{}", self.next_unit_id);
        self.next_unit_id += 1;
        name
    }
}

impl UnitFactory for SequentialUnitFactory {
    fn create_group(&mut self, request: &GroupRequest) -> Option<GroupInfo> {
        if request.count == 0 {
            return None;
        }

        let group_id = self.next_group_id;
        self.next_group_id += 1;
        let base = format!("{} {} group #{}", request.side, request.family, group_id);

        let groups: Vec<GroupRecord> = if request.family.category() == UnitCategory::Static {
            (0..request.count)
                .map(|i| GroupRecord {
                    name: format!("{base}.{}", i + 1),
                    unit_names: vec![self.unit_name(request.family)],
                })
                .collect()
        } else {
            let unit_names = (0..request.count)
                .map(|_| self.unit_name(request.family))
                .collect();
            vec![GroupRecord {
                name: base.clone(),
                unit_names,
            }]
        };

        let mut route = vec![request.coordinates];
        route.extend(request.settings.destination);

        let info = GroupInfo {
            group_id,
            name: groups
                .first()
                .map_or_else(|| base.clone(), |g| g.name.clone()),
            coordinates: request.coordinates,
            unit_names: groups
                .iter()
                .flat_map(|g| g.unit_names.iter().cloned())
                .collect(),
            groups,
            route,
            aircraft: request.family.category().is_aircraft(),
            family: request.family,
        };
        debug!(
            "Created group {} with {} unit(s).",
            info.name,
            info.unit_names.len()
        );
        self.created.push(request.clone());
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(family: UnitFamily, count: u32) -> GroupRequest {
        GroupRequest {
            family,
            count,
            side: Side::Enemy,
            flags: GroupFlags::default(),
            coordinates: Coordinates::new(100.0, 0.0),
            group_script: "GroundIdle".into(),
            unit_script: "GroundUnit".into(),
            settings: GroupSettings {
                destination: Some(Coordinates::new(5_000.0, 0.0)),
                ..GroupSettings::default()
            },
        }
    }

    #[test]
    fn zero_units_fail() {
        let mut factory = SequentialUnitFactory::new();
        assert!(factory
            .create_group(&request(UnitFamily::VehicleMBT, 0))
            .is_none());
        assert!(factory.created().is_empty());
    }

    #[test]
    fn statics_get_one_group_per_unit() {
        let mut factory = SequentialUnitFactory::new();
        let info = factory
            .create_group(&request(UnitFamily::StaticStructureMilitary, 3))
            .unwrap();
        assert_eq!(info.groups.len(), 3);
        assert_eq!(info.unit_names.len(), 3);
        assert!(!info.aircraft);
    }

    #[test]
    fn ids_are_sequential_and_route_includes_destination() {
        let mut factory = SequentialUnitFactory::new();
        let a = factory
            .create_group(&request(UnitFamily::VehicleMBT, 4))
            .unwrap();
        let b = factory
            .create_group(&request(UnitFamily::PlaneFighter, 2))
            .unwrap();
        assert_eq!(a.group_id, 1);
        assert_eq!(b.group_id, 2);
        assert_eq!(a.groups.len(), 1);
        assert_eq!(a.route.len(), 2);
        assert!(b.aircraft);
    }

    #[test]
    fn suffix_applies_to_groups_and_static_units() {
        let mut factory = SequentialUnitFactory::new();
        let mut statics = factory
            .create_group(&request(UnitFamily::StaticStructureProduction, 2))
            .unwrap();
        statics.apply_name_suffix("-TGT-ALPHA");
        assert!(statics.groups[0].name.ends_with("-TGT-ALPHA"));
        assert!(statics.groups[1].name.ends_with("1-TGT-ALPHA"));
        assert!(statics.unit_names.iter().all(|u| u.contains("-TGT-ALPHA")));
        assert_eq!(statics.name, statics.groups[0].name);

        let mut tanks = factory
            .create_group(&request(UnitFamily::VehicleMBT, 2))
            .unwrap();
        tanks.apply_name_suffix("-TGT-BRAVO");
        assert!(tanks.name.ends_with("-TGT-BRAVO"));
        assert!(tanks.unit_names.iter().all(|u| !u.contains("-TGT-")));
    }

    #[test]
    fn furthest_route_point_defaults_to_origin() {
        let mut factory = SequentialUnitFactory::new();
        let mut info = factory
            .create_group(&request(UnitFamily::VehicleMBT, 1))
            .unwrap();
        assert_eq!(
            info.furthest_route_point(Coordinates::new(100.0, 0.0)),
            Coordinates::new(5_000.0, 0.0)
        );
        info.route.clear();
        let origin = Coordinates::new(7.0, 7.0);
        assert_eq!(info.furthest_route_point(origin), origin);
    }
}
