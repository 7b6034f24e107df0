//! The mission aggregate filled in by the objective pipeline.
//!
//! Scripts are named, append-only text buffers; map data and drawings are keyed overlays;
//! briefing entries keep their insertion order.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::database::UnitFamily;
use crate::geometry::Coordinates;
use crate::theater::{AirbaseId, Coalition};
use crate::units::GroupInfo;

/// Objective tables and F10 menu entries.
pub const SCRIPT_OBJECTIVES: &str = "ScriptObjectives";
/// Completion trigger fragments.
pub const SCRIPT_OBJECTIVES_TRIGGERS: &str = "ScriptObjectivesTriggers";
/// Objective feature fragments.
pub const SCRIPT_OBJECTIVES_FEATURES: &str = "ScriptObjectivesFeatures";

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BriefingItemKind {
    Task,
    Remark,
    TargetGroupName,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BriefingItem {
    pub kind: BriefingItemKind,
    pub text: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawingShape {
    Circle { radius: f64 },
}

/// Map overlay shown to players.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Drawing {
    pub name: String,
    pub center: Coordinates,
    pub shape: DrawingShape,
}

/// A file bundled into the mission archive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaFile {
    /// Path inside the mission archive.
    pub archive_path: String,
    /// Name of the source file in the media include directory.
    pub source: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub name: String,
    pub coordinates: Coordinates,
    pub on_ground: bool,
    /// Target group the waypoint points at, if any.
    pub group_id: Option<u32>,
    /// Excluded from objective scripting (pickup waypoints).
    pub script_ignore: bool,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct Mission {
    pub briefing: Vec<BriefingItem>,
    pub scripts: BTreeMap<String, String>,
    pub map_data: BTreeMap<String, Vec<[f64; 2]>>,
    pub drawings: Vec<Drawing>,
    pub media_files: Vec<MediaFile>,
    pub waypoints: Vec<Waypoint>,
    pub objective_coordinates: Vec<Coordinates>,
    pub objective_target_families: Vec<UnitFamily>,
    pub populated_airbase_ids: BTreeMap<Coalition, Vec<AirbaseId>>,
    pub groups: Vec<GroupInfo>,
}

impl Mission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_briefing(&mut self, kind: BriefingItemKind, text: impl Into<String>) {
        self.briefing.push(BriefingItem {
            kind,
            text: text.into(),
        });
    }

    /// Briefing texts of one kind, in insertion order.
    pub fn briefing_items(&self, kind: BriefingItemKind) -> impl Iterator<Item = &str> {
        self.briefing
            .iter()
            .filter(move |item| item.kind == kind)
            .map(|item| item.text.as_str())
    }

    /// Appends `text` to the script named `name`, creating it if needed.
    pub fn append_script(&mut self, name: &str, text: &str) {
        self.scripts.entry(name.to_string()).or_default().push_str(text);
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }

    pub fn add_map_data(&mut self, name: impl Into<String>, points: Vec<Coordinates>) {
        self.map_data
            .insert(name.into(), points.iter().map(Coordinates::to_array).collect());
    }

    pub fn add_circle(&mut self, name: impl Into<String>, center: Coordinates, radius: f64) {
        self.drawings.push(Drawing {
            name: name.into(),
            center,
            shape: DrawingShape::Circle { radius },
        });
    }

    /// Registers a media file; a second file with the same archive path is ignored.
    pub fn add_media_file(&mut self, archive_path: impl Into<String>, source: impl Into<String>) {
        let archive_path = archive_path.into();
        if self.media_files.iter().any(|m| m.archive_path == archive_path) {
            return;
        }
        self.media_files.push(MediaFile {
            archive_path,
            source: source.into(),
        });
    }

    pub fn add_populated_airbase(&mut self, coalition: Coalition, airbase_id: AirbaseId) {
        let ids = self.populated_airbase_ids.entry(coalition).or_default();
        if !ids.contains(&airbase_id) {
            ids.push(airbase_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_append_in_order() {
        let mut mission = Mission::new();
        mission.append_script(SCRIPT_OBJECTIVES, "a\n");
        mission.append_script(SCRIPT_OBJECTIVES, "b\n");
        mission.append_script(SCRIPT_OBJECTIVES_FEATURES, "");
        assert_eq!(mission.script(SCRIPT_OBJECTIVES), Some("a\nb\n"));
        assert_eq!(mission.script(SCRIPT_OBJECTIVES_FEATURES), Some(""));
        assert_eq!(mission.script("missing"), None);
    }

    #[test]
    fn media_files_are_deduplicated() {
        let mut mission = Mission::new();
        mission.add_media_file("l10n/DEFAULT/radio.ogg", "radio.ogg");
        mission.add_media_file("l10n/DEFAULT/radio.ogg", "radio.ogg");
        assert_eq!(mission.media_files.len(), 1);
    }

    #[test]
    fn briefing_items_filter_by_kind() {
        let mut mission = Mission::new();
        mission.add_briefing(BriefingItemKind::Task, "Destroy");
        mission.add_briefing(BriefingItemKind::Remark, "Careful");
        mission.add_briefing(BriefingItemKind::Task, "Escort");
        let tasks: Vec<_> = mission.briefing_items(BriefingItemKind::Task).collect();
        assert_eq!(tasks, vec!["Destroy", "Escort"]);
    }

    #[test]
    fn populated_airbases_are_unique_per_coalition() {
        let mut mission = Mission::new();
        mission.add_populated_airbase(Coalition::Red, 4);
        mission.add_populated_airbase(Coalition::Red, 4);
        mission.add_populated_airbase(Coalition::Blue, 4);
        assert_eq!(mission.populated_airbase_ids[&Coalition::Red], vec![4]);
        assert_eq!(mission.populated_airbase_ids[&Coalition::Blue], vec![4]);
    }

    #[test]
    fn map_data_stores_coordinate_pairs() {
        let mut mission = Mission::new();
        mission.add_map_data("OBJECTIVE_AREA_0", vec![Coordinates::new(1.0, 2.0)]);
        assert_eq!(mission.map_data["OBJECTIVE_AREA_0"], vec![[1.0, 2.0]]);
    }
}
