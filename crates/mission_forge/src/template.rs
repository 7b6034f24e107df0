//! Declarative mission template: mission-wide settings and the objective tree.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Coordinates, MinMax};
use crate::options::ObjectiveOptions;
use crate::theater::{AirbaseId, Coalition, Side};

/// Requested target strength; indexes the target's unit count table.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TargetCount {
    Single,
    Low,
    #[default]
    Average,
    High,
    VeryHigh,
}

impl TargetCount {
    pub fn index(self) -> usize {
        match self {
            TargetCount::Single => 0,
            TargetCount::Low => 1,
            TargetCount::Average => 2,
            TargetCount::High => 3,
            TargetCount::VeryHigh => 4,
        }
    }
}

/// One task entry: either explicit target/behavior/task ids or a preset id.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskTemplate {
    pub target: String,
    pub behavior: String,
    pub task: String,
    /// When set and found, replaces target, behavior, task and options.
    pub preset: Option<String>,
    pub options: ObjectiveOptions,
    pub target_count: TargetCount,
    /// Overrides the target's unit count range.
    pub unit_count: Option<u32>,
}

impl TaskTemplate {
    pub fn new(
        target: impl Into<String>,
        behavior: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            behavior: behavior.into(),
            task: task.into(),
            ..Default::default()
        }
    }

    pub fn from_preset(preset: impl Into<String>) -> Self {
        Self {
            preset: Some(preset.into()),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: impl Into<ObjectiveOptions>) -> Self {
        self.options = options.into();
        self
    }

    pub fn with_target_count(mut self, target_count: TargetCount) -> Self {
        self.target_count = target_count;
        self
    }

    pub fn with_unit_count(mut self, unit_count: u32) -> Self {
        self.unit_count = Some(unit_count);
        self
    }
}

/// Top-level objective with optional hint, extra features and nested sub-tasks.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectiveTemplate {
    pub task: TaskTemplate,
    pub features: Vec<String>,
    pub coordinates_hint: Option<Coordinates>,
    pub sub_tasks: Vec<TaskTemplate>,
}

impl ObjectiveTemplate {
    pub fn new(task: TaskTemplate) -> Self {
        Self {
            task,
            ..Default::default()
        }
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hint(mut self, hint: Coordinates) -> Self {
        self.coordinates_hint = Some(hint);
        self
    }

    pub fn with_sub_task(mut self, sub_task: TaskTemplate) -> Self {
        self.sub_tasks.push(sub_task);
        self
    }

    /// The hint, ignoring an all-zero placeholder.
    pub fn hint(&self) -> Option<Coordinates> {
        self.coordinates_hint.filter(|c| !c.is_zero())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MissionOptions {
    pub invert_countries_coalitions: bool,
    pub spawn_anywhere: bool,
    pub mark_waypoints: bool,
    pub scramble_start: bool,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct MissionTemplate {
    pub player_coalition: Coalition,
    pub player_airbase: AirbaseId,
    /// Distance from the player airbase to objectives, in nautical miles.
    pub objective_distance: MinMax,
    /// Separation between consecutive objectives, in nautical miles.
    pub objective_separation: MinMax,
    pub options: MissionOptions,
    pub objectives: Vec<ObjectiveTemplate>,
}

impl MissionTemplate {
    pub fn new(player_coalition: Coalition, player_airbase: AirbaseId) -> Self {
        Self {
            player_coalition,
            player_airbase,
            objective_distance: MinMax::new(40.0, 80.0),
            objective_separation: MinMax::new(10.0, 30.0),
            options: MissionOptions::default(),
            objectives: Vec::new(),
        }
    }

    pub fn with_objective_distance(mut self, distance_nm: MinMax) -> Self {
        self.objective_distance = distance_nm;
        self
    }

    pub fn with_objective_separation(mut self, separation_nm: MinMax) -> Self {
        self.objective_separation = separation_nm;
        self
    }

    pub fn with_options(mut self, options: MissionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_objective(mut self, objective: ObjectiveTemplate) -> Self {
        self.objectives.push(objective);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.objectives.is_empty() {
            return Err(Error::InvalidConfig(
                "mission template has no objectives".into(),
            ));
        }
        for (name, range) in [
            ("objective_distance", self.objective_distance),
            ("objective_separation", self.objective_separation),
        ] {
            if !range.is_ordered() || range.min < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite, non-negative and ordered min <= max"
                )));
            }
        }
        Ok(())
    }

    /// Coalition whose territory spawn points for `side` must respect.
    ///
    /// Spawn-anywhere disables the restriction unless `force` is set.
    pub fn spawn_point_coalition(&self, side: Side, force: bool) -> Option<Coalition> {
        if self.options.spawn_anywhere && !force {
            return None;
        }
        Some(self.side_coalition(side))
    }

    /// Coalition of `side`, flipped when countries and coalitions are inverted.
    pub fn side_coalition(&self, side: Side) -> Coalition {
        let coalition = match side {
            Side::Ally => self.player_coalition,
            Side::Enemy => self.player_coalition.enemy(),
        };
        if self.options.invert_countries_coalitions {
            coalition.enemy()
        } else {
            coalition
        }
    }
}
