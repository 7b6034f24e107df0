//! Objective option flags and their resolution into unit group flags.
//!
//! Options are independent except for visibility: `ShowTarget` and `HideTarget` force a
//! visibility that replaces, rather than combines with, the `Invisible` option.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectiveOption {
    Invisible,
    ShowTarget,
    HideTarget,
    EmbeddedAirDefense,
    InaccurateWaypoint,
}

/// Map visibility override for a unit group.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Default,
    AlwaysShown,
    AlwaysHidden,
}

/// Modifiers passed to the unit-creation collaborator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupFlags {
    pub invisible: bool,
    pub visibility: Visibility,
    pub embedded_air_defense: bool,
    pub immediate_aircraft_spawn: bool,
    pub radio_aircraft_spawn: bool,
}

/// Options attached to one objective instance.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectiveOptions {
    options: Vec<ObjectiveOption>,
}

impl ObjectiveOptions {
    pub fn new(options: impl IntoIterator<Item = ObjectiveOption>) -> Self {
        let mut collected = Vec::new();
        for o in options {
            if !collected.contains(&o) {
                collected.push(o);
            }
        }
        Self { options: collected }
    }

    pub fn contains(&self, option: ObjectiveOption) -> bool {
        self.options.contains(&option)
    }

    pub fn as_slice(&self) -> &[ObjectiveOption] {
        &self.options
    }

    /// Visibility forced by the options, with `ShowTarget` taking precedence.
    pub fn visibility(&self) -> Visibility {
        if self.contains(ObjectiveOption::ShowTarget) {
            Visibility::AlwaysShown
        } else if self.contains(ObjectiveOption::HideTarget) {
            Visibility::AlwaysHidden
        } else {
            Visibility::Default
        }
    }

    pub fn group_flags(&self) -> GroupFlags {
        resolve_group_flags(self)
    }
}

impl From<Vec<ObjectiveOption>> for ObjectiveOptions {
    fn from(value: Vec<ObjectiveOption>) -> Self {
        ObjectiveOptions::new(value)
    }
}

/// Resolves objective options into group flags.
///
/// A forced visibility drops `Invisible`; embedded air defense always applies.
pub fn resolve_group_flags(options: &ObjectiveOptions) -> GroupFlags {
    let visibility = options.visibility();
    GroupFlags {
        invisible: visibility == Visibility::Default
            && options.contains(ObjectiveOption::Invisible),
        visibility,
        embedded_air_defense: options.contains(ObjectiveOption::EmbeddedAirDefense),
        immediate_aircraft_spawn: false,
        radio_aircraft_spawn: false,
    }
}
