//! Resolution of template entries into database records.
use rand::RngCore;

use crate::database::{
    Database, ObjectivePreset, ObjectiveTarget, ObjectiveTask, ScriptCategory, TargetBehavior,
    UnitFamily,
};
use crate::error::{Error, Result};
use crate::options::{GroupFlags, ObjectiveOptions};
use crate::sampling::pick;
use crate::template::{TargetCount, TaskTemplate};
use crate::theater::SpawnTypeSet;

/// Records and options one objective or sub-task was resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedTask<'a> {
    pub target: &'a ObjectiveTarget,
    pub behavior: &'a TargetBehavior,
    pub task: &'a ObjectiveTask,
    pub options: ObjectiveOptions,
    pub preset: Option<&'a ObjectivePreset>,
    pub target_count: TargetCount,
    pub unit_count: Option<u32>,
}

impl<'a> ResolvedTask<'a> {
    pub fn script_category(&self) -> ScriptCategory {
        self.target.unit_category.script_category()
    }

    pub fn group_script(&self) -> &'a str {
        self.behavior.group_scripts.get(self.script_category())
    }

    pub fn unit_script(&self) -> &'a str {
        self.behavior.unit_scripts.get(self.script_category())
    }

    /// The target's valid spawn point types as a validated set.
    pub fn spawn_types(&self) -> Result<SpawnTypeSet> {
        SpawnTypeSet::new(self.target.valid_spawn_points.iter().copied())
    }
}

/// Looks up the records named by `template`, expanding a preset if one is set.
///
/// A preset contributes one random target and behavior from its lists, its task and its
/// options. The task must accept the target's unit category.
pub fn resolve_task<'a>(
    database: &'a Database,
    template: &TaskTemplate,
    rng: &mut dyn RngCore,
) -> Result<ResolvedTask<'a>> {
    let resolved = match &template.preset {
        Some(preset_id) => {
            let preset = database.presets.require(preset_id)?;
            let target_id = pick(&preset.targets, rng).ok_or_else(|| {
                Error::not_found("target", format!("<any of preset {preset_id}>"))
            })?;
            let behavior_id = pick(&preset.behaviors, rng).ok_or_else(|| {
                Error::not_found("target behavior", format!("<any of preset {preset_id}>"))
            })?;
            ResolvedTask {
                target: database.targets.require(target_id)?,
                behavior: database.behaviors.require(behavior_id)?,
                task: database.tasks.require(&preset.task)?,
                options: ObjectiveOptions::new(preset.options.iter().copied()),
                preset: Some(preset),
                target_count: template.target_count,
                unit_count: template.unit_count,
            }
        }
        None => ResolvedTask {
            target: database.targets.require(&template.target)?,
            behavior: database.behaviors.require(&template.behavior)?,
            task: database.tasks.require(&template.task)?,
            options: template.options.clone(),
            preset: None,
            target_count: template.target_count,
            unit_count: template.unit_count,
        },
    };

    if !resolved
        .task
        .valid_unit_categories
        .contains(&resolved.target.unit_category)
    {
        return Err(Error::IncompatibleTask {
            task: resolved.task.id.clone(),
            category: resolved.target.unit_category.to_string(),
        });
    }
    Ok(resolved)
}

/// Objective-level feature ids: preset features first, then the template's, without
/// duplicates.
pub fn objective_features(
    preset: Option<&ObjectivePreset>,
    template_features: &[String],
) -> Vec<String> {
    let preset_features = preset.map(|p| p.features.as_slice()).unwrap_or_default();
    union(preset_features, template_features)
}

/// Order-preserving union of two id lists.
pub(crate) fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(first.len() + second.len());
    for id in first.iter().chain(second) {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}

/// Family, count and flags of the target group.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UnitData {
    pub family: UnitFamily,
    pub count: u32,
    pub flags: GroupFlags,
}

pub(crate) fn unit_data(resolved: &ResolvedTask<'_>, rng: &mut dyn RngCore) -> Result<UnitData> {
    let family = *pick(&resolved.target.unit_families, rng).ok_or_else(|| {
        Error::GroupCreationFailed(format!(
            "target '{}' lists no unit families",
            resolved.target.id
        ))
    })?;
    let count = match resolved.unit_count {
        Some(n) => n,
        None => resolved
            .target
            .unit_count(resolved.target_count)
            .random(rng),
    };
    Ok(UnitData {
        family,
        count,
        flags: resolved.options.group_flags(),
    })
}
