//! Briefing text and objective script fragments.
use rand::RngCore;
use tracing::warn;

use crate::database::{Database, ObjectiveTarget, ObjectiveTask, UnitFamily};
use crate::mission::{
    BriefingItemKind, Mission, SCRIPT_OBJECTIVES, SCRIPT_OBJECTIVES_FEATURES,
    SCRIPT_OBJECTIVES_TRIGGERS,
};
use crate::sampling::pick;
use crate::theater::{Coalition, Side};
use crate::units::GroupInfo;

const DEFAULT_TASK: &str = "Complete objective $OBJECTIVENAME$";

/// Replaces every `$KEY$` placeholder (key upper-cased) in `text`.
pub fn replace_key(text: &str, key: &str, value: impl ToString) -> String {
    text.replace(&format!("${}$", key.to_uppercase()), &value.to_string())
}

/// Resolves `{a|b|c}` groups to one randomly chosen alternative each.
///
/// Unbalanced braces are left untouched.
pub fn parse_random_string(text: &str, rng: &mut dyn RngCore) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let Some(len) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        let choices: Vec<&str> = rest[open + 1..open + len].split('|').collect();
        if let Some(choice) = pick(&choices, rng) {
            out.push_str(choice);
        }
        rest = &rest[open + len + 1..];
    }
    out.push_str(rest);
    out
}

/// Values substituted into an objective's text fragments.
pub(crate) struct ObjectiveText<'a> {
    pub index: usize,
    pub name: &'a str,
    pub family: UnitFamily,
    pub plural: bool,
    pub group: &'a GroupInfo,
}

impl ObjectiveText<'_> {
    fn family_name(&self) -> &'static str {
        self.family.display_name(self.plural)
    }

    fn suffix(&self) -> String {
        format!("-TGT-{}", self.name)
    }
}

/// Builds the briefing task line, adds it to the mission and returns it.
pub(crate) fn add_task_string(
    mission: &mut Mission,
    task: &ObjectiveTask,
    text: &ObjectiveText<'_>,
    rng: &mut dyn RngCore,
) -> String {
    let template = &task.briefing_task[usize::from(text.plural)];
    let mut task_string = parse_random_string(template, rng).replace('"', "''");
    if task_string.is_empty() {
        task_string = DEFAULT_TASK.to_string();
    }
    let task_string = replace_key(&task_string, "ObjectiveName", text.name);
    let task_string = replace_key(&task_string, "UnitFamily", text.family_name());
    mission.add_briefing(BriefingItemKind::Task, task_string.clone());
    task_string
}

/// Appends the objective table, its F10 menu entry and its completion triggers.
pub(crate) fn add_objective_script(
    mission: &mut Mission,
    player_coalition: Coalition,
    target: &ObjectiveTarget,
    task: &ObjectiveTask,
    text: &ObjectiveText<'_>,
    task_string: &str,
) {
    let lua_index = text.index + 1;
    let suffix = text.suffix();
    let mut lua = format!("briefingRoom.mission.objectives[{lua_index}] = {{ ");
    lua.push_str("complete = false, ");
    lua.push_str("failed = false, ");
    lua.push_str(&format!("groupName = \"{}\", ", text.group.name));
    lua.push_str("hideTargetCount = false, ");
    lua.push_str(&format!("name = \"{}\", ", text.name));
    lua.push_str(&format!(
        "targetCategory = Unit.Category.{}, ",
        target.unit_category.script_name()
    ));
    lua.push_str(&format!("taskType = \"{}\", ", task.id));
    lua.push_str(&format!("task = \"{task_string}\", "));
    lua.push_str(&format!(
        "unitsCount = #dcsExtensions.getUnitNamesByGroupNameSuffix(\"{suffix}\"), "
    ));
    lua.push_str(&format!(
        "unitNames = dcsExtensions.getUnitNamesByGroupNameSuffix(\"{suffix}\") "
    ));
    lua.push_str("}\n");
    lua.push_str(&format!(
        "briefingRoom.f10Menu.objectives[{lua_index}] = missionCommands.addSubMenuForCoalition(coalition.side.{}, \"$LANG_OBJECTIVE$ {}\", nil)\n",
        player_coalition.to_string().to_uppercase(),
        text.name
    ));
    mission.append_script(SCRIPT_OBJECTIVES, &lua);

    for trigger in &task.completion_triggers {
        mission.append_script(
            SCRIPT_OBJECTIVES_TRIGGERS,
            &replace_key(trigger, "ObjectiveIndex", lua_index),
        );
    }
}

/// Adds one remark drawn from the task's semicolon-delimited list, if it has any.
pub(crate) fn add_remark(
    mission: &mut Mission,
    task: &ObjectiveTask,
    text: &ObjectiveText<'_>,
    rng: &mut dyn RngCore,
) {
    if task.briefing_remarks.is_empty() {
        return;
    }
    let remarks: Vec<&str> = task.briefing_remarks.split(';').collect();
    let Some(remark) = pick(&remarks, rng) else {
        return;
    };
    let remark = replace_key(remark, "ObjectiveName", text.name);
    let remark = replace_key(&remark, "UnitFamily", text.family_name());
    mission.add_briefing(BriefingItemKind::Remark, remark);
}

pub(crate) fn add_media_files(mission: &mut Mission, files: &[String]) {
    for file in files {
        mission.add_media_file(format!("l10n/DEFAULT/{file}"), file.as_str());
    }
}

/// Expands every feature script once into the features script buffer.
///
/// Unknown feature ids are skipped with a warning.
pub(crate) fn add_features(
    mission: &mut Mission,
    database: &Database,
    feature_ids: &[String],
    side: Side,
    hide_target: bool,
    text: &ObjectiveText<'_>,
) -> Vec<String> {
    // Ensures the buffer exists even without features.
    mission.append_script(SCRIPT_OBJECTIVES_FEATURES, "");

    let mut skipped = Vec::new();
    for id in feature_ids {
        let Some(feature) = database.features.get(id) else {
            warn!("Objective feature '{}' not found, skipped.", id);
            skipped.push(id.clone());
            continue;
        };
        let unit_names = text
            .group
            .unit_names
            .iter()
            .map(|n| format!("\"{n}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let script = replace_key(&feature.script, "ObjectiveName", text.name);
        let script = replace_key(&script, "ObjectiveIndex", text.index + 1);
        let script = replace_key(&script, "GroupName", &text.group.name);
        let script = replace_key(&script, "GroupID", text.group.group_id);
        let script = replace_key(&script, "UnitNames", format!("{{ {unit_names} }}"));
        let script = replace_key(&script, "Side", side);
        let script = replace_key(&script, "HideTarget", hide_target);
        mission.append_script(SCRIPT_OBJECTIVES_FEATURES, &script);
        add_media_files(mission, &feature.include_ogg);
    }
    skipped
}
