//! Stage merge engine
//!
//! Merges one stage of a fragment into the same stage of a base document.
//! Base attributes win over fragment attributes, and a step id that is
//! already present is never replaced: the first writer wins. Fragment steps
//! are appended after the existing ones in their original order.

use crate::core::{layout::NodePath, workflow::WorkflowDocument};
use std::collections::HashSet;
use tracing::{debug, info};

/// What a single stage merge changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Merged stage
    pub stage: String,

    /// The stage did not exist in the base document and was appended
    pub created: bool,

    /// Number of fragment steps appended
    pub appended_steps: usize,

    /// Fragment step ids dropped because the id already existed
    pub skipped_ids: Vec<String>,

    /// Fragment attribute keys copied onto the base stage
    pub adopted_attributes: Vec<String>,
}

impl MergeReport {
    fn new(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
            ..Default::default()
        }
    }

    /// Whether the merge modified the base document
    pub fn changed(&self) -> bool {
        self.created || self.appended_steps > 0 || !self.adopted_attributes.is_empty()
    }
}

/// Merge `stage_name` of `fragment` into `base`
pub fn merge_stage(
    base: &mut WorkflowDocument,
    stage_name: &str,
    fragment: &WorkflowDocument,
) -> MergeReport {
    let mut report = MergeReport::new(stage_name);

    let Some(incoming) = fragment.stage(stage_name) else {
        debug!("Fragment has no stage '{}', nothing to merge", stage_name);
        return report;
    };

    report.created = !base.stages().contains(stage_name);
    let mut current = base.get_stage(stage_name);
    let mut known_ids: HashSet<String> = current.step_ids().map(|id| id.into_owned()).collect();

    for (key, value) in &incoming.attributes {
        if current.attributes.contains_key(key) {
            continue;
        }
        if let Some(key) = key.as_str() {
            report.adopted_attributes.push(key.to_string());
        }
        current.attributes.insert(key.clone(), value.clone());
    }

    for step in &incoming.steps {
        if let Some(id) = step.id() {
            // Ids appended earlier in this batch count as existing too.
            if !known_ids.insert(id.to_string()) {
                report.skipped_ids.push(id.into_owned());
                continue;
            }
        }
        current.steps.push(step.clone());
        report.appended_steps += 1;
    }

    let position_is_new = report.created && !base.stages().is_empty();
    base.insert_stage(stage_name, current);

    if position_is_new {
        base.layout_mut().ensure_blank_before(NodePath::stage(stage_name));
    }
    if report.appended_steps > 0 {
        if let Some(next) = base.stages().next_after(stage_name).map(str::to_string) {
            base.layout_mut().ensure_blank_before(NodePath::stage(&next));
        }
    }

    if !report.skipped_ids.is_empty() {
        debug!(
            "Stage '{}': kept existing steps for id(s) {}",
            stage_name,
            report.skipped_ids.join(", ")
        );
    }
    info!(
        "Merged stage '{}': {} step(s) appended, {} duplicate(s) skipped",
        stage_name,
        report.appended_steps,
        report.skipped_ids.len()
    );

    report
}

/// Merge every stage `fragment` declares, in `order` first and then the
/// fragment's own order for stages `order` does not mention
pub fn merge_fragment(
    base: &mut WorkflowDocument,
    fragment: &WorkflowDocument,
    order: &[String],
) -> Vec<MergeReport> {
    let mut stage_names: Vec<String> = order
        .iter()
        .filter(|name| fragment.stages().contains(name))
        .cloned()
        .collect();
    for name in fragment.stages().names() {
        if !stage_names.iter().any(|n| n == name) {
            stage_names.push(name.to_string());
        }
    }

    stage_names
        .iter()
        .map(|name| merge_stage(base, name, fragment))
        .collect()
}
