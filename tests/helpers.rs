//! Test utility functions for workflow-synth
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use workflow_synth::core::config::Landscape;
use workflow_synth::core::WorkflowDocument;
use workflow_synth::synthesis::{PipelineSynthesizer, SynthesisOutcome};

/// Landscape with a base environment and a dev environment bound to develop/main
pub const LANDSCAPE: &str = r#"
cicd: github
environments:
  base:
    stages: [build]
  dev:
    match_event: push
    match_branch: refs/heads/(develop|main)
    stages: [local-test, deploy]
"#;

/// First module fragment: re-declares the checkout step and adds an init step
pub const FRAGMENT_INIT: &str = r#"name: Terraform

jobs:
  deploy:
    steps:
      - id: checkout-code
        uses: actions/checkout@v4
      - id: build-1
        name: Terraform Init
        run: terraform init
"#;

/// Second module fragment: collides on build-1 and adds an apply step
pub const FRAGMENT_APPLY: &str = r#"jobs:
  deploy:
    steps:
      - id: build-1
        name: Terraform Init (second module)
        run: terraform init -upgrade
      - id: apply
        run: terraform apply -auto-approve
"#;

/// Write `contents` to `dir/name`
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn landscape() -> Landscape {
    Landscape::from_yaml(LANDSCAPE).expect("test landscape should be valid")
}

/// Parse fragments from YAML text
pub fn fragments(texts: &[&str]) -> Vec<WorkflowDocument> {
    texts
        .iter()
        .map(|text| WorkflowDocument::from_yaml("fragment.yml", text).expect("fragment should parse"))
        .collect()
}

/// Run the synthesizer for `landscape` into `workflows_root`
pub fn synthesize(
    landscape: &Landscape,
    workflows_root: &Path,
    fragment_texts: &[&str],
) -> Vec<SynthesisOutcome> {
    PipelineSynthesizer::new(landscape, workflows_root)
        .synthesize(&fragments(fragment_texts))
        .expect("synthesis should succeed")
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// Step ids of a stage, empty string for steps without one
pub fn step_ids(doc: &WorkflowDocument, stage: &str) -> Vec<String> {
    doc.stage(stage)
        .unwrap_or_else(|| panic!("stage '{}' should exist", stage))
        .steps
        .iter()
        .map(|step| step.id().map(|id| id.into_owned()).unwrap_or_default())
        .collect()
}

/// Assert each stage needs the one declared before it
pub fn assert_needs_chain(doc: &WorkflowDocument, stages: &[&str]) {
    assert_eq!(doc.stage_names(), stages);
    for (index, stage) in stages.iter().enumerate() {
        let needs = doc.stage(stage).unwrap().needs();
        if index == 0 {
            assert_eq!(needs, None, "first stage '{}' should not need anything", stage);
        } else {
            assert_eq!(needs, Some(stages[index - 1]), "stage '{}' needs the previous stage", stage);
        }
    }
}
