//! Test: per-environment skeletons and triggers

use crate::helpers::*;
use serde_yaml::Value;
use workflow_synth::core::config::{EnvironmentConfig, Landscape};
use workflow_synth::core::WorkflowDocument;

#[test]
fn test_stage_chain() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = Landscape::default()
        .with_environment("qa", EnvironmentConfig::default().with_stages(["a", "b", "c"]));
    synthesize(&landscape, dir.path(), &[]);

    let doc = WorkflowDocument::load(dir.path().join("workflow-qa.yml")).unwrap();
    assert_needs_chain(&doc, &["a", "b", "c"]);
}

#[test]
fn test_base_environment_is_unbound() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = landscape();
    synthesize(&landscape, dir.path(), &[]);

    let text = read(&dir.path().join("workflow-base.yml"));
    assert!(text.starts_with("name: Workflow\n"));
    assert!(!text.contains("environment:"));

    let doc = WorkflowDocument::load(dir.path().join("workflow-base.yml")).unwrap();
    let push = &doc.trigger.as_ref().unwrap()["push"];
    assert_eq!(push["branches"].as_str(), Some("**"));
    assert_eq!(push["tags"].as_str(), Some("*"));
    assert!(text.contains("  push:\n    branches: '**'\n    tags: '*'\n"));
}

#[test]
fn test_release_environment() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = Landscape::from_yaml(
        r#"
cicd: github
environments:
  prd:
    match_event: release
    runs_on: self-hosted
    stages: [deploy]
"#,
    )
    .unwrap();
    synthesize(&landscape, dir.path(), &[]);

    let doc = WorkflowDocument::load(dir.path().join("workflow-prd.yml")).unwrap();
    let trigger = doc.trigger.as_ref().and_then(Value::as_mapping).unwrap();
    assert_eq!(trigger.get("release"), Some(&Value::Null));

    let deploy = doc.stage("deploy").unwrap();
    assert_eq!(deploy.attribute("runs-on").and_then(Value::as_str), Some("self-hosted"));
    assert_eq!(deploy.attribute("environment").and_then(Value::as_str), Some("prd"));
}

#[test]
fn test_execution_flags_follow_step_count() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = landscape();
    synthesize(&landscape, dir.path(), &[FRAGMENT_INIT]);

    let doc = WorkflowDocument::load(dir.path().join("workflow-dev.yml")).unwrap();
    assert_eq!(doc.stage("local-test").unwrap().enabled(), Some(false));
    assert_eq!(doc.stage("deploy").unwrap().enabled(), Some(true));
}

#[test]
fn test_custom_workflows_root_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested/.github/workflows");
    let landscape = landscape();
    let outcomes = synthesize(&landscape, &root, &[]);

    let files: Vec<_> = outcomes
        .iter()
        .map(|o| o.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(files, vec!["workflow-base.yml", "workflow-dev.yml"]);
    assert!(root.join("workflow-dev.yml").is_file());
}
