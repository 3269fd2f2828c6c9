//! Test: generated files are byte-stable

use crate::helpers::*;
use workflow_synth::core::config::EnvironmentConfig;
use workflow_synth::core::WorkflowDocument;

#[test]
fn test_fresh_generation_is_reproducible() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let landscape = landscape();

    synthesize(&landscape, first.path(), &[FRAGMENT_INIT]);
    synthesize(&landscape, second.path(), &[FRAGMENT_INIT]);

    for name in ["workflow-base.yml", "workflow-dev.yml"] {
        assert_eq!(read(&first.path().join(name)), read(&second.path().join(name)));
    }
}

#[test]
fn test_load_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = landscape();
    synthesize(&landscape, dir.path(), &[FRAGMENT_INIT, FRAGMENT_APPLY]);

    let path = dir.path().join("workflow-dev.yml");
    let before = read(&path);
    let mut doc = WorkflowDocument::load(&path).unwrap();
    doc.save().unwrap();
    assert_eq!(read(&path), before);
}

#[test]
fn test_rerun_over_existing_files_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = landscape();
    synthesize(&landscape, dir.path(), &[FRAGMENT_INIT, FRAGMENT_APPLY]);
    let before = read(&dir.path().join("workflow-dev.yml"));

    let outcomes = synthesize(&landscape, dir.path(), &[FRAGMENT_INIT, FRAGMENT_APPLY]);
    assert!(outcomes.iter().all(|o| o.appended_steps() == 0));
    assert_eq!(read(&dir.path().join("workflow-dev.yml")), before);
}

#[test]
fn test_skeleton_matches_its_reload() {
    let dir = tempfile::tempdir().unwrap();
    let env = EnvironmentConfig::default().with_stages(["plan", "apply"]);
    let path = dir.path().join("workflow-prd.yml");

    let synthesized = WorkflowDocument::synthesize(&path, None, "prd", &env).unwrap();
    let mut skeleton = WorkflowDocument::skeleton(&path, None, "prd", &env).unwrap();
    skeleton.refresh_execution_flags();

    assert_eq!(synthesized.to_yaml().unwrap(), skeleton.to_yaml().unwrap());
    assert_eq!(synthesized.to_yaml().unwrap(), read(&path));
}
