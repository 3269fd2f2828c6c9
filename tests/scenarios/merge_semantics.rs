//! Test: merging module fragments into an environment's deploy stage

use crate::helpers::*;
use serde_yaml::Value;
use workflow_synth::core::WorkflowDocument;

const EXPECTED_DEV: &str = r#"name: Workflow - dev

on:
  push:
    branches:
      - develop
      - main

jobs:
  local-test:
    if: false
    environment: dev
    runs-on: ubuntu-latest
    steps:
      - id: checkout-code
        uses: actions/checkout@v4

  deploy:
    if: true
    environment: dev
    runs-on: ubuntu-latest
    needs: local-test
    steps:
      - id: checkout-code
        uses: actions/checkout@v4
      - id: build-1
        name: Terraform Init
        run: terraform init
      - id: apply
        run: terraform apply -auto-approve
"#;

#[test]
fn test_two_fragments_into_dev() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = landscape();
    let outcomes = synthesize(&landscape, dir.path(), &[FRAGMENT_INIT, FRAGMENT_APPLY]);

    let dev = outcomes.iter().find(|o| o.environment == "dev").unwrap();
    assert_eq!(dev.appended_steps(), 2);
    assert_eq!(dev.skipped_ids(), 2);
    assert_eq!(read(&dev.path), EXPECTED_DEV);
}

#[test]
fn test_first_writer_keeps_original_step() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = landscape();
    synthesize(&landscape, dir.path(), &[FRAGMENT_INIT, FRAGMENT_APPLY]);

    let doc = WorkflowDocument::load(dir.path().join("workflow-dev.yml")).unwrap();
    assert_eq!(step_ids(&doc, "deploy"), vec!["checkout-code", "build-1", "apply"]);

    let build = &doc.stage("deploy").unwrap().steps[1];
    assert_eq!(build.payload().get("run").and_then(Value::as_str), Some("terraform init"));
}

#[test]
fn test_fragment_order_decides_the_winner() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = landscape();
    synthesize(&landscape, dir.path(), &[FRAGMENT_APPLY, FRAGMENT_INIT]);

    let doc = WorkflowDocument::load(dir.path().join("workflow-dev.yml")).unwrap();
    assert_eq!(step_ids(&doc, "deploy"), vec!["checkout-code", "build-1", "apply"]);
    let build = &doc.stage("deploy").unwrap().steps[1];
    assert_eq!(
        build.payload().get("run").and_then(Value::as_str),
        Some("terraform init -upgrade")
    );
}

#[test]
fn test_steps_without_id_always_append() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = landscape();
    let fragment = "jobs:\n  local-test:\n    steps:\n      - run: pytest\n";
    synthesize(&landscape, dir.path(), &[fragment, fragment]);

    let doc = WorkflowDocument::load(dir.path().join("workflow-dev.yml")).unwrap();
    assert_eq!(step_ids(&doc, "local-test"), vec!["checkout-code", "", ""]);
}

#[test]
fn test_fragment_cannot_override_job_settings() {
    let dir = tempfile::tempdir().unwrap();
    let landscape = landscape();
    let fragment = r#"
jobs:
  deploy:
    if: false
    runs-on: self-hosted
    environment: prd
    concurrency: deploy-dev
    steps:
      - id: plan
        run: terraform plan
"#;
    synthesize(&landscape, dir.path(), &[fragment]);

    let doc = WorkflowDocument::load(dir.path().join("workflow-dev.yml")).unwrap();
    let deploy = doc.stage("deploy").unwrap();
    assert_eq!(deploy.enabled(), Some(true));
    assert_eq!(deploy.attribute("runs-on").and_then(Value::as_str), Some("ubuntu-latest"));
    assert_eq!(deploy.attribute("environment").and_then(Value::as_str), Some("dev"));
    assert_eq!(deploy.attribute("concurrency").and_then(Value::as_str), Some("deploy-dev"));
}
