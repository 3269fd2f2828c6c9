//! Test: merging into a hand-authored workflow keeps its comments

use crate::helpers::*;
use workflow_synth::core::WorkflowDocument;
use workflow_synth::synthesis::Module;

const HAND_AUTHORED: &str = r#"# Maintained by the platform team
name: Custom Deploy

on:
  push:
    branches: [main]

jobs:
  # unit tests first
  local-test:
    runs-on: ubuntu-22.04
    steps:
      - uses: actions/checkout@v4
  deploy:
    needs: local-test
    steps:
      - uses: actions/checkout@v4
"#;

const EXPECTED: &str = r#"# Maintained by the platform team
name: Custom Deploy

on:
  push:
    branches:
      - main

jobs:
  # unit tests first
  local-test:
    runs-on: ubuntu-22.04
    if: true
    steps:
      - uses: actions/checkout@v4
      - id: pytest
        run: pytest

  deploy:
    needs: local-test
    if: false
    steps:
      - uses: actions/checkout@v4
"#;

const PYTEST_FRAGMENT: &str = r#"jobs:
  local-test:
    runs-on: self-hosted
    steps:
      - id: pytest
        run: pytest
"#;

#[test]
fn test_existing_file_is_edited_not_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "workflow-dev.yml", HAND_AUTHORED);
    let landscape = landscape();

    synthesize(&landscape, dir.path(), &[PYTEST_FRAGMENT]);

    assert_eq!(read(&path), EXPECTED);
}

const DEEP_COMMENTS: &str = r#"name: Custom Deploy

on:
  push:
    # only mainline
    branches: [main]

jobs:
  local-test:
    runs-on: ubuntu-22.04 # pinned runner
    steps:
      # checkout first
      - uses: actions/checkout@v4
      # then lint
      - run: make lint
  deploy:
    needs: local-test
    steps:
      - uses: actions/checkout@v4
"#;

const DEEP_COMMENTS_MERGED: &str = r#"name: Custom Deploy

on:
  push:
    # only mainline
    branches:
      - main

jobs:
  local-test:
    runs-on: ubuntu-22.04 # pinned runner
    if: true
    steps:
      # checkout first
      - uses: actions/checkout@v4
      # then lint
      - run: make lint
      - id: pytest
        run: pytest

  deploy:
    needs: local-test
    if: false
    steps:
      - uses: actions/checkout@v4
"#;

#[test]
fn test_comments_inside_steps_and_triggers_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "workflow-dev.yml", DEEP_COMMENTS);
    let landscape = landscape();

    synthesize(&landscape, dir.path(), &[PYTEST_FRAGMENT]);

    let text = read(&path);
    assert_eq!(text, DEEP_COMMENTS_MERGED);

    // A second run changes nothing
    synthesize(&landscape, dir.path(), &[PYTEST_FRAGMENT]);
    assert_eq!(read(&path), text);
}

#[test]
fn test_module_initialize_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let fragments = dir.path().join("modules/terraform/ci");
    write_file(&fragments, "01-init.yml", FRAGMENT_INIT);
    write_file(&fragments, "02-apply.yaml", FRAGMENT_APPLY);
    write_file(&fragments, "README.md", "not a fragment");

    let workflows = dir.path().join(".github/workflows");
    let landscape = landscape();
    let module = Module::from_dir("terraform", &fragments).unwrap();
    assert_eq!(module.fragment_files().len(), 2);

    let outcomes = module.initialize(&landscape, &workflows).unwrap();
    assert_eq!(outcomes.len(), 2);

    let dev = WorkflowDocument::load(workflows.join("workflow-dev.yml")).unwrap();
    assert_eq!(step_ids(&dev, "deploy"), vec!["checkout-code", "build-1", "apply"]);

    // The base environment has no deploy stage, so the fragment adds one
    let base = WorkflowDocument::load(workflows.join("workflow-base.yml")).unwrap();
    assert_eq!(base.stage_names(), vec!["build", "deploy"]);
    assert_eq!(base.stage("build").unwrap().enabled(), Some(false));
    assert_eq!(base.stage("deploy").unwrap().enabled(), Some(true));
}
