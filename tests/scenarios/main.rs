//! Scenario-based tests for workflow-synth

#[path = "../helpers.rs"]
mod helpers;

mod edit_in_place;
mod environments;
mod merge_semantics;
mod regeneration;
