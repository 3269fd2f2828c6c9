//! workflow-synth - per-environment CI/CD workflow synthesis from module fragments

pub mod cli;
pub mod core;
pub mod persistence;
pub mod synthesis;

// Re-export commonly used types
pub use crate::core::{EnvironmentConfig, Landscape, StageJob, Step, WorkflowDocument, WorkflowError, WorkflowResult};
pub use crate::core::{translate, EventKind, TriggerCondition};
pub use synthesis::{merge_stage, MergeReport, Module, PipelineSynthesizer, SynthesisOutcome};
