//! Core domain models for workflows
//!
//! This module defines the workflow document, its stages and steps, the
//! formatting side table, trigger translation and landscape configuration.

pub mod config;
pub mod error;
pub mod layout;
pub mod stage;
pub mod step;
pub mod trigger;
pub mod workflow;

pub use config::{CicdEngine, Environment, EnvironmentConfig, Landscape};
pub use error::{WorkflowError, WorkflowResult};
pub use layout::{Layout, NodePath, Segment};
pub use stage::{StageJob, Stages};
pub use step::Step;
pub use trigger::{translate, EventKind, TriggerCondition};
pub use workflow::WorkflowDocument;
