//! Stage jobs and their ordered container

use crate::core::step::Step;
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;

pub const STEPS_KEY: &str = "steps";
pub const IF_KEY: &str = "if";
pub const NEEDS_KEY: &str = "needs";
pub const ENVIRONMENT_KEY: &str = "environment";
pub const RUNS_ON_KEY: &str = "runs-on";

/// One job of the workflow: job-level attributes plus ordered steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageJob {
    /// Everything except `steps`, in document order
    pub attributes: Mapping,

    /// Steps in execution order
    pub steps: Vec<Step>,
}

impl StageJob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a raw job mapping into attributes and steps
    pub fn from_mapping(mut mapping: Mapping) -> Result<Self, String> {
        let steps = match mapping.shift_remove(STEPS_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Mapping(payload) => Ok(Step::new(payload)),
                    _ => Err(format!("step #{} is not a mapping", index + 1)),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err("'steps' must be a sequence".to_string()),
        };

        Ok(Self {
            attributes: mapping,
            steps,
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Ids of all steps that carry one
    pub fn step_ids(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.steps.iter().filter_map(Step::id)
    }

    /// The `if` flag as the pipeline would evaluate it
    pub fn enabled(&self) -> Option<bool> {
        self.attribute(IF_KEY).and_then(Value::as_bool)
    }

    pub fn needs(&self) -> Option<&str> {
        self.attribute(NEEDS_KEY).and_then(Value::as_str)
    }

    /// Attributes followed by `steps`
    pub fn to_mapping(&self) -> Mapping {
        let mut mapping = self.attributes.clone();
        mapping.insert(
            STEPS_KEY.into(),
            Value::Sequence(self.steps.iter().map(Step::to_value).collect()),
        );
        mapping
    }
}

/// Stage jobs keyed by name, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stages {
    entries: Vec<(String, StageJob)>,
}

impl Stages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&StageJob> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, job)| job)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StageJob> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, job)| job)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Replace an existing stage in place or append a new one
    pub fn insert(&mut self, name: impl Into<String>, job: StageJob) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(existing) => *existing = job,
            None => self.entries.push((name, job)),
        }
    }

    /// Name of the stage declared right after `name`
    pub fn next_after(&self, name: &str) -> Option<&str> {
        let index = self.position(name)?;
        self.entries.get(index + 1).map(|(n, _)| n.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StageJob)> {
        self.entries.iter().map(|(n, job)| (n.as_str(), job))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut StageJob)> {
        self.entries.iter_mut().map(|(n, job)| (n.as_str(), job))
    }
}
