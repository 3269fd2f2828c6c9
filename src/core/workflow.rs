//! Workflow document model

use crate::core::{
    config::{is_base_environment, EnvironmentConfig},
    error::{WorkflowError, WorkflowResult},
    layout::{Layout, NodePath},
    stage::{StageJob, Stages, ENVIRONMENT_KEY, IF_KEY, NEEDS_KEY, RUNS_ON_KEY, STEPS_KEY},
    step::Step,
};
use crate::persistence::{self, emitter::key_text, YamlWriter};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const NAME_KEY: &str = "name";
pub const ON_KEY: &str = "on";
pub const JOBS_KEY: &str = "jobs";

const DEFAULT_TITLE: &str = "Workflow";
const JOB_INDENT: usize = 2;
const ATTRIBUTE_INDENT: usize = 4;

/// One pipeline definition, bound to the file it is persisted to
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDocument {
    path: PathBuf,

    /// Pipeline title
    pub name: Option<String>,

    /// Native `on:` value
    pub trigger: Option<Value>,

    /// Other top-level keys (`env`, `permissions`, ...)
    pub extra: Mapping,

    stages: Stages,

    layout: Layout,
}

impl WorkflowDocument {
    /// Empty document for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            trigger: None,
            extra: Mapping::new(),
            stages: Stages::new(),
            layout: Layout::new(),
        }
    }

    /// Load an existing workflow file
    pub fn load(path: impl AsRef<Path>) -> WorkflowResult<Self> {
        let path = path.as_ref();
        let text = persistence::read_text(path)?;
        Self::from_yaml(path, &text)
    }

    /// Load `path` if it exists, otherwise synthesize it
    pub fn open(
        path: impl AsRef<Path>,
        workflow_name: Option<&str>,
        env_name: &str,
        env: &EnvironmentConfig,
    ) -> WorkflowResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!("Editing existing workflow {}", path.display());
            Self::load(path)
        } else {
            Self::synthesize(path, workflow_name, env_name, env)
        }
    }

    /// Parse workflow text; `path` is where the document will be saved
    pub fn from_yaml(path: impl Into<PathBuf>, text: &str) -> WorkflowResult<Self> {
        let path = path.into();
        let root = match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(root) => root,
            Value::Null => Mapping::new(),
            _ => return Err(WorkflowError::invalid(&path, "top level is not a mapping")),
        };

        let mut document = Self::new(path);
        for (key, value) in root {
            let key = key_text(&key)?;
            match key.as_str() {
                NAME_KEY => match value {
                    Value::String(name) => document.name = Some(name),
                    Value::Null => {}
                    other => document.name = Some(key_text(&other)?),
                },
                ON_KEY => document.trigger = Some(value),
                JOBS_KEY => document.stages = Self::parse_jobs(&document.path, value)?,
                _ => {
                    document.extra.insert(Value::String(key), value);
                }
            }
        }

        document.layout = persistence::scan(text);
        Ok(document)
    }

    fn parse_jobs(path: &Path, value: Value) -> WorkflowResult<Stages> {
        let jobs = match value {
            Value::Mapping(jobs) => jobs,
            Value::Null => Mapping::new(),
            _ => return Err(WorkflowError::invalid(path, "'jobs' is not a mapping")),
        };

        let mut stages = Stages::new();
        for (name, job) in jobs {
            let name = key_text(&name)?;
            let job = match job {
                Value::Mapping(job) => StageJob::from_mapping(job)
                    .map_err(|reason| WorkflowError::invalid(path, format!("job '{}': {}", name, reason)))?,
                Value::Null => StageJob::new(),
                _ => {
                    return Err(WorkflowError::invalid(
                        path,
                        format!("job '{}' is not a mapping", name),
                    ))
                }
            };
            stages.insert(name, job);
        }
        Ok(stages)
    }

    /// Build the skeleton for an environment, save it and read it back.
    ///
    /// Reloading makes a fresh skeleton go through the same normalization as
    /// a hand-authored file, so repeated generation yields identical bytes.
    pub fn synthesize(
        path: impl AsRef<Path>,
        workflow_name: Option<&str>,
        env_name: &str,
        env: &EnvironmentConfig,
    ) -> WorkflowResult<Self> {
        let path = path.as_ref();
        let mut document = Self::skeleton(path, workflow_name, env_name, env)?;
        info!(
            "Synthesized workflow '{}' with {} stage(s) at {}",
            document.name.as_deref().unwrap_or_default(),
            document.stages.len(),
            path.display()
        );
        document.save()?;
        Self::load(path)
    }

    /// The in-memory skeleton, before the save/reload normalization
    pub fn skeleton(
        path: impl Into<PathBuf>,
        workflow_name: Option<&str>,
        env_name: &str,
        env: &EnvironmentConfig,
    ) -> WorkflowResult<Self> {
        let title = match workflow_name.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None if is_base_environment(env_name) => DEFAULT_TITLE.to_string(),
            None => format!("{} - {}", DEFAULT_TITLE, env_name),
        };
        let trigger = env.trigger()?;

        let mut document = Self::new(path);
        document.name = Some(title);
        document.trigger = Some(trigger.to_value());
        document.layout.ensure_blank_before(NodePath::top(ON_KEY));
        document.layout.ensure_blank_before(NodePath::top(JOBS_KEY));

        let mut previous: Option<&str> = None;
        for stage_name in &env.stages {
            let mut job = StageJob::new();
            job.set_attribute(IF_KEY, true);
            if !is_base_environment(env_name) {
                job.set_attribute(ENVIRONMENT_KEY, env_name);
            }
            job.set_attribute(RUNS_ON_KEY, env.runs_on.as_str());
            if let Some(previous) = previous {
                job.set_attribute(NEEDS_KEY, previous);
                document.layout.ensure_blank_before(NodePath::stage(stage_name));
            }
            job.steps.push(Step::checkout());

            debug!("Added stage '{}' to skeleton", stage_name);
            document.stages.insert(stage_name.as_str(), job);
            previous = Some(stage_name.as_str());
        }

        Ok(document)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stages(&self) -> &Stages {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.names().collect()
    }

    pub fn stage(&self, name: &str) -> Option<&StageJob> {
        self.stages.get(name)
    }

    pub fn stage_mut(&mut self, name: &str) -> Option<&mut StageJob> {
        self.stages.get_mut(name)
    }

    /// The stage, or an empty one when it does not exist
    pub fn get_stage(&self, name: &str) -> StageJob {
        self.stages.get(name).cloned().unwrap_or_default()
    }

    /// Replace a stage in place, or append it after the last stage
    pub fn insert_stage(&mut self, name: &str, job: StageJob) {
        self.stages.insert(name, job);
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Recompute every stage's `if` flag: stages holding only their
    /// bootstrap step are switched off
    pub fn refresh_execution_flags(&mut self) {
        for (name, job) in self.stages.iter_mut() {
            let enabled = job.steps.len() > 1;
            debug!("Stage '{}' has {} step(s), if: {}", name, job.steps.len(), enabled);
            job.set_attribute(IF_KEY, enabled);
        }
    }

    /// Refresh execution flags and write the document to its path
    pub fn save(&mut self) -> WorkflowResult<()> {
        self.refresh_execution_flags();
        let text = self.to_yaml()?;
        persistence::write_text(&self.path, &text)?;
        info!("Saved workflow {}", self.path.display());
        Ok(())
    }

    /// Render the document with its layout
    pub fn to_yaml(&self) -> WorkflowResult<String> {
        let mut writer = YamlWriter::new(&self.layout);

        if let Some(name) = &self.name {
            let value = Value::String(name.clone());
            writer.entry(&Value::from(NAME_KEY), &value, &NodePath::top(NAME_KEY), 0)?;
        }
        if let Some(trigger) = &self.trigger {
            writer.entry(&Value::from(ON_KEY), trigger, &NodePath::top(ON_KEY), 0)?;
        }
        for (key, value) in &self.extra {
            writer.entry(key, value, &NodePath::top(&key_text(key)?), 0)?;
        }

        let jobs = NodePath::top(JOBS_KEY);
        if self.stages.is_empty() {
            writer.entry(&Value::from(JOBS_KEY), &Value::Mapping(Mapping::new()), &jobs, 0)?;
        } else {
            writer.open(&Value::from(JOBS_KEY), &jobs, 0)?;
            for (name, job) in self.stages.iter() {
                let stage = jobs.key(name);
                writer.open(&Value::from(name), &stage, JOB_INDENT)?;
                for (key, value) in &job.attributes {
                    writer.entry(key, value, &stage.key(&key_text(key)?), ATTRIBUTE_INDENT)?;
                }
                let steps = Value::Sequence(job.steps.iter().map(Step::to_value).collect());
                writer.entry(&Value::from(STEPS_KEY), &steps, &stage.key(STEPS_KEY), ATTRIBUTE_INDENT)?;
            }
        }

        writer.layout_lines(self.layout.trailer(), 0);
        Ok(writer.finish())
    }
}
