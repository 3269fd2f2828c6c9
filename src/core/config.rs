//! Landscape configuration from YAML

use crate::core::error::{WorkflowError, WorkflowResult};
use crate::core::trigger::{translate, TriggerCondition};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::Path;

/// Name of the environment whose pipeline carries no `environment` binding
pub const BASE_ENVIRONMENT: &str = "base";

/// Whether `name` designates the base environment
pub fn is_base_environment(name: &str) -> bool {
    name.is_empty() || name == BASE_ENVIRONMENT
}

/// CI/CD engines pipelines can be synthesized for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CicdEngine {
    Github,
}

impl CicdEngine {
    pub fn parse(name: &str) -> WorkflowResult<Self> {
        match name {
            "github" => Ok(CicdEngine::Github),
            other => Err(WorkflowError::UnsupportedEngine(other.to_string())),
        }
    }
}

/// Per-environment synthesis parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Event kind that triggers the pipeline (`push` or `release`)
    #[serde(default = "default_match_event")]
    pub match_event: String,

    /// Simplified ref pattern, e.g. `refs/heads/(develop|main)`
    #[serde(default = "default_match_branch")]
    pub match_branch: String,

    /// Runner label for every stage
    #[serde(default = "default_runs_on")]
    pub runs_on: String,

    /// Stage names in execution order
    #[serde(default)]
    pub stages: Vec<String>,
}

fn default_match_event() -> String {
    "push".to_string()
}

fn default_match_branch() -> String {
    ".*".to_string()
}

fn default_runs_on() -> String {
    "ubuntu-latest".to_string()
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            match_event: default_match_event(),
            match_branch: default_match_branch(),
            runs_on: default_runs_on(),
            stages: Vec::new(),
        }
    }
}

impl EnvironmentConfig {
    pub fn with_stages<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stages = stages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_match(mut self, event: &str, branch: &str) -> Self {
        self.match_event = event.to_string();
        self.match_branch = branch.to_string();
        self
    }

    /// Translate the match rule into a trigger
    pub fn trigger(&self) -> WorkflowResult<TriggerCondition> {
        translate(&self.match_event, &self.match_branch)
    }
}

/// A named environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    pub config: EnvironmentConfig,
}

/// Landscape file as written by users
#[derive(Debug, Deserialize)]
struct LandscapeFile {
    #[serde(default)]
    cicd: Option<String>,

    #[serde(default)]
    environments: Mapping,
}

/// Deployment landscape: CI/CD engine and environments in declared order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Landscape {
    /// CI/CD engine name; `None` disables pipeline synthesis
    pub cicd: Option<String>,

    pub environments: Vec<Environment>,
}

impl Landscape {
    /// Load landscape configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse landscape configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: LandscapeFile = serde_yaml::from_str(yaml)?;

        let mut environments = Vec::with_capacity(file.environments.len());
        for (key, value) in file.environments {
            let name = match key {
                Value::String(name) => name,
                other => anyhow::bail!("Environment name must be a string, got {:?}", other),
            };
            let config = match value {
                Value::Null => EnvironmentConfig::default(),
                value => serde_yaml::from_value(value)
                    .map_err(|e| anyhow::anyhow!("Environment '{}': {}", name, e))?,
            };
            environments.push(Environment { name, config });
        }

        let landscape = Landscape {
            cicd: file.cicd,
            environments,
        };
        landscape.validate()?;
        Ok(landscape)
    }

    /// Validate the landscape configuration
    pub fn validate(&self) -> Result<()> {
        for env in &self.environments {
            if env.name.contains(['/', '\\']) || env.name.starts_with('.') {
                anyhow::bail!("Environment name '{}' cannot be used in a file name", env.name);
            }

            let mut seen = HashSet::new();
            for stage in &env.config.stages {
                if stage.trim().is_empty() {
                    anyhow::bail!("Environment '{}' declares an empty stage name", env.name);
                }
                if !seen.insert(stage) {
                    anyhow::bail!("Environment '{}' declares stage '{}' twice", env.name, stage);
                }
            }

            env.config
                .trigger()
                .map_err(|e| anyhow::anyhow!("Environment '{}': {}", env.name, e))?;
        }

        Ok(())
    }

    /// Engine to synthesize for, `None` when no engine is configured
    pub fn engine(&self) -> WorkflowResult<Option<CicdEngine>> {
        self.cicd.as_deref().map(CicdEngine::parse).transpose()
    }

    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|env| env.name == name)
    }

    pub fn with_environment(mut self, name: &str, config: EnvironmentConfig) -> Self {
        self.environments.push(Environment {
            name: name.to_string(),
            config,
        });
        self
    }
}
