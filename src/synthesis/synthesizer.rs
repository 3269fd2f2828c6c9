//! Pipeline synthesizer: one workflow file per environment

use crate::core::{
    config::{Environment, Landscape},
    error::WorkflowResult,
    workflow::WorkflowDocument,
};
use crate::synthesis::merge::{merge_fragment, MergeReport};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Default location of generated workflows, relative to the project root
pub const DEFAULT_WORKFLOWS_ROOT: &str = ".github/workflows";

/// Result of synthesizing one environment's workflow
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    pub environment: String,
    pub path: PathBuf,
    pub reports: Vec<MergeReport>,
}

impl SynthesisOutcome {
    pub fn appended_steps(&self) -> usize {
        self.reports.iter().map(|r| r.appended_steps).sum()
    }

    pub fn skipped_ids(&self) -> usize {
        self.reports.iter().map(|r| r.skipped_ids.len()).sum()
    }
}

/// Builds and merges the workflow of every environment in a landscape
#[derive(Debug, Clone)]
pub struct PipelineSynthesizer<'a> {
    landscape: &'a Landscape,
    workflows_root: PathBuf,
    workflow_name: Option<String>,
}

impl<'a> PipelineSynthesizer<'a> {
    pub fn new(landscape: &'a Landscape, workflows_root: impl Into<PathBuf>) -> Self {
        Self {
            landscape,
            workflows_root: workflows_root.into(),
            workflow_name: None,
        }
    }

    /// Use a fixed title instead of the per-environment default
    pub fn with_workflow_name(mut self, name: impl Into<String>) -> Self {
        self.workflow_name = Some(name.into());
        self
    }

    /// Path of an environment's workflow file
    pub fn workflow_path(&self, env_name: &str) -> PathBuf {
        self.workflows_root.join(format!("workflow-{}.yml", env_name))
    }

    pub fn workflows_root(&self) -> &Path {
        &self.workflows_root
    }

    /// Synthesize every environment. A failing environment is left unsaved
    /// and the others are still attempted; the first failure is returned
    /// once all environments have run.
    pub fn synthesize(&self, fragments: &[WorkflowDocument]) -> WorkflowResult<Vec<SynthesisOutcome>> {
        if self.landscape.environments.is_empty() {
            warn!("Landscape declares no environments, no workflow generated");
        }

        let mut outcomes = Vec::with_capacity(self.landscape.environments.len());
        let mut first_error = None;
        for env in &self.landscape.environments {
            match self.synthesize_environment(env, fragments) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    error!("Environment '{}' not synthesized: {}", env.name, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(outcomes),
        }
    }

    /// Open the environment's document, merge all fragments and save it once.
    /// On error the document is dropped without being saved.
    pub fn synthesize_environment(
        &self,
        env: &Environment,
        fragments: &[WorkflowDocument],
    ) -> WorkflowResult<SynthesisOutcome> {
        let path = self.workflow_path(&env.name);
        info!("Synthesizing workflow for environment '{}'", env.name);

        let mut document = WorkflowDocument::open(
            &path,
            self.workflow_name.as_deref(),
            &env.name,
            &env.config,
        )?;

        let mut reports = Vec::new();
        for fragment in fragments {
            reports.extend(merge_fragment(&mut document, fragment, &env.config.stages));
        }

        document.save()?;

        Ok(SynthesisOutcome {
            environment: env.name.clone(),
            path,
            reports,
        })
    }
}
