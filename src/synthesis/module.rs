//! Module-level entry point for pipeline synthesis

use crate::core::{
    config::{CicdEngine, Landscape},
    error::{WorkflowError, WorkflowResult},
    workflow::WorkflowDocument,
};
use crate::synthesis::synthesizer::{PipelineSynthesizer, SynthesisOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A module contributing CI fragments to the landscape's pipelines
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    fragment_files: Vec<PathBuf>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fragment_files: Vec::new(),
        }
    }

    pub fn with_fragment(mut self, path: impl Into<PathBuf>) -> Self {
        self.fragment_files.push(path.into());
        self
    }

    /// Module whose fragments are the `.yml`/`.yaml` files of `dir`, in
    /// file-name order
    pub fn from_dir(name: impl Into<String>, dir: impl AsRef<Path>) -> WorkflowResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(WorkflowError::MissingFile(dir.to_path_buf()));
        }

        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && matches!(
                        path.extension().and_then(|ext| ext.to_str()),
                        Some("yml") | Some("yaml")
                    )
            })
            .collect();
        files.sort();

        Ok(Self {
            name: name.into(),
            fragment_files: files,
        })
    }

    pub fn fragment_files(&self) -> &[PathBuf] {
        &self.fragment_files
    }

    /// Load every fragment; a missing file fails the whole load
    pub fn load_fragments(&self) -> WorkflowResult<Vec<WorkflowDocument>> {
        self.fragment_files.iter().map(|path| WorkflowDocument::load(path)).collect()
    }

    /// Called once per module by the lifecycle driver. Merges the module's
    /// fragments into every environment's workflow.
    pub fn initialize(
        &self,
        landscape: &Landscape,
        workflows_root: impl Into<PathBuf>,
    ) -> WorkflowResult<Vec<SynthesisOutcome>> {
        match landscape.engine()? {
            None => {
                info!("Module '{}': no CI/CD engine configured, skipping pipelines", self.name);
                Ok(Vec::new())
            }
            Some(CicdEngine::Github) => {
                let fragments = self.load_fragments()?;
                info!(
                    "Module '{}': merging {} fragment(s) into {} environment(s)",
                    self.name,
                    fragments.len(),
                    landscape.environments.len()
                );
                PipelineSynthesizer::new(landscape, workflows_root).synthesize(&fragments)
            }
        }
    }
}
