//! CLI command definitions

use crate::synthesis::DEFAULT_WORKFLOWS_ROOT;
use clap::Args;

/// Generate or update the workflow of every environment
#[derive(Debug, Args, Clone)]
pub struct SynthesizeCommand {
    /// Path to the landscape YAML file
    #[arg(short, long)]
    pub landscape: String,

    /// Directory the workflow-<env>.yml files are written to
    #[arg(short, long, default_value = DEFAULT_WORKFLOWS_ROOT)]
    pub workflows_root: String,

    /// Fragment files to merge, in order
    #[arg(short, long)]
    pub fragment: Vec<String>,

    /// Directory whose .yml/.yaml files are merged after --fragment files
    #[arg(long)]
    pub fragment_dir: Option<String>,

    /// Fixed workflow title for every environment
    #[arg(long)]
    pub name: Option<String>,
}

/// Merge a fragment into an existing workflow file
#[derive(Debug, Args, Clone)]
pub struct MergeCommand {
    /// Workflow file to update
    #[arg(short, long)]
    pub base: String,

    /// Fragment file to merge
    #[arg(short, long)]
    pub fragment: String,

    /// Stages to merge (default: every stage of the fragment)
    #[arg(short, long)]
    pub stage: Vec<String>,

    /// Print the result instead of saving it
    #[arg(long)]
    pub dry_run: bool,
}

/// Validate a landscape configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the landscape YAML file
    #[arg(short, long)]
    pub landscape: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show the trigger block for a match rule
#[derive(Debug, Args, Clone)]
pub struct TriggerCommand {
    /// Event kind (push or release)
    #[arg(short, long, default_value = "push")]
    pub event: String,

    /// Simplified ref pattern, e.g. refs/heads/(develop|main)
    #[arg(short, long, default_value = ".*")]
    pub pattern: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
