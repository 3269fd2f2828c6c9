//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{MergeCommand, SynthesizeCommand, TriggerCommand, ValidateCommand};
use std::ffi::OsString;

/// Per-environment CI/CD workflow synthesis
#[derive(Debug, Parser, Clone)]
#[command(name = "workflow-synth")]
#[command(author = "workflow-synth Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Synthesizes per-environment CI/CD workflows from module fragments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate or update the workflow of every environment
    Synthesize(SynthesizeCommand),

    /// Merge a fragment into an existing workflow file
    Merge(MergeCommand),

    /// Validate a landscape configuration
    Validate(ValidateCommand),

    /// Show the trigger block for a match rule
    Trigger(TriggerCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
