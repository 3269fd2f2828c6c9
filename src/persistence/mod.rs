//! Persistence layer for workflow files

pub mod emitter;
pub mod scanner;

pub use emitter::YamlWriter;
pub use scanner::scan;

use crate::core::error::{WorkflowError, WorkflowResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a workflow file, reporting a missing file as such
pub fn read_text(path: &Path) -> WorkflowResult<String> {
    if !path.exists() {
        return Err(WorkflowError::MissingFile(path.to_path_buf()));
    }
    debug!("Reading workflow {}", path.display());
    Ok(fs::read_to_string(path)?)
}

/// Write a workflow file, creating parent directories as needed
pub fn write_text(path: &Path, text: &str) -> WorkflowResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    debug!("Writing workflow {} ({} bytes)", path.display(), text.len());
    fs::write(path, text)?;
    Ok(())
}
