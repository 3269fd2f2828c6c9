//! Error types for workflow operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors raised while translating, loading, merging or saving workflows
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Unsupported event kind: {0} (expected push or release)")]
    UnsupportedEventKind(String),

    #[error("Unknown pattern shorthand: {0}")]
    UnknownPatternShorthand(String),

    #[error("Workflow file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid workflow document {}: {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("Unsupported CI/CD engine: {0}")]
    UnsupportedEngine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl WorkflowError {
    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        WorkflowError::InvalidDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
