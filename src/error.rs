//! Error types and exit codes for omnilint

use std::process::ExitCode;
use thiserror::Error;

/// Main error type for omnilint operations.
///
/// Per-job failures (a tool reporting problems, a missing binary, a timeout)
/// are not errors: they are folded into the run tally. Only infrastructure
/// and configuration problems surface through this type.
#[derive(Error, Debug)]
pub enum OmnilintError {
    #[error("Project directory not found: {path}")]
    ProjectNotFound { path: String },

    #[error("Git error: {message}")]
    Git { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OmnilintError {
    /// Convert error to appropriate exit code:
    /// - 0: Success (no problems found / all problems fixed)
    /// - 1: Problems found (mapped by the CLI, not by this type)
    /// - 2: Project/IO error
    /// - 5: Git error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::ProjectNotFound { .. } => ExitCode::from(2),
            Self::Io(_) => ExitCode::from(2),
            Self::Git { .. } => ExitCode::from(5),
        }
    }
}

/// Result type alias for omnilint operations
pub type Result<T> = std::result::Result<T, OmnilintError>;
