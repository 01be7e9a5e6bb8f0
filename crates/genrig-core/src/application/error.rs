//! Application layer errors.
//!
//! These are failures of the test infrastructure itself (disk, fixtures,
//! spawning the generator), not of the generator under test.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The named fixture release is not on disk.
    #[error("Fixture release '{name}' not found at {path}")]
    FixtureMissing { name: String, path: PathBuf },

    /// The generator entry point could not be started.
    #[error("Generator '{program}' could not be started: {reason}")]
    GeneratorFailed { program: String, reason: String },

    /// No generator invocation has been captured yet.
    #[error("No captured generator output found")]
    NoCapturedOutput { path: Option<PathBuf> },

    /// Store access failed (lock poisoned).
    #[error("Sandbox state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check permissions and free disk space in the sandbox root".into(),
            ],
            Self::FixtureMissing { path, .. } => vec![
                format!("Create the fixture directory {}", path.display()),
                "Fixture releases live under <fixtures>/releases/<name>".into(),
            ],
            Self::GeneratorFailed { program, .. } => vec![
                format!("Ensure '{program}' is installed and on your PATH"),
                "Or set generator.program in the genrig config".into(),
            ],
            Self::NoCapturedOutput { path } => {
                let mut suggestions = Vec::new();
                if let Some(path) = path {
                    suggestions.push(format!("Expected a log at {}", path.display()));
                }
                suggestions.push("Run a generator subcommand first (new, job or manifest)".into());
                suggestions
            }
            Self::LockPoisoned => vec![
                "A previous operation panicked while holding sandbox state".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FixtureMissing { .. } | Self::NoCapturedOutput { .. } => ErrorCategory::NotFound,
            Self::GeneratorFailed { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. } | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
