use std::path::PathBuf;
use thiserror::Error;

use crate::domain::expectation::ExpectationFailure;

/// Domain error type.
///
/// Cloneable and categorizable so the CLI can style it and map exit codes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation
    // ========================================================================
    #[error("Invalid job spec at {path}: {reason}")]
    InvalidJobSpec { path: PathBuf, reason: String },

    #[error("Unknown generator subcommand '{0}'")]
    UnknownInvocation(String),

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    // ========================================================================
    // Expectations
    // ========================================================================
    #[error(transparent)]
    Expectation(#[from] ExpectationFailure),
}

impl DomainError {
    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidJobSpec { path, .. } => vec![
                format!("Check the YAML in {}", path.display()),
                "A job spec needs a 'templates' mapping of template → installed path".into(),
            ],
            Self::UnknownInvocation(_) => vec![
                "Known subcommands: new, job, manifest".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Use a plain directory name without path separators".into(),
                "Examples: redis, redis-boshrelease".into(),
            ],
            Self::Expectation(ExpectationFailure::NotExecutable { path }) => vec![
                format!("chmod +x {}", path.display()),
                "Check that the generator marks control scripts executable".into(),
            ],
            Self::Expectation(_) => vec![
                "Inspect the captured generator output with 'genrig output'".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidJobSpec { .. }
            | Self::UnknownInvocation(_)
            | Self::InvalidProjectName { .. } => ErrorCategory::Validation,
            Self::Expectation(_) => ErrorCategory::Expectation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Expectation,
}
