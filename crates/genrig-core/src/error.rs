//! Unified error handling for genrig core.
//!
//! Wraps domain and application errors behind one type with a category and
//! user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ExpectationFailure};

/// Root error type for genrig core operations.
#[derive(Debug, Error, Clone)]
pub enum GenrigError {
    /// Errors from the domain layer (bad specs, unmet expectations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (sandbox infrastructure).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl From<ExpectationFailure> for GenrigError {
    fn from(failure: ExpectationFailure) -> Self {
        Self::Domain(DomainError::Expectation(failure))
    }
}

impl GenrigError {
    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in genrig".into(),
                "Please report this issue at: https://github.com/cosecruz/genrig/issues".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Expectation => ErrorCategory::Expectation,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// The unmet expectation, if this error is one.
    pub fn as_expectation(&self) -> Option<&ExpectationFailure> {
        match self {
            Self::Domain(DomainError::Expectation(failure)) => Some(failure),
            _ => None,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Expectation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type GenrigResult<T> = Result<T, GenrigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn expectation_converts_and_categorises() {
        let err: GenrigError = ExpectationFailure::MissingFile {
            path: PathBuf::from("jobs/demo/monit"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Expectation);
        assert!(err.as_expectation().is_some());
        assert_eq!(err.to_string(), "expected file jobs/demo/monit to exist");
    }

    #[test]
    fn missing_fixture_is_not_found() {
        let err: GenrigError = ApplicationError::FixtureMissing {
            name: "redis".into(),
            path: PathBuf::from("/fixtures/releases/redis"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions().iter().any(|s| s.contains("releases")));
    }
}
