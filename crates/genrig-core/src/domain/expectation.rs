//! Expectations about generated artifacts and the ways they can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Extra requirements on a job file beyond existence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileExpectation {
    pub executable: bool,
}

impl FileExpectation {
    pub fn executable() -> Self {
        Self { executable: true }
    }
}

/// A generated artifact did not look the way a test expected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpectationFailure {
    #[error("expected file {path} to exist")]
    MissingFile { path: PathBuf },

    #[error("expected file {path} to be executable")]
    NotExecutable { path: PathBuf },

    #[error("spec for job '{job}' has no templates entry for '{template}' (expected '{expected}')")]
    MissingTemplateEntry {
        job: String,
        template: String,
        expected: String,
    },

    #[error("spec for job '{job}' maps '{template}' to '{actual}', expected '{expected}'")]
    TemplatePathMismatch {
        job: String,
        template: String,
        expected: String,
        actual: String,
    },
}
