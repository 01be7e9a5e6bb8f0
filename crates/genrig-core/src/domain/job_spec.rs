//! Job specifications (`jobs/<job>/spec`).
//!
//! ```yaml
//! ---
//! name: mywebapp
//! templates:
//!   mywebapp_ctl.erb: bin/mywebapp_ctl
//!   config.yml.erb: config/config.yml
//! packages:
//!   - nginx
//! properties: {}
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::DomainError;

/// Top-level directory holding every job of a release.
pub const JOBS_DIR: &str = "jobs";

/// Decoded job spec. Only `templates` is required to be meaningful; every
/// other key is optional and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub name: Option<String>,
    /// Template file name → installed relative path.
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_yaml::Value>,
}

impl JobSpec {
    /// Parse spec YAML. `origin` only labels the error.
    pub fn from_yaml(text: &str, origin: &Path) -> Result<Self, DomainError> {
        // An empty document decodes to `null`; treat it as an empty spec.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| DomainError::InvalidJobSpec {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Installed path declared for `template`, if any.
    pub fn template_path(&self, template: &str) -> Option<&str> {
        self.templates.get(template).map(String::as_str)
    }
}

/// `jobs/<job>/<segments..>`
pub fn job_path<S: AsRef<str>>(job: &str, segments: &[S]) -> PathBuf {
    let mut path = PathBuf::from(JOBS_DIR);
    path.push(job);
    for segment in segments {
        path.push(segment.as_ref());
    }
    path
}

/// `jobs/<job>/spec`
pub fn job_spec_path(job: &str) -> PathBuf {
    job_path(job, &["spec"])
}

/// `jobs/<job>/templates/<template>`
pub fn job_template_path(job: &str, template: &str) -> PathBuf {
    job_path(job, &["templates", template])
}
