//! Sandbox directory layout.
//!
//! ```text
//! <root>/
//! ├── home/                    ← sandboxed $HOME
//! ├── <project>/               ← staged fixture release (optional)
//! ├── generate_release.out     ← captured output, one file per kind
//! ├── generate_job.out
//! └── generate_manifest.out
//! ```

use std::path::{Path, PathBuf};

use crate::domain::DomainError;
use crate::domain::invocation::InvocationKind;

/// Name of the sandboxed home directory under the root.
pub const HOME_DIR: &str = "home";

/// Fixture releases live under `<fixtures>/releases/<name>`.
pub const RELEASES_DIR: &str = "releases";

/// Paths that make up one sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxLayout {
    root: PathBuf,
    home: PathBuf,
    fixtures: PathBuf,
}

impl SandboxLayout {
    /// Layout rooted at `root`, reading fixtures from `fixtures`.
    pub fn new(root: impl Into<PathBuf>, fixtures: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let home = root.join(HOME_DIR);
        Self {
            root,
            home,
            fixtures: fixtures.into(),
        }
    }

    /// Layout whose root and fixtures are siblings of a test-support
    /// directory: `<dir>/../tmp` and `<dir>/../fixtures`.
    ///
    /// ```
    /// use genrig_core::domain::SandboxLayout;
    ///
    /// let layout = SandboxLayout::for_support_dir("/work/spec/support");
    /// assert!(layout.root().ends_with("spec/tmp"));
    /// assert!(layout.fixtures().ends_with("spec/fixtures"));
    /// ```
    pub fn for_support_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let parent = dir.parent().unwrap_or(dir);
        Self::new(parent.join("tmp"), parent.join("fixtures"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn fixtures(&self) -> &Path {
        &self.fixtures
    }

    /// Source directory of a fixture release.
    pub fn release_fixture(&self, name: &str) -> PathBuf {
        self.fixtures.join(RELEASES_DIR).join(name)
    }

    /// Where a project named `name` lives inside the sandbox.
    pub fn project_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Log file that holds the captured output of `kind`.
    pub fn log_path(&self, kind: InvocationKind) -> PathBuf {
        self.root.join(kind.log_file_name())
    }
}

/// Reject names that would escape the sandbox root or shadow `home`.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.is_empty() {
        "name cannot be empty"
    } else if name == "." || name == ".." {
        "name cannot be a relative directory marker"
    } else if name.contains('/') || name.contains('\\') {
        "name cannot contain path separators"
    } else if name == HOME_DIR {
        "name collides with the sandboxed home directory"
    } else {
        return Ok(());
    };
    Err(DomainError::InvalidProjectName {
        name: name.into(),
        reason: reason.into(),
    })
}

/// The project folder subsequent relative operations run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveProject {
    pub name: String,
    pub folder: PathBuf,
}
