//! Driven (output) ports - implemented by infrastructure.

use std::path::{Path, PathBuf};

use crate::domain::{Invocation, Stdio};
use crate::error::GenrigResult;

/// Port for sandbox filesystem operations.
///
/// Implemented by:
/// - `genrig_adapters::filesystem::LocalFilesystem` (real disk)
/// - `genrig_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> GenrigResult<()>;

    /// Remove a directory and all contents. A missing path is not an error.
    fn remove_dir_all(&self, path: &Path) -> GenrigResult<()>;

    /// Copy one file, creating the destination's parent directories.
    fn copy_file(&self, from: &Path, to: &Path) -> GenrigResult<()>;

    /// Recursively copy the directory `from` to `to` (which must not exist yet
    /// or may already be a directory).
    fn copy_dir(&self, from: &Path, to: &Path) -> GenrigResult<()>;

    /// Write content to a file, replacing anything already there.
    fn write_file(&self, path: &Path, content: &str) -> GenrigResult<()>;

    fn read_to_string(&self, path: &Path) -> GenrigResult<String>;

    fn exists(&self, path: &Path) -> bool;

    /// Whether the platform executable bit is set.
    fn is_executable(&self, path: &Path) -> bool;

    fn set_executable(&self, path: &Path, executable: bool) -> GenrigResult<()>;
}

/// Port for the generator's command entry point.
///
/// The harness treats the generator as a black box: it only sees text written
/// to `stdio` and files left on disk. `Err` means the generator could not be
/// started at all; a generator that runs and reports failure is `Ok`.
#[cfg_attr(test, mockall::automock)]
pub trait Generator: Send + Sync {
    fn start(&self, invocation: &Invocation, stdio: &mut Stdio) -> GenrigResult<()>;
}

/// Port for version-control shell-outs.
///
/// Best effort by contract: there is no result, exit status and output are
/// discarded.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    fn run(&self, argv: &[String], working_dir: &Path, home: &Path);
}

/// Port for the home-directory environment variable.
#[cfg_attr(test, mockall::automock)]
pub trait HomeEnvironment: Send + Sync {
    /// The home directory as it was before any override.
    fn original_home(&self) -> Option<PathBuf>;

    /// Point the home-directory variable at `home`.
    fn set_home(&self, home: &Path);
}
