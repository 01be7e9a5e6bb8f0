//! Version-control adapters.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use genrig_core::application::ports::VersionControl;

use crate::environment::DEFAULT_HOME_VAR;

/// Shells out to the `git` binary.
///
/// Output is discarded and failures (missing binary, non-zero exit) are
/// only logged.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
    home_var: OsString,
}

impl GitCli {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            home_var: DEFAULT_HOME_VAR.into(),
        }
    }

    /// Pass the sandboxed home to git through `var`.
    pub fn with_home_var(mut self, var: impl Into<OsString>) -> Self {
        self.home_var = var.into();
        self
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl VersionControl for GitCli {
    fn run(&self, argv: &[String], working_dir: &Path, home: &Path) {
        let status = Command::new(&self.program)
            .args(argv)
            .current_dir(working_dir)
            .env(&self.home_var, home)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => debug!(?argv, "git succeeded"),
            Ok(status) => debug!(?argv, code = ?status.code(), "git failed, ignoring"),
            Err(e) => debug!(?argv, error = %e, "git could not be started, ignoring"),
        }
    }
}

/// One recorded `git` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCall {
    pub argv: Vec<String>,
    pub working_dir: PathBuf,
    pub home: PathBuf,
}

/// Records calls instead of running them. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingVersionControl {
    calls: Arc<Mutex<Vec<GitCall>>>,
}

impl RecordingVersionControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl VersionControl for RecordingVersionControl {
    fn run(&self, argv: &[String], working_dir: &Path, home: &Path) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(GitCall {
                argv: argv.to_vec(),
                working_dir: working_dir.to_path_buf(),
                home: home.to_path_buf(),
            });
    }
}
