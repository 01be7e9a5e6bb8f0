//! Home-directory variable adapters.

use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::info;

use genrig_core::application::ports::HomeEnvironment;

pub const DEFAULT_HOME_VAR: &str = "HOME";

/// First value seen per variable, kept for the life of the process.
static ORIGINAL_HOMES: OnceLock<Mutex<HashMap<OsString, Option<PathBuf>>>> = OnceLock::new();

fn original_home_of(var: &OsStr) -> Option<PathBuf> {
    let mut homes = ORIGINAL_HOMES
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    homes
        .entry(var.to_os_string())
        .or_insert_with(|| {
            env::var_os(var)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or_else(dirs::home_dir)
        })
        .clone()
}

/// Overrides a real process environment variable.
///
/// The original value is the one the variable had the first time any
/// `ProcessEnvironment` tracked it in this process, so later harnesses still
/// see the host home after an earlier one overrode it. Nothing restores the
/// variable afterwards.
#[derive(Debug, Clone)]
pub struct ProcessEnvironment {
    var: OsString,
    original: Option<PathBuf>,
}

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self::for_var(DEFAULT_HOME_VAR)
    }

    /// Track `var` instead of `HOME`.
    pub fn for_var(var: impl Into<OsString>) -> Self {
        let var = var.into();
        let original = original_home_of(&var);
        Self { var, original }
    }

    pub fn var(&self) -> &OsStr {
        &self.var
    }
}

impl Default for ProcessEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeEnvironment for ProcessEnvironment {
    fn original_home(&self) -> Option<PathBuf> {
        self.original.clone()
    }

    fn set_home(&self, home: &Path) {
        // SAFETY: the harness is driven from a single thread; tests that
        // override the variable run serially.
        unsafe { env::set_var(&self.var, home) };
        info!(var = ?self.var, home = %home.display(), "Home directory overridden");
    }
}

/// Records the override instead of touching the process environment.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironment {
    original: Option<PathBuf>,
    current: Arc<Mutex<Option<PathBuf>>>,
}

impl MemoryEnvironment {
    pub fn new(original: Option<PathBuf>) -> Self {
        Self {
            current: Arc::new(Mutex::new(original.clone())),
            original,
        }
    }

    /// The home as last set.
    pub fn home(&self) -> Option<PathBuf> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HomeEnvironment for MemoryEnvironment {
    fn original_home(&self) -> Option<PathBuf> {
        self.original.clone()
    }

    fn set_home(&self, home: &Path) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(home.to_path_buf());
    }
}
