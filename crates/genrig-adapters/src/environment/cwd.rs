//! Scoped process working directory.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use genrig_core::{application::ApplicationError, error::GenrigResult};

/// Serializes every working-directory change made through this module.
static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Holds the process in another working directory until dropped.
///
/// The process-wide lock is held for the guard's lifetime, so entering a
/// second guard on the same thread deadlocks.
#[derive(Debug)]
pub struct CurrentDirGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CurrentDirGuard {
    pub fn enter(dir: &Path) -> GenrigResult<Self> {
        // A panic inside a previous scope poisons the lock but the directory
        // was still restored by that guard's drop.
        let lock = CWD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = env::current_dir().map_err(|e| ApplicationError::FilesystemError {
            path: dir.to_path_buf(),
            reason: format!("Failed to read current directory: {e}"),
        })?;
        env::set_current_dir(dir).map_err(|e| ApplicationError::FilesystemError {
            path: dir.to_path_buf(),
            reason: format!("Failed to enter directory: {e}"),
        })?;
        debug!(dir = %dir.display(), "Entered directory");

        Ok(Self {
            previous,
            _lock: lock,
        })
    }

    /// Directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for CurrentDirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            warn!(dir = %self.previous.display(), error = %e, "Failed to restore working directory");
        }
    }
}

/// Run `op` with the process working directory set to `dir`.
pub fn with_current_dir<R>(dir: &Path, op: impl FnOnce() -> R) -> GenrigResult<R> {
    let _guard = CurrentDirGuard::enter(dir)?;
    Ok(op())
}
