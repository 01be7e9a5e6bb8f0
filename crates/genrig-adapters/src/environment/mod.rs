//! Process environment adapters: the home-directory variable and the
//! process working directory.

mod cwd;
mod home;

pub use cwd::{CurrentDirGuard, with_current_dir};
pub use home::{DEFAULT_HOME_VAR, MemoryEnvironment, ProcessEnvironment};
