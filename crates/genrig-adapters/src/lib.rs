//! Infrastructure adapters for genrig.
//!
//! This crate implements the ports defined in `genrig-core::application::ports`.
//! It contains all process, environment and disk access.

pub mod environment;
pub mod filesystem;
pub mod generator;
pub mod vcs;

use genrig_core::{
    application::{Harness, ports::Generator},
    domain::SandboxLayout,
};

// Re-export commonly used adapters
pub use environment::{CurrentDirGuard, MemoryEnvironment, ProcessEnvironment, with_current_dir};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use generator::{InProcessGenerator, ProcessGenerator};
pub use vcs::{GitCall, GitCli, RecordingVersionControl};

/// Harness over the real disk, the `git` binary and the process `HOME`.
pub fn local_harness(layout: SandboxLayout, generator: impl Generator + 'static) -> Harness {
    Harness::new(
        layout,
        Box::new(LocalFilesystem::new()),
        Box::new(generator),
        Box::new(GitCli::default()),
        Box::new(ProcessEnvironment::default()),
    )
}
