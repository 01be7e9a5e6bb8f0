//! Application ports (traits) for external dependencies.
//!
//! Adapters in `genrig-adapters` implement these.
//!
//! - `Filesystem`: sandbox file operations
//! - `Generator`: the generator entry point under test
//! - `VersionControl`: best-effort `git` shell-outs
//! - `HomeEnvironment`: the home-directory variable

pub mod output;

pub use output::{Filesystem, Generator, HomeEnvironment, VersionControl};
