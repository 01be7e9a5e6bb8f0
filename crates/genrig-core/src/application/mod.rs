//! Application layer for genrig.
//!
//! - **Services**: the [`Harness`] that sets up sandboxes, drives the
//!   generator and checks its artifacts
//! - **Ports**: traits for filesystem, generator, version control and
//!   environment access
//! - **Errors**: infrastructure failures

pub mod error;
pub mod ports;
pub mod services;

pub use services::{DEVELOPER_CONFIG_FILE, Harness};

pub use ports::{Filesystem, Generator, HomeEnvironment, VersionControl};

pub use error::ApplicationError;
