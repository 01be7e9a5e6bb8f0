//! genrig core - sandboxed harness for release scaffolding generators.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        genrig-cli / test suites         │
//! └──────────────────┬──────────────────────┘
//!                    │ drives
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │               Harness                   │
//! │  setup → stage → generate → expect      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Ports: Filesystem, Generator,         │
//! │   VersionControl, HomeEnvironment       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │           genrig-adapters               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use genrig_core::prelude::*;
//!
//! let mut h = Harness::new(layout, filesystem, generator, vcs, env);
//! h.setup_universe()?;
//! h.setup_project_release("redis")?;
//! h.in_project_folder(|h| -> GenrigResult<()> {
//!     h.generate_job(["redis", "-d", "redis"])?;
//!     h.job_file_exists("redis", &["monit"], FileExpectation::default());
//!     h.job_template_exists("redis", "redis_ctl.erb", "bin/redis_ctl");
//!     Ok(())
//! })?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        Harness,
        ports::{Filesystem, Generator, HomeEnvironment, VersionControl},
    };
    pub use crate::domain::{
        CapturedOutput, ExpectationFailure, FileExpectation, GitCommand, GitIdentity, Invocation,
        InvocationKind, JobSpec, SandboxLayout, Stdio, capture_stdios, strip_color_codes,
    };
    pub use crate::error::{GenrigError, GenrigResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
