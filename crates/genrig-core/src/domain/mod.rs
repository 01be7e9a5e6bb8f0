//! Core domain layer for genrig.
//!
//! Pure values and rules: where sandbox paths live, what a generator
//! invocation looks like, how captured output is normalised, how job specs
//! decode. No filesystem or process access happens here; that goes through
//! the ports in `crate::application`.

pub mod error;
pub mod expectation;
pub mod invocation;
pub mod job_spec;
pub mod layout;
pub mod output;
pub mod vcs;

pub use error::{DomainError, ErrorCategory};
pub use expectation::{ExpectationFailure, FileExpectation};
pub use invocation::{Invocation, InvocationKind};
pub use job_spec::{JOBS_DIR, JobSpec, job_path, job_spec_path, job_template_path};
pub use layout::{ActiveProject, SandboxLayout, validate_project_name};
pub use output::{CapturedOutput, Stdio, capture_stdios, normalize_output, strip_color_codes};
pub use vcs::{GitCommand, GitIdentity, quote_arg, split_args};
