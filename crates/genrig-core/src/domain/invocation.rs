//! Generator subcommands driven by the harness.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::DomainError;

/// The generator subcommands the harness knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationKind {
    /// `new <release> [flags]`
    NewRelease,
    /// `job <name> [flags]`
    Job,
    /// `manifest <path/to/release>`
    Manifest,
}

impl InvocationKind {
    pub const ALL: [InvocationKind; 3] = [Self::NewRelease, Self::Job, Self::Manifest];

    /// Subcommand name passed as the first generator argument.
    pub fn subcommand(self) -> &'static str {
        match self {
            Self::NewRelease => "new",
            Self::Job => "job",
            Self::Manifest => "manifest",
        }
    }

    /// Fixed log file name under the sandbox root.
    pub fn log_file_name(self) -> &'static str {
        match self {
            Self::NewRelease => "generate_release.out",
            Self::Job => "generate_job.out",
            Self::Manifest => "generate_manifest.out",
        }
    }

    /// Full argument list: the subcommand followed by `args`.
    pub fn argv<I, S>(self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        std::iter::once(self.subcommand().to_owned())
            .chain(args.into_iter().map(Into::into))
            .collect()
    }
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}

impl FromStr for InvocationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "new" | "release" => Ok(Self::NewRelease),
            "job" => Ok(Self::Job),
            "manifest" => Ok(Self::Manifest),
            other => Err(DomainError::UnknownInvocation(other.to_owned())),
        }
    }
}

/// One call into the generator's entry point.
///
/// The working directory and home are explicit so adapters never have to
/// consult process-global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: InvocationKind,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub home: PathBuf,
}
