//! External generator binary.

use std::ffi::OsString;
use std::io::Write;
use std::process::{Command, Stdio as ProcessStdio};
use std::thread;

use tracing::{debug, instrument, warn};

use genrig_core::{
    application::{ApplicationError, ports::Generator},
    domain::{Invocation, Stdio},
    error::GenrigResult,
};

use crate::environment::DEFAULT_HOME_VAR;

/// Runs `<program> <fixed args..> <subcommand> <args..>`.
///
/// The child runs in the invocation's working directory with the home
/// variable pointing at the sandboxed home. Its exit status is logged and
/// otherwise ignored.
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    program: OsString,
    args: Vec<OsString>,
    home_var: OsString,
}

impl ProcessGenerator {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            home_var: DEFAULT_HOME_VAR.into(),
        }
    }

    /// Arguments placed before the subcommand, e.g. `["exec", "bosh-gen"]`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_home_var(mut self, var: impl Into<OsString>) -> Self {
        self.home_var = var.into();
        self
    }

    fn failed(&self, reason: impl std::fmt::Display) -> ApplicationError {
        ApplicationError::GeneratorFailed {
            program: self.program.to_string_lossy().into_owned(),
            reason: reason.to_string(),
        }
    }
}

impl Generator for ProcessGenerator {
    #[instrument(skip_all, fields(program = ?self.program, subcommand = %invocation.kind))]
    fn start(&self, invocation: &Invocation, stdio: &mut Stdio) -> GenrigResult<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .env(&self.home_var, &invocation.home)
            .stdin(ProcessStdio::piped())
            .stdout(ProcessStdio::piped())
            .stderr(ProcessStdio::piped())
            .spawn()
            .map_err(|e| self.failed(e))?;

        // Feed stdin from its own thread so a chatty child cannot deadlock
        // against a full stdout pipe.
        let input = stdio.take_input();
        let feeder = child.stdin.take().map(|mut pipe| {
            thread::spawn(move || {
                if let Err(e) = pipe.write_all(&input) {
                    debug!(error = %e, "Generator closed stdin early");
                }
            })
        });

        let output = child.wait_with_output().map_err(|e| self.failed(e))?;
        if let Some(feeder) = feeder {
            let _ = feeder.join();
        }

        stdio.stdout().extend_from_slice(&output.stdout);
        stdio.stderr().extend_from_slice(&output.stderr);

        if output.status.success() {
            debug!("Generator exited successfully");
        } else {
            warn!(code = ?output.status.code(), "Generator exited with failure");
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use genrig_core::domain::InvocationKind;
    use genrig_core::error::GenrigError;
    use tempfile::TempDir;

    fn invocation(dir: &std::path::Path, args: &[&str]) -> Invocation {
        Invocation {
            kind: InvocationKind::Job,
            args: InvocationKind::Job.argv(args.iter().copied()),
            working_dir: dir.to_path_buf(),
            home: dir.join("home"),
        }
    }

    #[test]
    fn captures_both_streams_and_arguments() {
        let temp = TempDir::new().unwrap();
        let generator =
            ProcessGenerator::new("sh").with_args(["-c", r#"echo "$0 $*"; echo oops >&2"#]);
        let mut stdio = Stdio::new(None);
        generator
            .start(&invocation(temp.path(), &["redis", "-d", "nginx"]), &mut stdio)
            .unwrap();

        let out = stdio.into_output();
        assert_eq!(out.stdout, "job redis -d nginx\n");
        assert_eq!(out.stderr, "oops\n");
    }

    #[test]
    fn runs_in_working_dir_with_sandboxed_home() {
        let temp = TempDir::new().unwrap();
        let generator = ProcessGenerator::new("sh").with_args(["-c", r#"pwd; echo "$HOME""#]);
        let mut stdio = Stdio::new(None);
        generator.start(&invocation(temp.path(), &[]), &mut stdio).unwrap();

        let out = stdio.into_output();
        let mut lines = out.stdout.lines();
        let pwd = std::path::PathBuf::from(lines.next().unwrap());
        assert_eq!(pwd.canonicalize().unwrap(), temp.path().canonicalize().unwrap());
        assert_eq!(lines.next().unwrap(), temp.path().join("home").to_str().unwrap());
    }

    #[test]
    fn forwards_stdin() {
        let temp = TempDir::new().unwrap();
        let generator = ProcessGenerator::new("sh").with_args(["-c", "read answer; echo got $answer"]);
        let mut stdio = Stdio::new(Some("yes\n"));
        generator.start(&invocation(temp.path(), &[]), &mut stdio).unwrap();
        assert_eq!(stdio.into_output().stdout, "got yes\n");
    }

    #[test]
    fn non_zero_exit_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let generator = ProcessGenerator::new("sh").with_args(["-c", "echo failing >&2; exit 3"]);
        let mut stdio = Stdio::new(None);
        assert!(generator.start(&invocation(temp.path(), &[]), &mut stdio).is_ok());
        assert_eq!(stdio.into_output().stderr, "failing\n");
    }

    #[test]
    fn missing_binary_fails_to_start() {
        let temp = TempDir::new().unwrap();
        let generator = ProcessGenerator::new("genrig-no-such-generator");
        let err = generator
            .start(&invocation(temp.path(), &[]), &mut Stdio::new(None))
            .unwrap_err();
        assert!(matches!(
            err,
            GenrigError::Application(ApplicationError::GeneratorFailed { .. })
        ));
    }
}
