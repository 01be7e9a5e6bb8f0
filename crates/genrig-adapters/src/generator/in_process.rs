//! Generator implemented as a Rust function.

use std::fmt;

use tracing::instrument;

use genrig_core::{
    application::ports::Generator,
    domain::{Invocation, Stdio},
    error::GenrigResult,
};

use crate::environment::CurrentDirGuard;

/// Calls `entry` with the process working directory switched to the
/// invocation's working directory.
///
/// ```
/// use std::io::Write;
/// use genrig_adapters::InProcessGenerator;
///
/// let generator = InProcessGenerator::new(|invocation, stdio| {
///     writeln!(stdio.stdout(), "ran {}", invocation.args.join(" ")).ok();
///     Ok(())
/// });
/// # let _ = generator;
/// ```
pub struct InProcessGenerator<F> {
    entry: F,
}

impl<F> InProcessGenerator<F>
where
    F: Fn(&Invocation, &mut Stdio) -> GenrigResult<()> + Send + Sync,
{
    pub fn new(entry: F) -> Self {
        Self { entry }
    }
}

impl<F> fmt::Debug for InProcessGenerator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProcessGenerator").finish_non_exhaustive()
    }
}

impl<F> Generator for InProcessGenerator<F>
where
    F: Fn(&Invocation, &mut Stdio) -> GenrigResult<()> + Send + Sync,
{
    #[instrument(skip_all, fields(subcommand = %invocation.kind))]
    fn start(&self, invocation: &Invocation, stdio: &mut Stdio) -> GenrigResult<()> {
        let _guard = CurrentDirGuard::enter(&invocation.working_dir)?;
        (self.entry)(invocation, stdio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genrig_core::domain::InvocationKind;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn entry_sees_working_dir_as_process_cwd() {
        let temp = TempDir::new().unwrap();
        let before = std::env::current_dir().unwrap();
        let generator = InProcessGenerator::new(|_, stdio| {
            std::fs::write("created.txt", "x").unwrap();
            writeln!(stdio.stdout(), "done").unwrap();
            Ok(())
        });
        let invocation = Invocation {
            kind: InvocationKind::NewRelease,
            args: InvocationKind::NewRelease.argv(["demo"]),
            working_dir: temp.path().to_path_buf(),
            home: temp.path().join("home"),
        };

        let mut stdio = Stdio::new(None);
        generator.start(&invocation, &mut stdio).unwrap();

        assert!(temp.path().join("created.txt").exists());
        assert_eq!(stdio.into_output().stdout, "done\n");
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
