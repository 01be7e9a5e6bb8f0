//! Command handlers, one module per subcommand.
//!
//! Each invocation of the binary builds a fresh [`Harness`] over the
//! configured sandbox; state shared between invocations lives on disk.

pub mod check;
pub mod completions;
pub mod config;
pub mod git;
pub mod init;
pub mod output;
pub mod run;
pub mod setup;
pub mod stage;

use genrig_adapters::{GitCli, LocalFilesystem, ProcessEnvironment, ProcessGenerator};
use genrig_core::{application::Harness, domain::SandboxLayout};
use tracing::debug;

use crate::{
    cli::{Folder, GlobalArgs, LocationArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
};

/// Harness over the configured sandbox, with CLI overrides applied.
pub fn build_harness(global: &GlobalArgs, config: &AppConfig) -> CliResult<Harness> {
    let sandbox = &config.sandbox;
    let root = global.root.as_ref().unwrap_or(&sandbox.root);
    let fixtures = global.fixtures.as_ref().unwrap_or(&sandbox.fixtures);

    // Absolute paths keep the generator's view stable once it runs in a
    // different working directory.
    let root = std::path::absolute(root).with_cli_context(|| format!("Invalid sandbox root '{}'", root.display()))?;
    let fixtures = std::path::absolute(fixtures)
        .with_cli_context(|| format!("Invalid fixtures directory '{}'", fixtures.display()))?;
    debug!(root = %root.display(), fixtures = %fixtures.display(), "Sandbox layout");

    let generator = ProcessGenerator::new(&config.generator.program)
        .with_args(&config.generator.args)
        .with_home_var(&sandbox.home_var);
    let vcs = GitCli::new(&config.git.program).with_home_var(&sandbox.home_var);

    let mut harness = Harness::new(
        SandboxLayout::new(root, fixtures),
        Box::new(LocalFilesystem::new()),
        Box::new(generator),
        Box::new(vcs),
        Box::new(ProcessEnvironment::for_var(&sandbox.home_var)),
    )
    .with_identity(config.identity());

    if let Some(path) = &sandbox.developer_config {
        harness = harness.with_developer_config(Some(path.clone()));
    }
    Ok(harness)
}

/// Fail early when `genrig setup` has not been run.
pub fn require_sandbox(harness: &Harness) -> CliResult<()> {
    if harness.layout().home().is_dir() {
        Ok(())
    } else {
        Err(CliError::InvalidInput {
            message: format!(
                "no sandbox at {}; run 'genrig setup' first",
                harness.layout().root().display()
            ),
        })
    }
}

/// Run `op` in the folder selected by `location`.
pub fn within<R>(
    harness: &mut Harness,
    location: &LocationArgs,
    op: impl FnOnce(&mut Harness) -> CliResult<R>,
) -> CliResult<R> {
    if let Some(project) = &location.project {
        harness.setup_active_project_folder(project)?;
    }
    match location.folder {
        Folder::Tmp => harness.in_tmp_folder(op),
        Folder::Project => harness.in_project_folder(op),
        Folder::Home => harness.in_home_folder(op),
    }
}
