//! `genrig git <subcommand> [args..]`

use genrig_core::domain::{GitCommand, quote_arg};
use tracing::instrument;

use crate::{
    cli::{GitArgs, GlobalArgs},
    commands::{build_harness, require_sandbox, within},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Runs git with the sandboxed home. Like the harness helper, the exit
/// status is not checked.
#[instrument(skip_all, fields(subcommand = %args.subcommand))]
pub fn execute(
    args: GitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut harness = build_harness(&global, &config)?;
    require_sandbox(&harness)?;

    let command = git_command(args.subcommand, &args.args);
    let cwd = within(&mut harness, &args.location, |h| {
        h.git(&command);
        Ok(h.current_dir().to_path_buf())
    })?;

    output.info(&format!("Ran git in {}", cwd.display()))?;
    Ok(())
}

/// No extra arguments: the subcommand string is split shell-style, so
/// `genrig git "commit -m 'first'"` works. Otherwise each argument is
/// passed through unchanged.
fn git_command(subcommand: String, args: &[String]) -> GitCommand {
    if args.is_empty() {
        GitCommand::bare(subcommand)
    } else {
        let joined = args.iter().map(|a| quote_arg(a)).collect::<Vec<_>>().join(" ");
        GitCommand::each([(subcommand, joined)])
    }
}
