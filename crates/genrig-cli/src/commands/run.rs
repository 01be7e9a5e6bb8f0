//! `genrig run <kind> [-- args..]`: invoke the generator with captured output.

use genrig_core::domain::InvocationKind;
use tracing::{info, instrument};

use crate::{
    cli::{GlobalArgs, RunArgs},
    commands::{build_harness, require_sandbox, within},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(kind = ?args.kind))]
pub fn execute(
    args: RunArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut harness = build_harness(&global, &config)?;
    require_sandbox(&harness)?;

    let kind = InvocationKind::from(args.kind);
    let input = args.input;
    let generator_args = args.args;
    let captured = within(&mut harness, &args.location, |h| {
        Ok(h.generate_with_input(kind, generator_args, input.as_deref())?)
    })?;

    let log = harness.layout().log_path(kind);
    info!(log = %log.display(), "Generator output saved");

    if output.is_json() {
        output.json(&serde_json::json!({
            "kind": kind.subcommand(),
            "log": log.display().to_string(),
            "stdout": captured.stdout,
            "stderr": captured.stderr,
        }))?;
    } else {
        output.captured(&captured)?;
    }
    Ok(())
}
