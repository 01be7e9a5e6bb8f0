//! `genrig stage <project>`: copy a fixture release into the sandbox.

use tracing::instrument;

use crate::{
    cli::{GlobalArgs, StageArgs},
    commands::{build_harness, require_sandbox},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.project))]
pub fn execute(
    args: StageArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut harness = build_harness(&global, &config)?;
    require_sandbox(&harness)?;

    let target = harness.setup_project_release(&args.project)?;

    if output.is_json() {
        output.json(&serde_json::json!({ "project": args.project, "folder": target.display().to_string() }))?;
    } else {
        output.success(&format!("Staged {} at {}", args.project, target.display()))?;
    }
    Ok(())
}
