//! `genrig check`: assertions over generated jobs.

use genrig_core::domain::{FileExpectation, job_path, job_template_path};
use tracing::instrument;

use crate::{
    cli::{CheckCommands, GlobalArgs},
    commands::{build_harness, require_sandbox, within},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    cmd: CheckCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut harness = build_harness(&global, &config)?;
    require_sandbox(&harness)?;

    let (checked, detail) = match cmd {
        CheckCommands::File {
            job,
            path,
            executable,
            location,
        } => {
            let expectation = FileExpectation { executable };
            within(&mut harness, &location, |h| {
                Ok(h.check_job_file(&job, &path, expectation)?)
            })?;
            let shown = job_path(&job, &path).display().to_string();
            let detail = if executable { "exists and is executable" } else { "exists" };
            (shown, detail.to_owned())
        }
        CheckCommands::Template {
            job,
            template,
            installed,
            location,
        } => {
            within(&mut harness, &location, |h| {
                Ok(h.check_job_template(&job, &template, &installed)?)
            })?;
            let shown = job_template_path(&job, &template).display().to_string();
            (shown, format!("is installed at {installed}"))
        }
    };

    if output.is_json() {
        output.json(&serde_json::json!({ "path": checked, "ok": true, "detail": detail }))?;
    } else {
        output.success(&format!("{checked} {detail}"))?;
    }
    Ok(())
}
