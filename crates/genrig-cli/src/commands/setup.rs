//! `genrig setup`: wipe and rebuild the sandbox.

use tracing::instrument;

use crate::{
    cli::GlobalArgs,
    commands::build_harness,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(global: GlobalArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let mut harness = build_harness(&global, &config)?;
    let root = harness.layout().root().to_path_buf();

    output.info(&format!("Rebuilding sandbox at {}", root.display()))?;
    harness.setup_universe()?;

    let home = harness.layout().home().to_path_buf();
    if output.is_json() {
        output.json(&serde_json::json!({
            "root": root.display().to_string(),
            "home": home.display().to_string(),
            "developer_config": harness.developer_config().map(|p| p.display().to_string()),
        }))?;
    } else {
        output.success(&format!("Sandbox ready, HOME={}", home.display()))?;
    }
    Ok(())
}
