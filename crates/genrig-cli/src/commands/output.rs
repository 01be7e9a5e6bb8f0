//! `genrig output`: print a persisted generator log.

use std::fs;
use std::path::Path;

use genrig_core::{
    application::ApplicationError,
    domain::{InvocationKind, SandboxLayout},
};
use tracing::instrument;

use crate::{
    cli::{GlobalArgs, OutputArgs},
    commands::build_harness,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: OutputArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let harness = build_harness(&global, &config)?;

    let kind = match args.kind {
        Some(kind) => InvocationKind::from(kind),
        None => latest_kind(harness.layout()).ok_or_else(|| {
            CliError::Core(ApplicationError::NoCapturedOutput { path: None }.into())
        })?,
    };
    let log = harness.layout().log_path(kind);

    let text = if args.raw {
        read_raw(&log)?
    } else {
        harness.command_output_for(kind)?
    };

    if output.is_json() {
        output.json(&serde_json::json!({
            "kind": kind.subcommand(),
            "log": log.display().to_string(),
            "output": text,
        }))?;
    } else if args.raw {
        // Already newline-terminated as the generator wrote it.
        output.captured(&genrig_core::domain::CapturedOutput {
            stdout: text,
            stderr: String::new(),
        })?;
    } else {
        output.emit(&text)?;
    }
    Ok(())
}

/// The kind whose log was written most recently.
pub fn latest_kind(layout: &SandboxLayout) -> Option<InvocationKind> {
    InvocationKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let modified = fs::metadata(layout.log_path(kind)).and_then(|m| m.modified()).ok()?;
            Some((modified, kind))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, kind)| kind)
}

fn read_raw(log: &Path) -> CliResult<String> {
    if !log.exists() {
        return Err(CliError::Core(
            ApplicationError::NoCapturedOutput {
                path: Some(log.to_path_buf()),
            }
            .into(),
        ));
    }
    fs::read_to_string(log).with_cli_context(|| format!("Failed to read {}", log.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn touch(path: &Path, age: Duration) {
        let file = fs::File::create(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn latest_kind_prefers_newest_log() {
        let temp = TempDir::new().unwrap();
        let layout = SandboxLayout::new(temp.path(), temp.path());
        touch(&layout.log_path(InvocationKind::NewRelease), Duration::from_secs(60));
        touch(&layout.log_path(InvocationKind::Manifest), Duration::from_secs(1));

        assert_eq!(latest_kind(&layout), Some(InvocationKind::Manifest));
    }

    #[test]
    fn latest_kind_without_logs_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(latest_kind(&SandboxLayout::new(temp.path(), temp.path())), None);
    }

    #[test]
    fn raw_read_of_missing_log_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = read_raw(&temp.path().join("generate_job.out")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
