//! Integration tests for the genrig binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A scratch directory holding the sandbox root, fixtures and a fake home.
struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("fakehome")).unwrap();
        fs::create_dir_all(temp.path().join("fixtures/releases/demo/jobs")).unwrap();
        fs::write(temp.path().join("fixtures/releases/demo/README.md"), "demo release\n").unwrap();
        Self { temp }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.temp.path().join(rel)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("genrig").unwrap();
        cmd.current_dir(self.temp.path())
            .env("HOME", self.path("fakehome"))
            .env("GENRIG_SANDBOX__ROOT", self.path("tmp"))
            .env("GENRIG_SANDBOX__FIXTURES", self.path("fixtures"))
            .env("GENRIG_GIT__PROGRAM", "genrig-test-no-git")
            .env_remove("RUST_LOG");
        cmd
    }

    fn setup(&self) {
        self.cmd().arg("setup").assert().success();
    }
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("genrig")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("stage"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn version_flag() {
    Command::cargo_bin("genrig")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn setup_seeds_only_developer_config() {
    let ws = Workspace::new();
    fs::write(ws.path("fakehome/.bosh_config"), "target: https://192.168.50.4:25555\n").unwrap();
    fs::create_dir_all(ws.path("tmp/leftover")).unwrap();

    ws.cmd()
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sandbox ready"));

    let entries: Vec<_> = fs::read_dir(ws.path("tmp/home"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, [".bosh_config"]);
    assert!(!ws.path("tmp/leftover").exists());
}

#[test]
fn setup_without_developer_config_leaves_home_empty() {
    let ws = Workspace::new();
    ws.setup();
    assert_eq!(fs::read_dir(ws.path("tmp/home")).unwrap().count(), 0);
}

#[test]
fn stage_copies_fixture() {
    let ws = Workspace::new();
    ws.setup();

    ws.cmd()
        .args(["stage", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Staged demo"));

    assert_eq!(
        fs::read_to_string(ws.path("tmp/demo/README.md")).unwrap(),
        "demo release\n"
    );
    assert!(ws.path("tmp/demo/jobs").is_dir());
}

#[test]
fn stage_missing_fixture_is_not_found() {
    let ws = Workspace::new();
    ws.setup();

    ws.cmd()
        .args(["stage", "redis"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Fixture release 'redis' not found"));
}

#[test]
fn commands_before_setup_ask_for_setup() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["run", "job", "--", "web"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("genrig setup"));
}

#[test]
fn output_before_any_run_is_not_found() {
    let ws = Workspace::new();
    ws.setup();

    ws.cmd()
        .arg("output")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No captured generator output"));
}

#[test]
fn missing_generator_is_a_configuration_error() {
    let ws = Workspace::new();
    ws.setup();

    ws.cmd()
        .env("GENRIG_GENERATOR__PROGRAM", "genrig-test-no-such-generator")
        .args(["run", "new", "--", "demo"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("could not be started"));
}

#[test]
fn config_get_reads_environment() {
    let ws = Workspace::new();

    ws.cmd()
        .env("GENRIG_GENERATOR__PROGRAM", "my-generator")
        .args(["config", "get", "generator.program"])
        .assert()
        .success()
        .stdout("my-generator\n");
}

#[test]
fn config_get_unknown_key_fails() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "get", "nope.nothing"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn init_local_writes_loadable_config() {
    let ws = Workspace::new();

    ws.cmd().args(["init", "--local"]).assert().success();
    assert!(ws.path(".genrig.toml").is_file());

    // Second run refuses to overwrite without --force.
    ws.cmd()
        .args(["init", "--local"])
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));

    ws.cmd()
        .env_remove("GENRIG_GIT__PROGRAM")
        .args(["config", "get", "git.program"])
        .assert()
        .success()
        .stdout("git\n");
}

#[test]
fn completions_mention_binary() {
    Command::cargo_bin("genrig")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("genrig"));
}

#[cfg(unix)]
mod generator_flow {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const GENERATOR: &str = r#"#!/bin/sh
sub="$1"; shift
case "$sub" in
  job)
    mkdir -p "jobs/$1/templates"
    touch "jobs/$1/monit"
    printf '#!/bin/sh\n' > "jobs/$1/templates/$1_ctl.erb"
    chmod +x "jobs/$1/templates/$1_ctl.erb"
    printf 'name: %s\ntemplates:\n  %s_ctl.erb: bin/%s_ctl\n' "$1" "$1" "$1" > "jobs/$1/spec"
    printf '\033[32mcreate\033[0m jobs/%s\n' "$1"
    echo "warning: no packages" >&2
    ;;
  *)
    echo "unsupported $sub" >&2
    exit 1
    ;;
esac
"#;

    fn workspace_with_generator() -> Workspace {
        let ws = Workspace::new();
        let script = ws.path("fake-gen");
        fs::write(&script, GENERATOR).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        ws
    }

    fn cmd(ws: &Workspace) -> Command {
        let mut cmd = ws.cmd();
        cmd.env("GENRIG_GENERATOR__PROGRAM", ws.path("fake-gen"));
        cmd
    }

    #[test]
    fn run_check_and_read_back() {
        let ws = workspace_with_generator();
        ws.setup();
        cmd(&ws).args(["stage", "demo"]).assert().success();

        cmd(&ws)
            .args(["run", "job", "--project", "demo", "--", "web"])
            .assert()
            .success()
            .stdout(predicate::str::contains("jobs/web"))
            .stderr(predicate::str::contains("warning: no packages"));

        assert!(ws.path("tmp/demo/jobs/web/monit").is_file());
        assert!(ws.path("tmp/generate_job.out").is_file());

        cmd(&ws)
            .arg("output")
            .assert()
            .success()
            .stdout("create jobs/web\nwarning: no packages\n");

        cmd(&ws)
            .args(["output", "--kind", "job", "--raw"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\x1b[32mcreate\x1b[0m"));

        cmd(&ws)
            .args(["check", "file", "web", "monit", "--project", "demo"])
            .assert()
            .success();

        cmd(&ws)
            .args([
                "check", "file", "web", "templates", "web_ctl.erb", "--executable", "--project", "demo",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("is executable"));

        cmd(&ws)
            .args(["check", "template", "web", "web_ctl.erb", "bin/web_ctl", "--project", "demo"])
            .assert()
            .success();
    }

    #[test]
    fn failed_checks_exit_with_two() {
        let ws = workspace_with_generator();
        ws.setup();
        cmd(&ws).args(["stage", "demo"]).assert().success();
        cmd(&ws)
            .args(["run", "job", "--project", "demo", "--", "web"])
            .assert()
            .success();

        cmd(&ws)
            .args(["check", "file", "web", "missing", "--project", "demo"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Check failed"))
            .stderr(predicate::str::contains("jobs/web/missing"));

        cmd(&ws)
            .args(["check", "file", "web", "monit", "--executable", "--project", "demo"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("to be executable"));

        cmd(&ws)
            .args(["check", "template", "web", "web_ctl.erb", "bin/other", "--project", "demo"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("expected 'bin/other'"));

        // Without --project the root is used, where no job exists.
        cmd(&ws)
            .args(["check", "file", "web", "monit"])
            .assert()
            .code(2);
    }

    #[test]
    fn each_run_overwrites_its_log() {
        let ws = workspace_with_generator();
        ws.setup();

        cmd(&ws).args(["run", "job", "--in", "tmp", "--", "first"]).assert().success();
        cmd(&ws).args(["run", "job", "--in", "tmp", "--", "second"]).assert().success();

        let log = fs::read_to_string(ws.path("tmp/generate_job.out")).unwrap();
        assert!(log.contains("jobs/second"));
        assert!(!log.contains("jobs/first"));
    }

    #[test]
    fn json_output_carries_both_streams() {
        let ws = workspace_with_generator();
        ws.setup();

        cmd(&ws)
            .args(["--output-format", "json", "run", "manifest", "--", "."])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""kind": "manifest""#))
            .stdout(predicate::str::contains("unsupported manifest"));
    }
}
