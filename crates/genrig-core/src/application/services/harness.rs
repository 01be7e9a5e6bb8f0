//! Sandbox harness - the main application service.
//!
//! A test drives one [`Harness`] through a linear protocol:
//!
//! 1. [`Harness::setup_universe`] wipes the sandbox root, creates the
//!    sandboxed home and primes git identity,
//! 2. [`Harness::setup_project_release`] optionally stages a fixture,
//! 3. `generate_*` runs the generator and captures its output,
//! 4. `job_file_exists` / `job_template_exists` / [`Harness::command_output`]
//!    check the result.
//!
//! The harness keeps its own working directory. Relative job paths resolve
//! against it, and the generator receives it explicitly, so the process
//! working directory is never touched here.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Generator, HomeEnvironment, VersionControl},
    },
    domain::{
        ActiveProject, CapturedOutput, ExpectationFailure, FileExpectation, GitCommand,
        GitIdentity, Invocation, InvocationKind, JobSpec, SandboxLayout, capture_stdios,
        job_path, job_spec_path, job_template_path, normalize_output, validate_project_name,
    },
    error::GenrigResult,
};

/// Developer configuration copied from the real home into the sandbox.
pub const DEVELOPER_CONFIG_FILE: &str = ".bosh_config";

/// Isolated sandbox plus the helpers that drive a generator inside it.
pub struct Harness {
    layout: SandboxLayout,
    filesystem: Box<dyn Filesystem>,
    generator: Box<dyn Generator>,
    vcs: Box<dyn VersionControl>,
    env: Box<dyn HomeEnvironment>,
    identity: GitIdentity,
    developer_config: Option<PathBuf>,
    cwd: PathBuf,
    active_project: Option<ActiveProject>,
    last_output: Option<PathBuf>,
    specs: HashMap<String, JobSpec>,
}

impl Harness {
    /// Create a harness over `layout` with the given adapters.
    ///
    /// The developer configuration path is resolved from the home directory
    /// *now*, before any later [`Harness::setup_universe`] overrides it.
    pub fn new(
        layout: SandboxLayout,
        filesystem: Box<dyn Filesystem>,
        generator: Box<dyn Generator>,
        vcs: Box<dyn VersionControl>,
        env: Box<dyn HomeEnvironment>,
    ) -> Self {
        let developer_config = env
            .original_home()
            .map(|home| home.join(DEVELOPER_CONFIG_FILE));
        let cwd = layout.root().to_path_buf();
        Self {
            layout,
            filesystem,
            generator,
            vcs,
            env,
            identity: GitIdentity::default(),
            developer_config,
            cwd,
            active_project: None,
            last_output: None,
            specs: HashMap::new(),
        }
    }

    /// Use `identity` when priming git.
    pub fn with_identity(mut self, identity: GitIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Override (or disable, with `None`) the developer config to seed.
    pub fn with_developer_config(mut self, path: Option<PathBuf>) -> Self {
        self.developer_config = path;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn layout(&self) -> &SandboxLayout {
        &self.layout
    }

    /// Directory relative job paths currently resolve against.
    pub fn current_dir(&self) -> &Path {
        &self.cwd
    }

    pub fn active_project(&self) -> Option<&ActiveProject> {
        self.active_project.as_ref()
    }

    pub fn developer_config(&self) -> Option<&Path> {
        self.developer_config.as_deref()
    }

    // ── Universe ──────────────────────────────────────────────────────────

    /// Build a fresh sandbox.
    ///
    /// Anything left at the root by a previous run is deleted first.
    /// Filesystem errors propagate; git priming failures do not.
    #[instrument(skip_all, fields(root = %self.layout.root().display()))]
    pub fn setup_universe(&mut self) -> GenrigResult<()> {
        let root = self.layout.root().to_path_buf();
        let home = self.layout.home().to_path_buf();

        self.filesystem.remove_dir_all(&root)?;
        self.filesystem.create_dir_all(&home)?;
        self.env.set_home(&home);

        if let Some(config) = self.developer_config.as_deref() {
            if let (true, Some(file_name)) = (self.filesystem.exists(config), config.file_name()) {
                self.filesystem.copy_file(config, &home.join(file_name))?;
                debug!(config = %config.display(), "Seeded developer config");
            }
        }

        self.cwd = root;
        self.active_project = None;
        self.last_output = None;
        self.specs.clear();

        self.setup_git();
        info!("Universe ready");
        Ok(())
    }

    /// Write the git identity into the sandboxed home's global config.
    pub fn setup_git(&mut self) {
        let command = self.identity.config_command();
        self.in_home_folder(|h| h.git(&command));
    }

    // ── Projects ──────────────────────────────────────────────────────────

    /// Copy `<fixtures>/releases/<name>` into the sandbox and make it the
    /// active project.
    #[instrument(skip(self))]
    pub fn setup_project_release(&mut self, name: &str) -> GenrigResult<PathBuf> {
        validate_project_name(name)?;
        let source = self.layout.release_fixture(name);
        if !self.filesystem.exists(&source) {
            return Err(ApplicationError::FixtureMissing {
                name: name.into(),
                path: source,
            }
            .into());
        }

        let target = self.layout.project_dir(name);
        self.filesystem.copy_dir(&source, &target)?;
        info!(target = %target.display(), "Fixture release staged");

        self.activate(name, target.clone());
        Ok(target)
    }

    /// Make `<root>/<name>` the active project without copying anything,
    /// typically after `generate_new_release` created it.
    pub fn setup_active_project_folder(&mut self, name: &str) -> GenrigResult<PathBuf> {
        validate_project_name(name)?;
        let folder = self.layout.project_dir(name);
        self.activate(name, folder.clone());
        Ok(folder)
    }

    fn activate(&mut self, name: &str, folder: PathBuf) {
        self.active_project = Some(ActiveProject {
            name: name.into(),
            folder,
        });
    }

    // ── Scoped working directory ──────────────────────────────────────────

    /// Run `op` with the sandbox root as working directory.
    pub fn in_tmp_folder<R>(&mut self, op: impl FnOnce(&mut Self) -> R) -> R {
        let dir = self.layout.root().to_path_buf();
        self.within(dir, op)
    }

    /// Run `op` inside the active project, or the root when none is active.
    pub fn in_project_folder<R>(&mut self, op: impl FnOnce(&mut Self) -> R) -> R {
        let dir = self
            .active_project
            .as_ref()
            .map(|p| p.folder.clone())
            .unwrap_or_else(|| self.layout.root().to_path_buf());
        self.within(dir, op)
    }

    /// Run `op` inside the sandboxed home.
    pub fn in_home_folder<R>(&mut self, op: impl FnOnce(&mut Self) -> R) -> R {
        let dir = self.layout.home().to_path_buf();
        self.within(dir, op)
    }

    /// Swap the working directory for the duration of `op`. The previous one
    /// is restored on every exit, panics included.
    fn within<R>(&mut self, dir: PathBuf, op: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.cwd, dir);
        let result = panic::catch_unwind(AssertUnwindSafe(|| op(self)));
        self.cwd = previous;
        match result {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    // ── Generator ─────────────────────────────────────────────────────────

    /// `new <args..>`, e.g. `generate_new_release(["redis", "--s3"])`.
    pub fn generate_new_release<I, S>(&mut self, args: I) -> GenrigResult<CapturedOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generate(InvocationKind::NewRelease, args)
    }

    /// `job <args..>`, e.g. `generate_job(["mywebapp", "-d", "nginx"])`.
    pub fn generate_job<I, S>(&mut self, args: I) -> GenrigResult<CapturedOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generate(InvocationKind::Job, args)
    }

    /// `manifest <args..>`, e.g. `generate_manifest(["path/to/release"])`.
    pub fn generate_manifest<I, S>(&mut self, args: I) -> GenrigResult<CapturedOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generate(InvocationKind::Manifest, args)
    }

    pub fn generate<I, S>(&mut self, kind: InvocationKind, args: I) -> GenrigResult<CapturedOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generate_with_input(kind, args, None)
    }

    /// Run the generator with `input` available on stdin.
    ///
    /// Stdout followed by stderr is written to the kind's log file under the
    /// root, replacing the previous log of the same kind.
    #[instrument(skip(self, args, input), fields(cwd = %self.cwd.display()))]
    pub fn generate_with_input<I, S>(
        &mut self,
        kind: InvocationKind,
        args: I,
        input: Option<&str>,
    ) -> GenrigResult<CapturedOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation {
            kind,
            args: kind.argv(args),
            working_dir: self.cwd.clone(),
            home: self.layout.home().to_path_buf(),
        };
        debug!(args = ?invocation.args, "Starting generator");

        let generator = &self.generator;
        let (started, output) = capture_stdios(input, |stdio| generator.start(&invocation, stdio));
        started?;

        let log = self.layout.log_path(kind);
        self.filesystem.write_file(&log, &output.combined())?;
        debug!(
            log = %log.display(),
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            "Generator output captured"
        );
        self.last_output = Some(log);
        Ok(output)
    }

    /// Output of the most recent invocation, colour codes stripped and
    /// trailing whitespace trimmed.
    pub fn command_output(&self) -> GenrigResult<String> {
        let path = self
            .last_output
            .as_ref()
            .ok_or(ApplicationError::NoCapturedOutput { path: None })?;
        self.read_log(path)
    }

    /// Like [`Harness::command_output`] for the persisted log of `kind`.
    pub fn command_output_for(&self, kind: InvocationKind) -> GenrigResult<String> {
        let path = self.layout.log_path(kind);
        if !self.filesystem.exists(&path) {
            return Err(ApplicationError::NoCapturedOutput { path: Some(path) }.into());
        }
        self.read_log(&path)
    }

    fn read_log(&self, path: &Path) -> GenrigResult<String> {
        let text = self.filesystem.read_to_string(path)?;
        Ok(normalize_output(&text))
    }

    // ── Expectations ──────────────────────────────────────────────────────

    /// Check that `jobs/<job>/<segments..>` exists (and is executable when
    /// requested), relative to the working directory.
    pub fn check_job_file<S: AsRef<str>>(
        &self,
        job: &str,
        segments: &[S],
        expectation: FileExpectation,
    ) -> GenrigResult<()> {
        let relative = job_path(job, segments);
        let path = self.cwd.join(&relative);
        if !self.filesystem.exists(&path) {
            return Err(ExpectationFailure::MissingFile { path: relative }.into());
        }
        if expectation.executable && !self.filesystem.is_executable(&path) {
            return Err(ExpectationFailure::NotExecutable { path: relative }.into());
        }
        Ok(())
    }

    /// Assert form of [`Harness::check_job_file`]; panics on failure.
    ///
    /// ```ignore
    /// h.job_file_exists("mywebapp", &["monit"], FileExpectation::default());
    /// h.job_file_exists("mywebapp", &["templates", "mywebapp_ctl"], FileExpectation::executable());
    /// ```
    #[track_caller]
    pub fn job_file_exists<S: AsRef<str>>(&self, job: &str, segments: &[S], expectation: FileExpectation) {
        if let Err(e) = self.check_job_file(job, segments, expectation) {
            panic!("job_file_exists failed in {}: {e}", self.cwd.display());
        }
    }

    /// Check that `jobs/<job>/templates/<template>` exists and the job spec
    /// maps `template` to exactly `spec_path`.
    pub fn check_job_template(&mut self, job: &str, template: &str, spec_path: &str) -> GenrigResult<()> {
        let relative = job_template_path(job, template);
        if !self.filesystem.exists(&self.cwd.join(&relative)) {
            return Err(ExpectationFailure::MissingFile { path: relative }.into());
        }

        match self.job_spec(job)?.template_path(template) {
            None => Err(ExpectationFailure::MissingTemplateEntry {
                job: job.into(),
                template: template.into(),
                expected: spec_path.into(),
            }
            .into()),
            Some(actual) if actual != spec_path => Err(ExpectationFailure::TemplatePathMismatch {
                job: job.into(),
                template: template.into(),
                expected: spec_path.into(),
                actual: actual.into(),
            }
            .into()),
            Some(_) => Ok(()),
        }
    }

    /// Assert form of [`Harness::check_job_template`]; panics on failure.
    ///
    /// ```ignore
    /// h.job_template_exists("mywebapp", "mywebapp_ctl.erb", "bin/mywebapp_ctl");
    /// ```
    #[track_caller]
    pub fn job_template_exists(&mut self, job: &str, template: &str, spec_path: &str) {
        if let Err(e) = self.check_job_template(job, template, spec_path) {
            panic!("job_template_exists failed in {}: {e}", self.cwd.display());
        }
    }

    /// Decoded `jobs/<job>/spec`, parsed once per job name.
    pub fn job_spec(&mut self, job: &str) -> GenrigResult<&JobSpec> {
        if !self.specs.contains_key(job) {
            let relative = job_spec_path(job);
            let text = self.filesystem.read_to_string(&self.cwd.join(&relative))?;
            let spec = JobSpec::from_yaml(&text, &relative)?;
            self.specs.insert(job.to_owned(), spec);
        }
        Ok(&self.specs[job])
    }

    // ── Version control ───────────────────────────────────────────────────

    /// Run `git` in the working directory with the sandboxed home.
    ///
    /// ```ignore
    /// h.git(&GitCommand::bare("init"));
    /// h.git(&GitCommand::each([("add", "onefile.rb"), ("rm", "badfile.cxx")]));
    /// ```
    pub fn git(&self, command: &GitCommand) {
        for argv in command.argvs() {
            debug!(?argv, cwd = %self.cwd.display(), "git");
            self.vcs.run(&argv, &self.cwd, self.layout.home());
        }
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("layout", &self.layout)
            .field("cwd", &self.cwd)
            .field("active_project", &self.active_project)
            .field("last_output", &self.last_output)
            .finish_non_exhaustive()
    }
}
