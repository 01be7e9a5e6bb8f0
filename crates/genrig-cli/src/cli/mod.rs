//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No harness logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use genrig_core::domain::InvocationKind;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "genrig",
    bin_name = "genrig",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Sandboxed runs of a release scaffolding generator",
    long_about = "genrig builds a disposable sandbox with its own HOME, stages \
                  fixture releases into it, runs generator subcommands with \
                  captured output and checks the jobs and templates they produce.",
    after_help = "EXAMPLES:\n\
        \x20 genrig setup\n\
        \x20 genrig stage redis\n\
        \x20 genrig run job --project redis -- mywebapp -d nginx\n\
        \x20 genrig check file mywebapp templates mywebapp_ctl --executable --project redis\n\
        \x20 genrig output --kind job",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(
        about = "Wipe and rebuild the sandbox (home, developer config, git identity)",
        after_help = "EXAMPLES:\n\
            \x20 genrig setup\n\
            \x20 genrig setup --root spec/tmp --fixtures spec/fixtures"
    )]
    Setup,

    #[command(
        about = "Copy a fixture release into the sandbox",
        after_help = "EXAMPLES:\n\
            \x20 genrig stage redis   # fixtures/releases/redis -> <root>/redis"
    )]
    Stage(StageArgs),

    #[command(
        visible_alias = "r",
        about = "Run a generator subcommand and capture its output",
        after_help = "EXAMPLES:\n\
            \x20 genrig run new -- redis --s3\n\
            \x20 genrig run job --project redis -- mywebapp -d nginx\n\
            \x20 genrig run manifest --project redis -- ."
    )]
    Run(RunArgs),

    #[command(
        about = "Print captured generator output",
        after_help = "EXAMPLES:\n\
            \x20 genrig output              # most recent log\n\
            \x20 genrig output --kind job   # generate_job.out\n\
            \x20 genrig output --raw        # keep colour codes"
    )]
    Output(OutputArgs),

    #[command(about = "Check generated job files and templates", subcommand)]
    Check(CheckCommands),

    #[command(
        about = "Run git inside the sandbox with the sandboxed HOME",
        after_help = "EXAMPLES:\n\
            \x20 genrig git init --project redis\n\
            \x20 genrig git --project redis add -- jobs/mywebapp"
    )]
    Git(GitArgs),

    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 genrig init           # default location\n\
            \x20 genrig init --local   # ./.genrig.toml"
    )]
    Init(InitArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 genrig completions bash > ~/.local/share/bash-completion/completions/genrig\n\
            \x20 genrig completions zsh  > ~/.zfunc/_genrig"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 genrig config get generator.program\n\
            \x20 genrig config list"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Where a command runs inside the sandbox.
#[derive(Debug, Args)]
pub struct LocationArgs {
    #[arg(
        long = "in",
        value_enum,
        default_value = "project",
        help = "Folder to run in (project falls back to the root)"
    )]
    pub folder: Folder,

    /// Staged project to treat as active; nothing is copied.
    #[arg(short = 'p', long = "project", value_name = "NAME")]
    pub project: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Folder {
    /// The sandbox root.
    Tmp,
    /// The active project, or the root when none is selected.
    Project,
    /// The sandboxed home.
    Home,
}

/// Generator subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    #[value(alias = "release")]
    New,
    Job,
    Manifest,
}

impl From<Kind> for InvocationKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::New => InvocationKind::NewRelease,
            Kind::Job => InvocationKind::Job,
            Kind::Manifest => InvocationKind::Manifest,
        }
    }
}

// ── stage / run / output ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StageArgs {
    #[arg(value_name = "PROJECT", help = "Fixture release name")]
    pub project: String,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(value_enum, help = "Generator subcommand")]
    pub kind: Kind,

    #[command(flatten)]
    pub location: LocationArgs,

    /// Text fed to the generator's stdin.
    #[arg(long = "input", value_name = "TEXT")]
    pub input: Option<String>,

    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Arguments passed to the generator subcommand"
    )]
    pub args: Vec<String>,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Defaults to the most recently written log.
    #[arg(short = 'k', long = "kind", value_enum)]
    pub kind: Option<Kind>,

    #[arg(long = "raw", help = "Print the log as written, colour codes included")]
    pub raw: bool,
}

// ── check ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum CheckCommands {
    /// Assert that jobs/<JOB>/<PATH..> exists.
    File {
        job: String,

        #[arg(required = true, num_args = 1.., value_name = "PATH")]
        path: Vec<String>,

        #[arg(short = 'x', long = "executable", help = "Also require the executable bit")]
        executable: bool,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Assert that jobs/<JOB>/templates/<TEMPLATE> exists and the job spec
    /// installs it at <INSTALLED>.
    Template {
        job: String,
        template: String,
        installed: String,

        #[command(flatten)]
        location: LocationArgs,
    },
}

// ── git ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GitArgs {
    #[arg(value_name = "SUBCOMMAND")]
    pub subcommand: String,

    #[command(flatten)]
    pub location: LocationArgs,

    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.genrig.toml` in the current directory.
    #[arg(long = "local", help = "Create local configuration in current directory")]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `sandbox.root`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
