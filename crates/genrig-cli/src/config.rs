//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (`--root`, `--fixtures`, `--no-color`; applied at the call-site)
//! 2. Environment variables: `GENRIG_<SECTION>__<KEY>`, e.g. `GENRIG_GENERATOR__PROGRAM`
//! 3. Config file (`--config FILE`, else `./.genrig.toml`, else [`AppConfig::config_path`])
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use genrig_core::domain::GitIdentity;

/// Config file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".genrig.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub sandbox: SandboxConfig,
    pub generator: GeneratorConfig,
    pub git: GitConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Wiped and rebuilt by `genrig setup`.
    pub root: PathBuf,
    /// Holds `releases/<name>` fixture projects.
    pub fixtures: PathBuf,
    /// Variable overridden to point at the sandboxed home.
    pub home_var: String,
    /// Developer config to seed; defaults to `<original home>/.bosh_config`.
    pub developer_config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub program: String,
    /// Placed before the subcommand, e.g. `["exec", "bosh-gen"]`.
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
    pub program: String,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let identity = GitIdentity::default();
        Self {
            sandbox: SandboxConfig {
                root: PathBuf::from("spec/tmp"),
                fixtures: PathBuf::from("spec/fixtures"),
                home_var: "HOME".into(),
                developer_config: None,
            },
            generator: GeneratorConfig {
                program: "bosh-gen".into(),
                args: Vec::new(),
            },
            git: GitConfig {
                program: "git".into(),
                user_name: identity.name,
                user_email: identity.email,
            },
            output: OutputConfig { no_color: false },
        }
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        let mut builder = Config::builder().add_source(defaults);
        builder = match config_file {
            Some(path) => builder.add_source(toml_file(path).required(true)),
            None => builder
                .add_source(toml_file(&Self::config_path()).required(false))
                .add_source(toml_file(Path::new(LOCAL_CONFIG_FILE)).required(false)),
        };
        builder = builder.add_source(
            Environment::with_prefix("GENRIG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("generator.args"),
        );

        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.genrig.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "genrig", "genrig")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    pub fn identity(&self) -> GitIdentity {
        GitIdentity::new(&self.git.user_name, &self.git.user_email)
    }
}

fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml)
}
