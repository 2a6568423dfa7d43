// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod config;

pub use config::*;

use crate::utils::misc::LoggingColor;
use directories::ProjectDirs;
use std::path::PathBuf;

pub static HELP_MESSAGE: &str = "\
{name} {version}
{author}
{about}

USAGE:
  {usage}

SUBCOMMANDS:
{subcommands}

OPTIONS:
{options}
";

/// Options shared by every subcommand.
#[derive(Default, Debug, clap::Args)]
pub struct CliOpts {
    /// Enable or disable colored logging in `stderr`
    #[arg(long, global = true, default_value = "auto")]
    pub color: LoggingColor,
    /// Also write logs to hourly rotated files in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

/// Where the configuration file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPath {
    Cli(PathBuf),
    Env(PathBuf),
    Project(PathBuf),
}

impl ConfigPath {
    pub fn to_path_buf(&self) -> &PathBuf {
        match self {
            ConfigPath::Cli(path) | ConfigPath::Env(path) | ConfigPath::Project(path) => path,
        }
    }
}

/// Looks for a configuration file, in order: the `--config` flag, the
/// `RLN_MIGRATE_CONFIG` variable, then `config.toml` in the platform config
/// directory.
pub fn find_config_path(config: Option<&PathBuf>) -> Option<ConfigPath> {
    if let Some(path) = config {
        return Some(ConfigPath::Cli(path.clone()));
    }
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|it| !it.is_empty()) {
        return Some(ConfigPath::Env(path.into()));
    }
    if let Some(dirs) = ProjectDirs::from("org", "waku", "rln-migrate") {
        let path = dirs.config_dir().join("config.toml");
        if path.exists() {
            return Some(ConfigPath::Project(path));
        }
    }
    None
}
