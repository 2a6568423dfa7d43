// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod cli;
pub mod logger;

use crate::cli_shared::cli::{Config, ConfigError, ConfigPath, find_config_path};
use std::path::PathBuf;

/// Reads the configuration file, if any, on top of the defaults. Environment
/// variables are not applied here.
pub fn read_config(
    config_path_opt: Option<&PathBuf>,
) -> Result<(Option<ConfigPath>, Config), ConfigError> {
    match find_config_path(config_path_opt) {
        Some(path) => {
            let file = path.to_path_buf();
            let toml = std::fs::read_to_string(file).map_err(|source| ConfigError::Read {
                path: file.clone(),
                source,
            })?;
            let config = toml::from_str(&toml).map_err(|source| ConfigError::Parse {
                path: file.clone(),
                source,
            })?;
            Ok((Some(path), config))
        }
        None => Ok((None, Config::default())),
    }
}
