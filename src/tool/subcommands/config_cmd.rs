// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::ConfigArgs;

#[derive(Debug, clap::Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML, secrets redacted
    Dump {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

impl ConfigCommands {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Dump { config } => {
                let config = config.load()?;
                print!("{}", toml::to_string(&config.redacted())?);
                Ok(())
            }
        }
    }
}
