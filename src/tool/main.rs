// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::ffi::OsString;

use super::subcommands::{Cli, Subcommand};
use crate::cli_shared::logger::setup_logger;
use clap::Parser as _;

pub fn main<ArgT>(args: impl IntoIterator<Item = ArgT>) -> anyhow::Result<()>
where
    ArgT: Into<OsString> + Clone,
{
    // Capture Cli inputs
    let Cli { opts, cmd } = Cli::parse_from(args);
    let _guards = setup_logger(&opts);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            // Run command
            match cmd {
                Subcommand::Migrate(cmd) => cmd.run().await,
                Subcommand::Scan(cmd) => cmd.run().await,
                Subcommand::Config(cmd) => cmd.run(),
            }
        })
}
