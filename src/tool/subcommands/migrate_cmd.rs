// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{ConfigArgs, connect};
use crate::migration::Migrator;
use crate::utils::io::write_json;
use anyhow::Context as _;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub struct MigrateCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Skip the first N batches, registered by an earlier run that failed at
    /// batch N
    #[arg(long, default_value_t = 0)]
    pub resume_from_batch: usize,
    /// Write the report as JSON to this file, also when the run fails
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl MigrateCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.config.load()?;
        let mut settings = config.clone().into_settings(true)?;
        settings.resume_from_batch = self.resume_from_batch;
        let client = connect(&config.rpc).await?;

        let result = Migrator::new(&client, &settings).migrate().await;
        let report = match &result {
            Ok(report) => Some(report),
            Err(e) => e.partial_report(),
        };
        if let Some(report) = report {
            if let Some(path) = &self.report {
                write_json(path, report)?;
                tracing::info!("report written to {}", path.display());
            }
            println!("{report}");
        }
        result.map(|_| ()).context("migration failed")
    }
}
