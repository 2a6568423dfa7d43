// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{ConfigArgs, connect};
use crate::eth::{Commitment, EthBigInt};
use crate::migration::Migrator;
use crate::utils::io::write_json;
use anyhow::Context as _;
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Args)]
pub struct ScanCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Write the collected commitments to this file as a JSON array of hex
    /// quantities, also the partial list when the scan fails
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl ScanCommand {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.config.load()?;
        let settings = config.clone().into_settings(false)?;
        let client = connect(&config.rpc).await?;

        let result = Migrator::new(&client, &settings).scan().await;
        let (report, commitments) = match &result {
            Ok(outcome) => (Some(&outcome.report), outcome.commitments.as_slice()),
            Err(e) => (e.partial_report(), e.collected_commitments()),
        };
        if let Some(report) = report {
            if let Some(path) = &self.output {
                write_commitments(path, commitments)?;
            }
            println!("{report}");
        }
        result.map(|_| ()).context("scan failed")
    }
}

fn write_commitments(path: &Path, commitments: &[Commitment]) -> anyhow::Result<()> {
    let commitments: Vec<EthBigInt> = commitments.iter().copied().map(EthBigInt).collect();
    write_json(path, &commitments)?;
    tracing::info!(
        "wrote {} commitments to {}",
        commitments.len(),
        path.display()
    );
    Ok(())
}
