// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{BlockRange, MigrationReport, SubmitError};
use crate::cli_shared::cli::ConfigError;
use crate::contracts::ContractError;
use crate::eth::Commitment;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("couldn't resolve the {endpoint}: {source}")]
    Resolution {
        endpoint: &'static str,
        #[source]
        source: ContractError,
    },

    #[error(
        "{}, {} commitments collected so far: {source}",
        describe_fetch(.range.as_ref()),
        .collected.len()
    )]
    Fetch {
        /// The chunk being queried, if the failure happened while reading logs.
        range: Option<BlockRange>,
        /// Commitments of every chunk read before the failure, in log order.
        collected: Vec<Commitment>,
        #[source]
        source: ContractError,
        report: Box<MigrationReport>,
    },

    #[error(
        "batch {index} (commitments {}..{}) failed after {} commitments were migrated: {source}; \
         re-run with --resume-from-batch {index} to continue",
        .span.start,
        .span.end,
        .report.commitments_migrated
    )]
    Transaction {
        index: usize,
        span: Range<usize>,
        #[source]
        source: SubmitError,
        report: Box<MigrationReport>,
    },
}

fn describe_fetch(range: Option<&BlockRange>) -> String {
    match range {
        Some(range) => format!("fetching logs of blocks {range} failed"),
        None => "determining the scan range failed".into(),
    }
}

impl MigrationError {
    /// What the run got done before failing. Failures before the first chain
    /// read have nothing to report.
    pub fn partial_report(&self) -> Option<&MigrationReport> {
        match self {
            Self::Configuration(_) | Self::Resolution { .. } => None,
            Self::Fetch { report, .. } | Self::Transaction { report, .. } => Some(report),
        }
    }

    /// Source commitments read before a failed scan.
    pub fn collected_commitments(&self) -> &[Commitment] {
        match self {
            Self::Fetch { collected, .. } => collected.as_slice(),
            _ => &[],
        }
    }
}
