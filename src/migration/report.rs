// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::BlockRange;
use crate::eth::{EthAddress, Hash};
use serde::Serialize;
use std::fmt;

/// Stages of a run, in the only order they can happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    #[default]
    ResolvingEndpoints,
    ScanningSource,
    RegisteringBatches,
    Done,
}

/// A confirmed `register` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReceipt {
    pub index: usize,
    pub offset: usize,
    pub size: usize,
    pub transaction_hash: Hash,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
}

/// Outcome of a run. Failed runs carry one too, describing what got done
/// before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MigrationReport {
    /// The phase the run reached. `Done` only for complete runs.
    pub phase: Phase,
    pub source_registry: EthAddress,
    pub source_shard: Option<EthAddress>,
    pub destination_registry: EthAddress,
    pub destination_shard: Option<EthAddress>,
    /// The blocks scanned so far. Covers the full source history once
    /// scanning is complete.
    pub scanned: Option<BlockRange>,
    pub commitments_found: usize,
    pub commitments_migrated: usize,
    /// Batches skipped on request because an earlier run already sent them.
    pub skipped_batches: usize,
    pub batches: Vec<BatchReceipt>,
}

impl MigrationReport {
    pub fn new(source_registry: EthAddress, destination_registry: EthAddress) -> Self {
        Self {
            source_registry,
            destination_registry,
            ..Default::default()
        }
    }

    pub(super) fn record_batch(&mut self, receipt: BatchReceipt) {
        self.commitments_migrated += receipt.size;
        self.batches.push(receipt);
    }
}

fn shard(address: Option<EthAddress>) -> String {
    address.map_or_else(|| "unresolved".into(), |it| it.to_string())
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "phase:       {}", self.phase)?;
        writeln!(
            f,
            "source:      registry {} shard {}",
            self.source_registry,
            shard(self.source_shard)
        )?;
        writeln!(
            f,
            "destination: registry {} shard {}",
            self.destination_registry,
            shard(self.destination_shard)
        )?;
        if let Some(scanned) = self.scanned {
            writeln!(f, "scanned:     blocks {scanned}")?;
        }
        write!(
            f,
            "migrated:    {} of {} commitments in {} transactions",
            self.commitments_migrated,
            self.commitments_found,
            self.batches.len()
        )?;
        if self.skipped_batches > 0 {
            write!(f, " ({} batches skipped)", self.skipped_batches)?;
        }
        for batch in &self.batches {
            write!(
                f,
                "\n  batch {:>4}  commitments {:>6}..{:<6} {}",
                batch.index,
                batch.offset,
                batch.offset + batch.size,
                batch.transaction_hash
            )?;
        }
        Ok(())
    }
}
