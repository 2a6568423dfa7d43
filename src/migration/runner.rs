// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{
    BatchReceipt, BlockRange, MigrationError, MigrationReport, MigrationSettings, Phase,
    Submitter, partition,
};
use crate::cli_shared::cli::ConfigError;
use crate::contracts::{
    ContractError, MEMBER_REGISTERED_SIG, RegistryV1, RegistryV2, StorageShard,
};
use crate::eth::abi::decode_member_registered;
use crate::eth::{Commitment, Wallet};
use crate::rpc_client::EthRpc;
use crate::utils::io::ProgressLog;
use tracing::{debug, info, warn};

/// Shards resolved on both sides of the migration.
#[derive(Debug, Clone, Copy)]
struct Endpoints {
    source: StorageShard,
    destination: RegistryV2,
}

/// Commitments collected from the source shard, in log order.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub report: MigrationReport,
    pub commitments: Vec<Commitment>,
}

/// Moves every commitment registered in a v1 storage shard into a v2 registry.
pub struct Migrator<'a> {
    client: &'a dyn EthRpc,
    settings: &'a MigrationSettings,
}

impl<'a> Migrator<'a> {
    pub fn new(client: &'a dyn EthRpc, settings: &'a MigrationSettings) -> Self {
        Self { client, settings }
    }

    fn empty_report(&self) -> MigrationReport {
        MigrationReport::new(
            self.settings.source_registry,
            self.settings.destination_registry,
        )
    }

    /// Resolves both endpoints. Nothing is scanned unless both resolve.
    async fn resolve(&self, report: &mut MigrationReport) -> Result<Endpoints, MigrationError> {
        report.phase = Phase::ResolvingEndpoints;
        let index = self.settings.source_storage_index;
        let source = RegistryV1::new(self.settings.source_registry)
            .storages(self.client, index)
            .await
            .map_err(|source| MigrationError::Resolution {
                endpoint: "source storage shard",
                source,
            })?;
        info!(
            "source registry {} uses shard {} at index {index}",
            self.settings.source_registry, source.address
        );
        report.source_shard = Some(source.address);

        let destination = RegistryV2::new(self.settings.destination_registry);
        let resolution = |source| MigrationError::Resolution {
            endpoint: "destination storage shard",
            source,
        };
        let index = destination
            .using_storage_index(self.client)
            .await
            .map_err(resolution)?;
        let shard = destination
            .storages(self.client, index)
            .await
            .map_err(resolution)?;
        info!(
            "destination registry {} uses shard {shard} at index {index}",
            destination.address
        );
        report.destination_shard = Some(shard);

        Ok(Endpoints {
            source,
            destination,
        })
    }

    /// Reads every `MemberRegistered` log the shard emitted since deployment,
    /// one chunk at a time.
    async fn collect(
        &self,
        shard: StorageShard,
        report: &mut MigrationReport,
    ) -> Result<Vec<Commitment>, MigrationError> {
        report.phase = Phase::ScanningSource;
        let mut commitments = vec![];

        let range = async {
            let deployed = shard.deployed_block_number(self.client).await?;
            let current = self.client.block_number().await?;
            Ok::<_, ContractError>(BlockRange::new(deployed, current))
        }
        .await
        .map_err(|source| MigrationError::Fetch {
            range: None,
            collected: vec![],
            source,
            report: Box::new(report.clone()),
        })?;
        if range.is_empty() {
            info!("no blocks to scan in {range}");
        }
        report.scanned = Some(BlockRange::new(range.start, range.start));

        let progress = ProgressLog::new("scanning blocks", range.len());
        for chunk in range.chunks(self.settings.chunk_size) {
            let found = match self.fetch_chunk(shard, chunk).await {
                Ok(found) => found,
                Err(source) => {
                    return Err(MigrationError::Fetch {
                        range: Some(chunk),
                        report: Box::new(MigrationReport {
                            commitments_found: commitments.len(),
                            ..report.clone()
                        }),
                        collected: commitments,
                        source,
                    });
                }
            };
            info!("blocks {chunk}: {} registrations", found.len());
            commitments.extend(found);
            report.scanned = Some(BlockRange::new(range.start, chunk.end));
            progress.set(chunk.end - range.start);
        }
        progress.finish();

        report.commitments_found = commitments.len();
        info!("found {} commitments in blocks {range}", commitments.len());
        Ok(commitments)
    }

    async fn fetch_chunk(
        &self,
        shard: StorageShard,
        chunk: BlockRange,
    ) -> Result<Vec<Commitment>, ContractError> {
        let Some(last) = chunk.last_block() else {
            return Ok(vec![]);
        };
        let filter = shard.member_registered_filter(chunk.start, last);
        let logs = self.client.get_logs(&filter).await?;
        logs.iter()
            .filter(|log| {
                if log.removed {
                    debug!("skipping log removed by a reorg: {:?}", log.transaction_hash);
                }
                !log.removed
            })
            .map(|log| {
                decode_member_registered(&log.data.0)
                    .map(|(commitment, _index)| commitment)
                    .map_err(|source| ContractError::Decode {
                        contract: shard.address,
                        call: MEMBER_REGISTERED_SIG,
                        source,
                    })
            })
            .collect()
    }

    /// Resolves both endpoints and collects the source commitments without
    /// sending anything.
    pub async fn scan(&self) -> Result<ScanOutcome, MigrationError> {
        let mut report = self.empty_report();
        let endpoints = self.resolve(&mut report).await?;
        let commitments = self.collect(endpoints.source, &mut report).await?;
        report.phase = Phase::Done;
        Ok(ScanOutcome {
            report,
            commitments,
        })
    }

    /// Runs the whole migration: resolve, scan, then register batch by batch.
    pub async fn migrate(&self) -> Result<MigrationReport, MigrationError> {
        let wallet = self.settings.signer.as_ref().ok_or(ConfigError::Missing {
            key: "signer.private_key",
            env: crate::cli_shared::cli::PRIVATE_KEY_ENV,
        })?;
        let mut report = self.empty_report();
        let endpoints = self.resolve(&mut report).await?;
        let commitments = self.collect(endpoints.source, &mut report).await?;
        self.register(wallet, endpoints.destination, &commitments, &mut report)
            .await?;
        report.phase = Phase::Done;
        info!(
            "migrated {} of {} commitments in {} transactions",
            report.commitments_migrated,
            report.commitments_found,
            report.batches.len()
        );
        Ok(report)
    }

    async fn register(
        &self,
        wallet: &Wallet,
        registry: RegistryV2,
        commitments: &[Commitment],
        report: &mut MigrationReport,
    ) -> Result<(), MigrationError> {
        report.phase = Phase::RegisteringBatches;
        let batches = partition(
            commitments,
            self.settings.batch_size,
            self.settings.default_rate_limit,
        );
        let skip = self.settings.resume_from_batch;
        if skip > 0 {
            warn!(
                "skipping the first {} of {} batches, assuming an earlier run registered them",
                skip.min(batches.len()),
                batches.len()
            );
        }
        if skip > batches.len() {
            warn!("--resume-from-batch {skip} is past the last batch; nothing to register");
        }
        report.skipped_batches = skip.min(batches.len());
        let Some(pending) = batches.get(skip..).filter(|it| !it.is_empty()) else {
            return Ok(());
        };

        let chain_id = self
            .client
            .chain_id()
            .await
            .map_err(|source| MigrationError::Transaction {
                index: pending[0].index,
                span: pending[0].span(),
                source: source.into(),
                report: Box::new(report.clone()),
            })?;
        let submitter = Submitter::new(
            self.client,
            wallet,
            chain_id,
            self.settings.confirmation_timeout,
            self.settings.poll_interval,
        );
        info!(
            "registering {} commitments in {} batches from {} on chain {chain_id}",
            commitments.len() - pending[0].offset,
            pending.len(),
            wallet.address()
        );

        for batch in pending {
            let span = batch.span();
            info!(
                "batch {}/{}: commitments {}..{}",
                batch.index + 1,
                batches.len(),
                span.start,
                span.end
            );
            let input = registry.register_calldata(&batch.commitments, &batch.limits);
            let receipt = submitter
                .submit(registry.address, input)
                .await
                .map_err(|source| MigrationError::Transaction {
                    index: batch.index,
                    span: span.clone(),
                    source,
                    report: Box::new(report.clone()),
                })?;
            info!(
                "batch {} confirmed in transaction {}",
                batch.index, receipt.transaction_hash
            );
            report.record_batch(BatchReceipt {
                index: batch.index,
                offset: batch.offset,
                size: batch.size(),
                transaction_hash: receipt.transaction_hash,
                block_number: receipt.block_number.map(|it| it.0),
                gas_used: receipt.gas_used.map(|it| it.0),
            });
        }
        Ok(())
    }
}
