// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::eth::{EthAddress, Wallet};
use ethereum_types::U256;
use std::num::{NonZeroU64, NonZeroUsize};
use std::time::Duration;

/// Blocks covered by a single `eth_getLogs` query.
pub const DEFAULT_CHUNK_SIZE: NonZeroU64 = NonZeroU64::new(10_000).unwrap();
/// Commitments registered per transaction.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(10).unwrap();
/// One message per epoch, the allowance every v1 member implicitly had.
pub const DEFAULT_RATE_LIMIT: u64 = 1;
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Validated inputs of a run.
#[derive(Debug, Clone)]
pub struct MigrationSettings {
    pub source_registry: EthAddress,
    pub source_storage_index: u16,
    pub destination_registry: EthAddress,
    /// Required to register; scanning works without it.
    pub signer: Option<Wallet>,
    pub chunk_size: NonZeroU64,
    pub batch_size: NonZeroUsize,
    pub default_rate_limit: U256,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
    /// Number of leading batches to skip.
    pub resume_from_batch: usize,
}

impl MigrationSettings {
    pub fn new(
        source_registry: EthAddress,
        source_storage_index: u16,
        destination_registry: EthAddress,
    ) -> Self {
        Self {
            source_registry,
            source_storage_index,
            destination_registry,
            signer: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            default_rate_limit: U256::from(DEFAULT_RATE_LIMIT),
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            resume_from_batch: 0,
        }
    }
}
