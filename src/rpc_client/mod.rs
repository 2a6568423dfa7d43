// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod client;
pub mod types;

pub use client::RpcClient;
pub use types::*;

use crate::eth::{EthAddress, EthBytes, EthChainId, Hash};
use async_trait::async_trait;
use ethereum_types::U256;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const ETH_BLOCK_NUMBER: &str = "eth_blockNumber";
pub const ETH_CALL: &str = "eth_call";
pub const ETH_CHAIN_ID: &str = "eth_chainId";
pub const ETH_ESTIMATE_GAS: &str = "eth_estimateGas";
pub const ETH_GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
pub const ETH_GET_LOGS: &str = "eth_getLogs";
pub const ETH_GET_TRANSACTION_COUNT: &str = "eth_getTransactionCount";
pub const ETH_GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
pub const ETH_MAX_PRIORITY_FEE_PER_GAS: &str = "eth_maxPriorityFeePerGas";
pub const ETH_SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{method} failed: {source}")]
    Call {
        method: &'static str,
        #[source]
        source: jsonrpsee::core::ClientError,
    },
    #[error("{method} returned an unusable response: {reason}")]
    Malformed { method: &'static str, reason: String },
    #[error("couldn't serialize parameters of {method}: {source}")]
    Params {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The subset of the Ethereum JSON-RPC API the migration relies on.
///
/// Every call is a single request; implementations are expected to bound each
/// request with a timeout.
#[async_trait]
pub trait EthRpc: Send + Sync {
    async fn chain_id(&self) -> Result<EthChainId, RpcError>;

    /// Height of the latest block.
    async fn block_number(&self) -> Result<u64, RpcError>;

    /// Read-only contract call against the latest block.
    async fn call(&self, to: EthAddress, data: EthBytes) -> Result<EthBytes, RpcError>;

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, RpcError>;

    /// Next nonce of `address`, counting pending transactions.
    async fn transaction_count(&self, address: EthAddress) -> Result<u64, RpcError>;

    async fn max_priority_fee_per_gas(&self) -> Result<U256, RpcError>;

    /// Base fee of the latest block.
    async fn base_fee_per_gas(&self) -> Result<U256, RpcError>;

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, RpcError>;

    async fn send_raw_transaction(&self, raw: EthBytes) -> Result<Hash, RpcError>;

    /// `None` while the transaction is still pending.
    async fn transaction_receipt(&self, hash: Hash) -> Result<Option<TxReceipt>, RpcError>;
}
