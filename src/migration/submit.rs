// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Signing, sending and confirming EIP-1559 transactions one at a time.

use crate::eth::abi::parse_revert;
use crate::eth::hexify::decode_hex;
use crate::eth::{
    EthAddress, EthBytes, EthChainId, EthEip1559TxArgsBuilder, EthEip1559TxArgsBuilderError, Hash,
    Wallet,
};
use crate::rpc_client::{CallRequest, EthRpc, RpcError, TxReceipt};
use ethereum_types::U256;
use jsonrpsee::core::ClientError;
use std::time::Duration;
use thiserror::Error;

/// Headroom over `eth_estimateGas`, in percent.
const GAS_LIMIT_MARGIN_PERCENT: u64 = 20;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("the node rejected the transaction: {reason}")]
    Rejected {
        reason: String,
        #[source]
        source: RpcError,
    },
    #[error("couldn't build transaction: {0}")]
    Build(#[from] EthEip1559TxArgsBuilderError),
    #[error("couldn't sign transaction: {0:#}")]
    Sign(anyhow::Error),
    #[error("transaction {hash} reverted")]
    Reverted { hash: Hash },
    #[error("transaction {hash} not confirmed within {}", humanize(.waited))]
    Unconfirmed { hash: Hash, waited: Duration },
}

fn humanize(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

/// Pulls an ABI-encoded revert reason out of a JSON-RPC error, if the node
/// attached one.
fn revert_reason(err: &RpcError) -> Option<String> {
    let RpcError::Call {
        source: ClientError::Call(object),
        ..
    } = err
    else {
        return None;
    };
    let data: String = serde_json::from_str(object.data()?.get()).ok()?;
    let bytes = decode_hex(&data).ok()?;
    Some(parse_revert(&bytes))
}

pub struct Submitter<'a> {
    client: &'a dyn EthRpc,
    wallet: &'a Wallet,
    chain_id: EthChainId,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl<'a> Submitter<'a> {
    pub fn new(
        client: &'a dyn EthRpc,
        wallet: &'a Wallet,
        chain_id: EthChainId,
        confirmation_timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            wallet,
            chain_id,
            confirmation_timeout,
            poll_interval,
        }
    }

    /// Sends `input` to `to` and waits until the transaction is mined.
    pub async fn submit(&self, to: EthAddress, input: Vec<u8>) -> Result<TxReceipt, SubmitError> {
        let from = self.wallet.address();
        let nonce = self.client.transaction_count(from).await?;
        let estimate = self
            .client
            .estimate_gas(&CallRequest {
                from: Some(from),
                to,
                data: EthBytes(input.clone()),
            })
            .await
            .map_err(|source| match revert_reason(&source) {
                Some(reason) => SubmitError::Rejected { reason, source },
                None => SubmitError::Rpc(source),
            })?;
        let gas_limit = estimate.saturating_mul(100 + GAS_LIMIT_MARGIN_PERCENT) / 100;
        let priority_fee = self.client.max_priority_fee_per_gas().await?;
        let base_fee = self.client.base_fee_per_gas().await?;
        let max_fee = base_fee
            .saturating_mul(U256::from(2u8))
            .saturating_add(priority_fee);

        let tx = EthEip1559TxArgsBuilder::default()
            .chain_id(self.chain_id)
            .nonce(nonce)
            .to(Some(to))
            .max_fee_per_gas(max_fee)
            .max_priority_fee_per_gas(priority_fee)
            .gas_limit(gas_limit)
            .input(input)
            .build()?;
        let tx = self.wallet.sign_transaction(tx).map_err(SubmitError::Sign)?;
        tracing::debug!(
            nonce,
            gas_limit,
            %max_fee,
            %priority_fee,
            "sending transaction {}",
            tx.hash()
        );

        let hash = self
            .client
            .send_raw_transaction(EthBytes(tx.rlp_signed_message()))
            .await?;
        if hash != tx.hash() {
            tracing::warn!(expected = %tx.hash(), "node reported transaction hash {hash}");
        }
        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.succeeded() {
            return Err(SubmitError::Reverted { hash });
        }
        Ok(receipt)
    }

    async fn wait_for_receipt(&self, hash: Hash) -> Result<TxReceipt, SubmitError> {
        let poll = async {
            loop {
                if let Some(receipt) = self.client.transaction_receipt(hash).await? {
                    return Ok::<_, SubmitError>(receipt);
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };
        tokio::time::timeout(self.confirmation_timeout, poll)
            .await
            .map_err(|_| SubmitError::Unconfirmed {
                hash,
                waited: self.confirmation_timeout,
            })?
    }
}
