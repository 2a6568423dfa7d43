// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Static bindings for the RLN registry and storage contracts.
//!
//! Selectors and the event topic are derived once from canonical signatures;
//! nothing is assembled from text at call time.

use crate::eth::abi::{self, AbiError, Token};
use crate::eth::{Commitment, EthAddress, EthBytes, Hash, Uint64};
use crate::rpc_client::{EthRpc, LogFilter, RpcError};
use ethereum_types::U256;
use std::sync::LazyLock;
use thiserror::Error;

pub const STORAGES_SIG: &str = "storages(uint16)";
pub const USING_STORAGE_INDEX_SIG: &str = "usingStorageIndex()";
pub const DEPLOYED_BLOCK_NUMBER_SIG: &str = "deployedBlockNumber()";
pub const REGISTER_SIG: &str = "register(uint256[],uint256[])";
pub const MEMBER_REGISTERED_SIG: &str = "MemberRegistered(uint256,uint256)";

/// Topic 0 of every `MemberRegistered` log.
pub static MEMBER_REGISTERED_TOPIC: LazyLock<Hash> =
    LazyLock::new(|| Hash::keccak(MEMBER_REGISTERED_SIG));

#[derive(Debug, Error)]
pub enum ContractError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("{call} on {contract} returned malformed data: {source}")]
    Decode {
        contract: EthAddress,
        call: &'static str,
        #[source]
        source: AbiError,
    },
    #[error("{call} on {contract} returned the zero address")]
    ZeroAddress {
        contract: EthAddress,
        call: &'static str,
    },
}

async fn call(
    client: &dyn EthRpc,
    contract: EthAddress,
    signature: &'static str,
    args: &[Token],
) -> Result<EthBytes, ContractError> {
    let data = abi::encode_call(abi::selector(signature), args);
    Ok(client.call(contract, EthBytes(data)).await?)
}

async fn storages(
    client: &dyn EthRpc,
    registry: EthAddress,
    index: u16,
) -> Result<EthAddress, ContractError> {
    let ret = call(
        client,
        registry,
        STORAGES_SIG,
        &[Token::Uint(U256::from(index))],
    )
    .await?;
    let address = abi::decode_address(&ret.0, 0).map_err(|source| ContractError::Decode {
        contract: registry,
        call: STORAGES_SIG,
        source,
    })?;
    // unset storage slots read back as zero
    if address.is_zero() {
        return Err(ContractError::ZeroAddress {
            contract: registry,
            call: STORAGES_SIG,
        });
    }
    Ok(address)
}

/// The v1 registry: a list of storage shards, each its own contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryV1 {
    pub address: EthAddress,
}

impl RegistryV1 {
    pub fn new(address: EthAddress) -> Self {
        Self { address }
    }

    pub async fn storages(
        &self,
        client: &dyn EthRpc,
        index: u16,
    ) -> Result<StorageShard, ContractError> {
        storages(client, self.address, index)
            .await
            .map(StorageShard::new)
    }
}

/// A v1 storage shard, the emitter of `MemberRegistered` logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageShard {
    pub address: EthAddress,
}

impl StorageShard {
    pub fn new(address: EthAddress) -> Self {
        Self { address }
    }

    pub async fn deployed_block_number(&self, client: &dyn EthRpc) -> Result<u64, ContractError> {
        let ret = call(client, self.address, DEPLOYED_BLOCK_NUMBER_SIG, &[]).await?;
        abi::decode_u64(&ret.0, 0).map_err(|source| ContractError::Decode {
            contract: self.address,
            call: DEPLOYED_BLOCK_NUMBER_SIG,
            source,
        })
    }

    /// Filter for this shard's registrations within the inclusive block span
    /// `[from, to]`.
    pub fn member_registered_filter(&self, from: u64, to: u64) -> LogFilter {
        LogFilter {
            from_block: Uint64(from),
            to_block: Uint64(to),
            address: self.address,
            topics: vec![*MEMBER_REGISTERED_TOPIC],
        }
    }
}

/// The v2 registry, which accepts commitments together with a rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryV2 {
    pub address: EthAddress,
}

impl RegistryV2 {
    pub fn new(address: EthAddress) -> Self {
        Self { address }
    }

    pub async fn using_storage_index(&self, client: &dyn EthRpc) -> Result<u16, ContractError> {
        let ret = call(client, self.address, USING_STORAGE_INDEX_SIG, &[]).await?;
        let decode_err = |source| ContractError::Decode {
            contract: self.address,
            call: USING_STORAGE_INDEX_SIG,
            source,
        };
        let index = abi::decode_u64(&ret.0, 0).map_err(decode_err)?;
        u16::try_from(index).map_err(|_| decode_err(AbiError::Overflow("u16")))
    }

    pub async fn storages(
        &self,
        client: &dyn EthRpc,
        index: u16,
    ) -> Result<EthAddress, ContractError> {
        storages(client, self.address, index).await
    }

    /// Calldata of `register(commitments, limits)`.
    pub fn register_calldata(&self, commitments: &[Commitment], limits: &[U256]) -> Vec<u8> {
        abi::encode_call(
            abi::selector(REGISTER_SIG),
            &[
                Token::UintArray(commitments.to_vec()),
                Token::UintArray(limits.to_vec()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockChain;

    #[test]
    fn selectors_match_solidity() {
        assert_eq!(hex::encode(abi::selector(STORAGES_SIG)), "f5542147");
        assert_eq!(hex::encode(abi::selector(USING_STORAGE_INDEX_SIG)), "cf616374");
        assert_eq!(hex::encode(abi::selector(DEPLOYED_BLOCK_NUMBER_SIG)), "4add651e");
        assert_eq!(hex::encode(abi::selector(REGISTER_SIG)), "2de999bf");
        assert_eq!(
            MEMBER_REGISTERED_TOPIC.to_string(),
            "0x5a92c2530f207992057b9c3e544108ffce3beda4a63719f316967c49bf6159d2"
        );
    }

    #[test]
    fn register_calldata_layout() {
        let registry = RegistryV2::new(MockChain::DESTINATION_REGISTRY);
        let data = registry.register_calldata(
            &[U256::from(7u64), U256::from(8u64)],
            &[U256::one(), U256::one()],
        );
        // selector + 2 offsets + (len + 2 items) * 2
        assert_eq!(data.len(), 4 + 32 * 8);
        assert_eq!(&data[..4], abi::selector(REGISTER_SIG).as_slice());
        assert_eq!(abi::decode_u64(&data[4..], 0).unwrap(), 0x40);
        assert_eq!(abi::decode_u64(&data[4..], 1).unwrap(), 0xa0);
        assert_eq!(abi::decode_u64(&data[4..], 2).unwrap(), 2);
        assert_eq!(abi::decode_u64(&data[4..], 3).unwrap(), 7);
        assert_eq!(abi::decode_u64(&data[4..], 7).unwrap(), 1);
    }

    #[tokio::test]
    async fn resolves_shards_through_registries() {
        let chain = MockChain::builder().deployed_block(42).build();
        let v1 = RegistryV1::new(MockChain::SOURCE_REGISTRY);
        let shard = v1.storages(&chain, 0).await.unwrap();
        assert_eq!(shard.address, MockChain::SOURCE_SHARD);
        assert_eq!(shard.deployed_block_number(&chain).await.unwrap(), 42);

        let v2 = RegistryV2::new(MockChain::DESTINATION_REGISTRY);
        let index = v2.using_storage_index(&chain).await.unwrap();
        assert_eq!(
            v2.storages(&chain, index).await.unwrap(),
            MockChain::DESTINATION_SHARD
        );
    }

    #[tokio::test]
    async fn unknown_storage_index_is_rejected() {
        let chain = MockChain::builder().build();
        let v1 = RegistryV1::new(MockChain::SOURCE_REGISTRY);
        let err = v1.storages(&chain, 9).await.unwrap_err();
        assert!(matches!(err, ContractError::ZeroAddress { .. }), "{err}");
    }
}
