// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! An in-memory chain that plays the source and destination RLN contracts.

use crate::contracts::{
    DEPLOYED_BLOCK_NUMBER_SIG, MEMBER_REGISTERED_TOPIC, REGISTER_SIG, STORAGES_SIG,
    USING_STORAGE_INDEX_SIG,
};
use crate::eth::abi::{self, FUNC_SELECTOR_LENGTH, u256_word};
use crate::eth::{Commitment, EthAddress, EthBytes, EthChainId, Hash, Uint64};
use crate::rpc_client::*;
use async_trait::async_trait;
use ethereum_types::{H160, U256};
use jsonrpsee::core::ClientError;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A registration recorded by the source shard at `block`.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub block: u64,
    pub commitment: Commitment,
    /// Emitted with `removed: true`, as after a reorg.
    pub removed: bool,
}

/// Decoded arguments of one `register` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCall {
    pub commitments: Vec<Commitment>,
    pub limits: Vec<U256>,
}

#[derive(Debug, Default)]
struct State {
    methods: Vec<&'static str>,
    log_queries: Vec<(u64, u64)>,
    registered: Vec<RegisterCall>,
    receipts: HashMap<Hash, TxReceipt>,
}

#[derive(Debug)]
pub struct MockChain {
    chain_id: EthChainId,
    deployed_block: u64,
    current_block: u64,
    source_index: u16,
    destination_index: u16,
    registrations: Vec<Registration>,
    fail_using_storage_index: bool,
    fail_logs_from: Option<u64>,
    fail_chain_id: bool,
    revert_batch: Option<usize>,
    pending_receipts: bool,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
pub struct MockChainBuilder {
    deployed_block: u64,
    current_block: Option<u64>,
    source_index: u16,
    registrations: Vec<Registration>,
    fail_using_storage_index: bool,
    fail_logs_from: Option<u64>,
    fail_chain_id: bool,
    revert_batch: Option<usize>,
    pending_receipts: bool,
}

impl MockChainBuilder {
    pub fn deployed_block(mut self, block: u64) -> Self {
        self.deployed_block = block;
        self
    }

    pub fn current_block(mut self, block: u64) -> Self {
        self.current_block = Some(block);
        self
    }

    pub fn source_index(mut self, index: u16) -> Self {
        self.source_index = index;
        self
    }

    /// Registers commitments `1..=count`, spread one per block starting at the
    /// deployment block with the given stride.
    pub fn registrations(mut self, count: u64, stride: u64) -> Self {
        let start = self.deployed_block;
        self.registrations = (0..count)
            .map(|i| Registration {
                block: start + i * stride,
                commitment: U256::from(i + 1),
                removed: false,
            })
            .collect();
        self
    }

    /// Adds a registration of `commitment` at `block` that a reorg removed.
    pub fn removed_registration(mut self, block: u64, commitment: u64) -> Self {
        self.registrations.push(Registration {
            block,
            commitment: U256::from(commitment),
            removed: true,
        });
        self.registrations.sort_by_key(|it| it.block);
        self
    }

    pub fn fail_using_storage_index(mut self) -> Self {
        self.fail_using_storage_index = true;
        self
    }

    /// Fails the log query whose `fromBlock` equals `block`.
    pub fn fail_logs_from(mut self, block: u64) -> Self {
        self.fail_logs_from = Some(block);
        self
    }

    pub fn fail_chain_id(mut self) -> Self {
        self.fail_chain_id = true;
        self
    }

    /// Makes the `n`-th submitted transaction (zero-based) revert.
    pub fn revert_batch(mut self, n: usize) -> Self {
        self.revert_batch = Some(n);
        self
    }

    /// Never mines anything.
    pub fn pending_receipts(mut self) -> Self {
        self.pending_receipts = true;
        self
    }

    pub fn build(self) -> MockChain {
        let current_block = self.current_block.unwrap_or_else(|| {
            self.registrations
                .last()
                .map_or(self.deployed_block, |it| it.block + 1)
        });
        MockChain {
            chain_id: MockChain::CHAIN_ID,
            deployed_block: self.deployed_block,
            current_block,
            source_index: self.source_index,
            destination_index: 1,
            registrations: self.registrations,
            fail_using_storage_index: self.fail_using_storage_index,
            fail_logs_from: self.fail_logs_from,
            fail_chain_id: self.fail_chain_id,
            revert_batch: self.revert_batch,
            pending_receipts: self.pending_receipts,
            state: Default::default(),
        }
    }
}

fn failure(method: &'static str, message: &str) -> RpcError {
    RpcError::Call {
        method,
        source: ClientError::Custom(message.into()),
    }
}

fn address_word(address: EthAddress) -> Vec<u8> {
    let mut word = vec![0u8; 12];
    word.extend_from_slice(address.0.as_bytes());
    word
}

fn decode_uint_array(args: &[u8], head: usize) -> Vec<U256> {
    let offset = abi::decode_u64(args, head).unwrap() as usize;
    let tail = &args[offset..];
    let len = abi::decode_u64(tail, 0).unwrap() as usize;
    (1..=len).map(|i| abi::decode_uint(tail, i).unwrap()).collect()
}

impl MockChain {
    pub const CHAIN_ID: EthChainId = 31337;
    pub const SOURCE_REGISTRY: EthAddress = EthAddress(H160([0x11; 20]));
    pub const SOURCE_SHARD: EthAddress = EthAddress(H160([0x12; 20]));
    pub const DESTINATION_REGISTRY: EthAddress = EthAddress(H160([0x21; 20]));
    pub const DESTINATION_SHARD: EthAddress = EthAddress(H160([0x22; 20]));
    pub const BASE_FEE: u64 = 1_000_000_000;
    pub const PRIORITY_FEE: u64 = 100_000_000;
    pub const GAS_ESTIMATE: u64 = 250_000;

    pub fn builder() -> MockChainBuilder {
        MockChainBuilder::default()
    }

    /// Every JSON-RPC method invoked so far, in order.
    pub fn methods(&self) -> Vec<&'static str> {
        self.state.lock().methods.clone()
    }

    /// Inclusive `(fromBlock, toBlock)` pairs of every `eth_getLogs` call.
    pub fn log_queries(&self) -> Vec<(u64, u64)> {
        self.state.lock().log_queries.clone()
    }

    /// `register` calls of every transaction sent, reverted ones included.
    pub fn register_calls(&self) -> Vec<RegisterCall> {
        self.state.lock().registered.clone()
    }

    fn record(&self, method: &'static str) {
        self.state.lock().methods.push(method);
    }

    fn storage_at(&self, registry: EthAddress, index: U256) -> EthAddress {
        if registry == Self::SOURCE_REGISTRY && index == U256::from(self.source_index) {
            Self::SOURCE_SHARD
        } else if registry == Self::DESTINATION_REGISTRY
            && index == U256::from(self.destination_index)
        {
            Self::DESTINATION_SHARD
        } else {
            EthAddress::default()
        }
    }

    fn registration_log(registration: &Registration, index: usize) -> Log {
        let mut data = u256_word(&registration.commitment).to_vec();
        data.extend_from_slice(&u256_word(&U256::from(index)));
        Log {
            address: Self::SOURCE_SHARD,
            topics: vec![*MEMBER_REGISTERED_TOPIC],
            data: EthBytes(data),
            block_number: Some(Uint64(registration.block)),
            transaction_hash: None,
            log_index: None,
            removed: registration.removed,
        }
    }
}

#[async_trait]
impl EthRpc for MockChain {
    async fn chain_id(&self) -> Result<EthChainId, RpcError> {
        self.record(ETH_CHAIN_ID);
        if self.fail_chain_id {
            return Err(failure(ETH_CHAIN_ID, "connection reset"));
        }
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        self.record(ETH_BLOCK_NUMBER);
        Ok(self.current_block)
    }

    async fn call(&self, to: EthAddress, data: EthBytes) -> Result<EthBytes, RpcError> {
        self.record(ETH_CALL);
        let (selector, args) = data.0.split_at(FUNC_SELECTOR_LENGTH);
        let ret = if selector == abi::selector(STORAGES_SIG).as_slice() {
            let index = abi::decode_uint(args, 0).unwrap();
            address_word(self.storage_at(to, index))
        } else if selector == abi::selector(DEPLOYED_BLOCK_NUMBER_SIG).as_slice()
            && to == Self::SOURCE_SHARD
        {
            u256_word(&U256::from(self.deployed_block)).to_vec()
        } else if selector == abi::selector(USING_STORAGE_INDEX_SIG).as_slice()
            && to == Self::DESTINATION_REGISTRY
        {
            if self.fail_using_storage_index {
                return Err(failure(ETH_CALL, "execution reverted"));
            }
            u256_word(&U256::from(self.destination_index)).to_vec()
        } else {
            return Err(failure(ETH_CALL, "execution reverted"));
        };
        Ok(EthBytes(ret))
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, RpcError> {
        self.record(ETH_GET_LOGS);
        let (from, to) = (filter.from_block.0, filter.to_block.0);
        self.state.lock().log_queries.push((from, to));
        if self.fail_logs_from == Some(from) {
            return Err(failure(ETH_GET_LOGS, "query timeout exceeded"));
        }
        if filter.address != Self::SOURCE_SHARD {
            return Ok(vec![]);
        }
        Ok(self
            .registrations
            .iter()
            .enumerate()
            .filter(|(_, it)| (from..=to).contains(&it.block))
            .map(|(i, it)| Self::registration_log(it, i))
            .collect())
    }

    async fn transaction_count(&self, _address: EthAddress) -> Result<u64, RpcError> {
        self.record(ETH_GET_TRANSACTION_COUNT);
        Ok(self.state.lock().registered.len() as u64)
    }

    async fn max_priority_fee_per_gas(&self) -> Result<U256, RpcError> {
        self.record(ETH_MAX_PRIORITY_FEE_PER_GAS);
        Ok(U256::from(Self::PRIORITY_FEE))
    }

    async fn base_fee_per_gas(&self) -> Result<U256, RpcError> {
        self.record(ETH_GET_BLOCK_BY_NUMBER);
        Ok(U256::from(Self::BASE_FEE))
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, RpcError> {
        self.record(ETH_ESTIMATE_GAS);
        assert_eq!(request.to, Self::DESTINATION_REGISTRY);
        Ok(Self::GAS_ESTIMATE)
    }

    async fn send_raw_transaction(&self, raw: EthBytes) -> Result<Hash, RpcError> {
        self.record(ETH_SEND_RAW_TRANSACTION);
        assert_eq!(raw.0[0], 2, "expected an EIP-1559 envelope");
        let fields = rlp::Rlp::new(&raw.0[1..]);
        assert_eq!(fields.val_at::<u64>(0).unwrap(), self.chain_id);
        let input: Vec<u8> = fields.val_at(7).unwrap();
        let (selector, args) = input.split_at(FUNC_SELECTOR_LENGTH);
        assert_eq!(selector, abi::selector(REGISTER_SIG).as_slice());

        let hash = Hash::keccak(&raw.0);
        let mut state = self.state.lock();
        let n = state.registered.len();
        state.registered.push(RegisterCall {
            commitments: decode_uint_array(args, 0),
            limits: decode_uint_array(args, 1),
        });
        let status = if self.revert_batch == Some(n) { 0 } else { 1 };
        state.receipts.insert(
            hash,
            TxReceipt {
                transaction_hash: hash,
                block_number: Some(Uint64(self.current_block + 1 + n as u64)),
                gas_used: Some(Uint64(Self::GAS_ESTIMATE)),
                status: Some(Uint64(status)),
            },
        );
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: Hash) -> Result<Option<TxReceipt>, RpcError> {
        self.record(ETH_GET_TRANSACTION_RECEIPT);
        if self.pending_receipts {
            return Ok(None);
        }
        Ok(self.state.lock().receipts.get(&hash).cloned())
    }
}
