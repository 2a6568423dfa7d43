// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::eth::{EthAddress, EthBigInt, EthBytes, Hash, Uint64};
use serde::{Deserialize, Serialize};

/// Block tag accepted by the `block` parameter of JSON-RPC methods.
#[derive(PartialEq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predefined {
    Pending,
    #[default]
    Latest,
}

/// `eth_getLogs` filter. Both block bounds are inclusive.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub from_block: Uint64,
    pub to_block: Uint64,
    pub address: EthAddress,
    pub topics: Vec<Hash>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: EthAddress,
    pub topics: Vec<Hash>,
    pub data: EthBytes,
    #[serde(default)]
    pub block_number: Option<Uint64>,
    #[serde(default)]
    pub transaction_hash: Option<Hash>,
    #[serde(default)]
    pub log_index: Option<Uint64>,
    #[serde(default)]
    pub removed: bool,
}

/// Transaction object for `eth_call` and `eth_estimateGas`.
#[derive(PartialEq, Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<EthAddress>,
    pub to: EthAddress,
    pub data: EthBytes,
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: Hash,
    #[serde(default)]
    pub block_number: Option<Uint64>,
    #[serde(default)]
    pub gas_used: Option<Uint64>,
    /// `1` for success, `0` for a reverted transaction.
    #[serde(default)]
    pub status: Option<Uint64>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, Some(Uint64(1)))
    }
}

/// The only field of `eth_getBlockByNumber` the migration reads.
#[derive(PartialEq, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockFees {
    #[serde(default)]
    pub base_fee_per_gas: Option<EthBigInt>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn log_filter_serializes_as_json_rpc_expects() {
        let filter = LogFilter {
            from_block: Uint64(0),
            to_block: Uint64(9_999),
            address: "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap(),
            topics: vec![Hash::keccak("MemberRegistered(uint256,uint256)")],
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "fromBlock": "0x0",
                "toBlock": "0x270f",
                "address": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                "topics": ["0x5a92c2530f207992057b9c3e544108ffce3beda4a63719f316967c49bf6159d2"],
            })
        );
    }

    #[test]
    fn block_tags_serialize_in_camel_case() {
        assert_eq!(
            serde_json::to_value(Predefined::Pending).unwrap(),
            json!("pending")
        );
        assert_eq!(serde_json::to_value(Predefined::default()).unwrap(), json!("latest"));
    }

    #[test]
    fn receipt_status() {
        let receipt: TxReceipt = serde_json::from_value(json!({
            "transactionHash": "0x5a92c2530f207992057b9c3e544108ffce3beda4a63719f316967c49bf6159d2",
            "blockNumber": "0x10",
            "gasUsed": "0x5208",
            "status": "0x0",
            "logs": [],
        }))
        .unwrap();
        assert!(!receipt.succeeded());
        assert_eq!(receipt.block_number, Some(Uint64(16)));
    }

    #[test]
    fn log_deserializes_with_missing_optional_fields() {
        let log: Log = serde_json::from_value(json!({
            "address": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
            "topics": [],
            "data": "0x",
        }))
        .unwrap();
        assert!(log.data.0.is_empty());
        assert!(!log.removed);
    }
}
