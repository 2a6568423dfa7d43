// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod abi;
mod eip_1559_transaction;
pub mod hexify;
mod wallet;

pub use eip_1559_transaction::{
    EthEip1559TxArgs, EthEip1559TxArgsBuilder, EthEip1559TxArgsBuilderError,
};
pub use wallet::Wallet;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type EthChainId = u64;

/// An identity commitment as recorded by the RLN contracts.
pub type Commitment = ethereum_types::U256;

/// Ethereum address size in bytes.
pub const ADDRESS_LENGTH: usize = 20;

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EthAddress(#[serde(with = "hexify::hexify_bytes")] pub ethereum_types::H160);

impl EthAddress {
    pub fn from_slice(bytes: &[u8]) -> anyhow::Result<Self> {
        anyhow::ensure!(
            bytes.len() == ADDRESS_LENGTH,
            "invalid address length: {}",
            bytes.len()
        );
        Ok(Self(ethereum_types::H160::from_slice(bytes)))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for EthAddress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hexify::decode_hex(s)?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Hash(#[serde(with = "hexify::hexify_bytes")] pub ethereum_types::H256);

impl Hash {
    /// Keccak-256 of `data`.
    pub fn keccak(data: impl AsRef<[u8]>) -> Self {
        Hash(ethereum_types::H256(keccak_hash::keccak(data).0))
    }
}

impl FromStr for Hash {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Hash(ethereum_types::H256::from_str(s)?))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct EthBytes(#[serde(with = "hexify::hexify_vec_bytes")] pub Vec<u8>);

impl fmt::Display for EthBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

#[derive(
    PartialEq,
    Eq,
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Into,
)]
pub struct Uint64(#[serde(with = "hexify::hexify_u64")] pub u64);

#[derive(
    PartialEq,
    Eq,
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Into,
)]
pub struct EthBigInt(#[serde(with = "hexify::hexify_u256")] pub ethereum_types::U256);
