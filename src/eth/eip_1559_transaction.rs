// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! This module contains the logic for EIP-1559 transaction types.
//! See <https://eips.ethereum.org/EIPS/eip-1559>.

use anyhow::ensure;
use derive_builder::Builder;
use ethereum_types::U256;
use rlp::RlpStream;

use super::{EthAddress, EthChainId, Hash, abi::u256_word};

/// Ethereum Improvement Proposals 1559 transaction type.
pub const EIP_1559_TX_TYPE: u8 = 2;
pub const EIP_1559_SIG_LEN: usize = 65;

#[derive(PartialEq, Debug, Clone, Default, Builder)]
#[builder(setter(into))]
pub struct EthEip1559TxArgs {
    pub chain_id: EthChainId,
    pub nonce: u64,
    pub to: Option<EthAddress>,
    #[builder(default)]
    pub value: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub gas_limit: u64,
    pub input: Vec<u8>,
    #[builder(setter(skip))]
    pub v: u8,
    #[builder(setter(skip))]
    pub r: U256,
    #[builder(setter(skip))]
    pub s: U256,
}

fn format_u256(value: &U256) -> Vec<u8> {
    // Quantities are encoded big-endian without leading zeroes; zero is the empty string.
    let word = u256_word(value);
    let first = word.iter().position(|b| *b != 0).unwrap_or(word.len());
    word.get(first..).unwrap_or_default().to_vec()
}

fn format_address(value: &Option<EthAddress>) -> Vec<u8> {
    match value {
        Some(addr) => addr.0.as_bytes().to_vec(),
        None => vec![],
    }
}

impl EthEip1559TxArgs {
    /// Attaches a `r || s || y_parity` recoverable signature.
    pub fn with_signature(mut self, signature: &[u8]) -> anyhow::Result<Self> {
        ensure!(
            signature.len() == EIP_1559_SIG_LEN,
            "Invalid signature length for EIP1559 transaction: {}",
            signature.len()
        );
        let (r, rest) = signature.split_at(32);
        let (s, v) = rest.split_at(32);
        let v = v.first().copied().unwrap_or_default();
        ensure!(v <= 1, "Invalid y-parity for EIP1559 transaction: {v}");

        self.r = U256::from_big_endian(r);
        self.s = U256::from_big_endian(s);
        self.v = v;
        Ok(self)
    }

    fn append_fields(&self, stream: &mut RlpStream) {
        stream.append(&self.chain_id);
        stream.append(&self.nonce);
        stream.append(&format_u256(&self.max_priority_fee_per_gas));
        stream.append(&format_u256(&self.max_fee_per_gas));
        stream.append(&self.gas_limit);
        stream.append(&format_address(&self.to));
        stream.append(&format_u256(&self.value));
        stream.append(&self.input);
        // empty access list
        stream.begin_list(0);
    }

    /// `0x02 || rlp([chain_id, nonce, ..., access_list])`, the payload that gets signed.
    pub fn rlp_unsigned_message(&self) -> Vec<u8> {
        const MSG_ITEMS: usize = 9;

        let mut stream = RlpStream::new_list(MSG_ITEMS);
        self.append_fields(&mut stream);
        typed_envelope(stream)
    }

    pub fn signing_hash(&self) -> Hash {
        Hash::keccak(self.rlp_unsigned_message())
    }

    /// `0x02 || rlp([chain_id, nonce, ..., access_list, y_parity, r, s])`, ready for
    /// `eth_sendRawTransaction`.
    pub fn rlp_signed_message(&self) -> Vec<u8> {
        const MSG_ITEMS: usize = 12;

        let mut stream = RlpStream::new_list(MSG_ITEMS);
        self.append_fields(&mut stream);
        stream.append(&self.v);
        stream.append(&format_u256(&self.r));
        stream.append(&format_u256(&self.s));
        let bytes = typed_envelope(stream);
        tracing::trace!("rlp: 0x{}", hex::encode(&bytes));
        bytes
    }

    /// Transaction hash as reported by the chain.
    pub fn hash(&self) -> Hash {
        Hash::keccak(self.rlp_signed_message())
    }
}

fn typed_envelope(stream: RlpStream) -> Vec<u8> {
    let mut bytes: Vec<u8> = vec![EIP_1559_TX_TYPE];
    bytes.extend_from_slice(&stream.out());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_eip1559_tx_args() -> EthEip1559TxArgs {
        EthEip1559TxArgsBuilder::default()
            .chain_id(1u64)
            .nonce(0u64)
            .to(Some(
                "0x000000000000000000000000000000000000dead"
                    .parse::<EthAddress>()
                    .unwrap(),
            ))
            .max_fee_per_gas(U256::from(2_000_000_000u64))
            .max_priority_fee_per_gas(U256::from(1_000_000_000u64))
            .gas_limit(21_000u64)
            .input(vec![])
            .build()
            .unwrap()
    }

    #[test]
    fn test_unsigned_rlp_encoding() {
        // 0x02 || rlp([1, 0, 1 gwei, 2 gwei, 21000, 0x..dead, 0, 0x, []])
        const EXPECTED: &str = "02e70180843b9aca0084773594008252089400000000000000000000000000000000\
                                0000dead8080c0";
        let args = create_eip1559_tx_args();
        assert_eq!(hex::encode(args.rlp_unsigned_message()), EXPECTED);
    }

    #[test]
    fn test_valid_eip1559_tx_args_with_signature() {
        let args = create_eip1559_tx_args();
        let mut signature = vec![0u8; EIP_1559_SIG_LEN];
        signature[31] = 7;
        signature[63] = 9;
        signature[64] = 1;
        let signed = args.with_signature(&signature).unwrap();
        assert_eq!(signed.r, U256::from(7u64));
        assert_eq!(signed.s, U256::from(9u64));
        assert_eq!(signed.v, 1);
        assert_eq!(signed.rlp_signed_message()[0], EIP_1559_TX_TYPE);
    }

    #[test]
    fn test_invalid_eip1559_tx_args_invalid_signature_len() {
        let args = create_eip1559_tx_args();
        let signature = vec![0u8; EIP_1559_SIG_LEN - 1];
        assert!(args.with_signature(&signature).is_err());
    }

    #[test]
    fn test_invalid_eip1559_tx_args_invalid_parity() {
        let args = create_eip1559_tx_args();
        let mut signature = vec![0u8; EIP_1559_SIG_LEN];
        signature[64] = 27;
        assert!(args.with_signature(&signature).is_err());
    }

    #[test]
    fn test_signature_changes_hash_but_not_signing_hash() {
        let args = create_eip1559_tx_args();
        let mut signature = vec![0u8; EIP_1559_SIG_LEN];
        signature[0] = 1;
        let signed = args.clone().with_signature(&signature).unwrap();
        assert_eq!(args.signing_hash(), signed.signing_hash());
        assert_ne!(args.hash(), signed.hash());
    }
}
