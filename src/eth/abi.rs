// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Minimal Solidity ABI support for the handful of calls the migration makes.
//!
//! See <https://docs.soliditylang.org/en/latest/abi-spec.html#function-selector-and-argument-encoding>
//! for the ABI specification.

use super::{Commitment, EthAddress, Hash};
use ethereum_types::U256;
use thiserror::Error;

/// EVM function selector length in bytes.
pub const FUNC_SELECTOR_LENGTH: usize = 4;

/// Ethereum Virtual Machine word size in bytes.
pub const EVM_WORD_LENGTH: usize = 32;

const ERROR_FUNCTION_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0]; // keccak256("Error(string)") [first 4 bytes]
const PANIC_FUNCTION_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71]; // keccak256("Panic(uint256)") [first 4 bytes]

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbiError {
    #[error("return data too short: expected at least {expected} bytes, got {actual}")]
    ShortData { expected: usize, actual: usize },
    #[error("value does not fit in {0}")]
    Overflow(&'static str),
    #[error("address word has non-zero padding")]
    DirtyAddress,
}

/// A single ABI argument. Only the shapes used by the RLN contracts are supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(U256),
    UintArray(Vec<U256>),
}

/// First four bytes of the keccak hash of a canonical function signature.
pub fn selector(signature: &str) -> [u8; FUNC_SELECTOR_LENGTH] {
    let hash = Hash::keccak(signature);
    let mut out = [0u8; FUNC_SELECTOR_LENGTH];
    out.copy_from_slice(&hash.0.as_bytes()[..FUNC_SELECTOR_LENGTH]);
    out
}

/// Big-endian 32-byte word of a `uint256`.
pub fn u256_word(value: &U256) -> [u8; EVM_WORD_LENGTH] {
    let mut word = [0u8; EVM_WORD_LENGTH];
    for (i, byte) in word.iter_mut().enumerate() {
        *byte = value.byte(EVM_WORD_LENGTH - 1 - i);
    }
    word
}

fn usize_word(value: usize) -> [u8; EVM_WORD_LENGTH] {
    u256_word(&U256::from(value))
}

/// Encodes `selector` followed by the head/tail encoding of `tokens`.
pub fn encode_call(selector: [u8; FUNC_SELECTOR_LENGTH], tokens: &[Token]) -> Vec<u8> {
    let mut head: Vec<u8> = Vec::with_capacity(tokens.len() * EVM_WORD_LENGTH);
    let mut tail: Vec<u8> = vec![];
    let head_len = tokens.len() * EVM_WORD_LENGTH;

    for token in tokens {
        match token {
            Token::Uint(value) => head.extend_from_slice(&u256_word(value)),
            Token::UintArray(values) => {
                // Dynamic arguments store their offset (relative to the start of the
                // arguments) in the head and their length-prefixed content in the tail.
                head.extend_from_slice(&usize_word(head_len + tail.len()));
                tail.extend_from_slice(&usize_word(values.len()));
                for value in values {
                    tail.extend_from_slice(&u256_word(value));
                }
            }
        }
    }

    let mut out = Vec::with_capacity(FUNC_SELECTOR_LENGTH + head.len() + tail.len());
    out.extend_from_slice(&selector);
    out.append(&mut head);
    out.append(&mut tail);
    out
}

/// Returns the `index`-th 32-byte word of `data`.
pub fn word(data: &[u8], index: usize) -> Result<&[u8], AbiError> {
    let start = index * EVM_WORD_LENGTH;
    let end = start + EVM_WORD_LENGTH;
    data.get(start..end).ok_or(AbiError::ShortData {
        expected: end,
        actual: data.len(),
    })
}

pub fn decode_uint(data: &[u8], index: usize) -> Result<U256, AbiError> {
    Ok(U256::from_big_endian(word(data, index)?))
}

pub fn decode_u64(data: &[u8], index: usize) -> Result<u64, AbiError> {
    let value = decode_uint(data, index)?;
    if value > U256::from(u64::MAX) {
        return Err(AbiError::Overflow("u64"));
    }
    Ok(value.low_u64())
}

pub fn decode_address(data: &[u8], index: usize) -> Result<EthAddress, AbiError> {
    let word = word(data, index)?;
    let (padding, address) = word.split_at(EVM_WORD_LENGTH - super::ADDRESS_LENGTH);
    if padding.iter().any(|b| *b != 0) {
        return Err(AbiError::DirtyAddress);
    }
    Ok(EthAddress(ethereum_types::H160::from_slice(address)))
}

/// Decodes the non-indexed `(uint256 idCommitment, uint256 index)` payload of a
/// `MemberRegistered` log.
pub fn decode_member_registered(data: &[u8]) -> Result<(Commitment, U256), AbiError> {
    Ok((decode_uint(data, 0)?, decode_uint(data, 1)?))
}

/// Parse an ABI encoded revert reason from a raw return value.
///
/// Handles both `Error(string)` and `Panic(uint256)` formats according to
/// Solidity's revert conventions.
pub fn parse_revert(data: &[u8]) -> String {
    let fallback = || format!("0x{}", hex::encode(data));
    let Some((selector, args)) = data.split_at_checked(FUNC_SELECTOR_LENGTH) else {
        return fallback();
    };
    if selector == PANIC_FUNCTION_SELECTOR.as_slice() {
        return match decode_uint(args, 0) {
            Ok(code) => format!("Panic({code:#x})"),
            Err(_) => fallback(),
        };
    }
    if selector != ERROR_FUNCTION_SELECTOR.as_slice() {
        return fallback();
    }
    let reason = (|| {
        let offset = usize::try_from(decode_u64(args, 0).ok()?).ok()?;
        let len_word = args.get(offset..offset.checked_add(EVM_WORD_LENGTH)?)?;
        let len = usize::try_from(decode_u64(len_word, 0).ok()?).ok()?;
        let start = offset + EVM_WORD_LENGTH;
        let bytes = args.get(start..start.checked_add(len)?)?;
        String::from_utf8(bytes.to_vec()).ok()
    })();
    match reason {
        Some(reason) => format!("Error({reason})"),
        None => fallback(),
    }
}
