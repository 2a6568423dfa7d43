// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! `serde` helpers for the `0x`-prefixed hex encodings used by Ethereum JSON-RPC.

use serde::{Deserialize as _, Deserializer, Serializer};
use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;

/// Usage: `#[serde(with = "hexify_bytes")]` for fixed-size hashes and addresses.
pub mod hexify_bytes {
    use super::*;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: std::fmt::LowerHex,
        S: Serializer,
    {
        // `ethereum_types` serializes bytes as compressed addresses, i.e. `0xff00…03ec`
        // so we can't just use `serializer.collect_str` here
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Usage: `#[serde(with = "hexify_vec_bytes")]` for arbitrary-length byte strings.
pub mod hexify_vec_bytes {
    use super::*;

    pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(value)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Usage: `#[serde(with = "hexify_u64")]` for JSON-RPC quantities that fit a `u64`.
pub mod hexify_u64 {
    use super::*;

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_u64(&s).map_err(serde::de::Error::custom)
    }
}

/// Usage: `#[serde(with = "hexify_u256")]` for JSON-RPC quantities such as fees.
pub mod hexify_u256 {
    use super::*;
    use ethereum_types::U256;

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_u256(&s).map_err(serde::de::Error::custom)
    }
}

/// Decodes a `0x`-prefixed (or bare) hex string. A lone `0x` decodes to an empty vector.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let s = Cow::from(s.strip_prefix("0x").unwrap_or(s));

    // Pad with 0 if odd length. This is necessary because [`hex::decode`] requires an even
    // number of characters, whereas a valid input is also `0x0`.
    let s = if s.len() % 2 == 0 {
        s
    } else {
        let mut s = s.into_owned();
        s.insert(0, '0');
        Cow::Owned(s)
    };

    hex::decode(s.as_ref())
}

pub fn parse_u64(s: &str) -> anyhow::Result<u64> {
    match s.strip_prefix("0x") {
        Some(digits) if !digits.is_empty() => Ok(u64::from_str_radix(digits, 16)?),
        _ => anyhow::bail!("invalid hex quantity: {s:?}"),
    }
}

pub fn parse_u256(s: &str) -> anyhow::Result<ethereum_types::U256> {
    match s.strip_prefix("0x") {
        Some(digits) if !digits.is_empty() => ethereum_types::U256::from_str_radix(digits, 16)
            .map_err(|e| anyhow::anyhow!("invalid hex quantity {s:?}: {e:?}")),
        _ => anyhow::bail!("invalid hex quantity: {s:?}"),
    }
}
