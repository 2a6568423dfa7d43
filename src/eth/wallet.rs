// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{EthAddress, EthEip1559TxArgs, Hash, hexify::decode_hex};
use anyhow::Context as _;
use k256::ecdsa::{SigningKey, VerifyingKey};
use std::fmt;

/// A local secp256k1 key able to sign transactions for the destination chain.
#[derive(Clone)]
pub struct Wallet {
    key: SigningKey,
    address: EthAddress,
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print key material
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Wallet {
    pub fn from_private_key(bytes: &[u8]) -> anyhow::Result<Self> {
        let key = SigningKey::from_slice(bytes).context("invalid secp256k1 private key")?;
        let address = address_of(key.verifying_key());
        Ok(Self { key, address })
    }

    /// Parses a `0x`-prefixed (or bare) hex private key.
    pub fn from_hex(s: &str) -> anyhow::Result<Self> {
        let bytes = decode_hex(s.trim()).context("private key is not valid hex")?;
        Self::from_private_key(&bytes)
    }

    pub fn address(&self) -> EthAddress {
        self.address
    }

    /// Signs `hash` and returns the 65-byte `r || s || y_parity` signature.
    pub fn sign_hash(&self, hash: &Hash) -> anyhow::Result<Vec<u8>> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(hash.0.as_bytes())
            .context("failed to sign transaction")?;
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte());
        Ok(bytes)
    }

    pub fn sign_transaction(&self, tx: EthEip1559TxArgs) -> anyhow::Result<EthEip1559TxArgs> {
        let signature = self.sign_hash(&tx.signing_hash())?;
        tx.with_signature(&signature)
    }
}

/// The last 20 bytes of the keccak hash of the uncompressed public key.
fn address_of(key: &VerifyingKey) -> EthAddress {
    let point = key.to_encoded_point(false);
    // skip the 0x04 SEC1 tag
    let hash = Hash::keccak(&point.as_bytes()[1..]);
    EthAddress(ethereum_types::H160::from_slice(&hash.0.as_bytes()[12..]))
}
