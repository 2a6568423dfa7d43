// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::eth::{EthAddress, Wallet};
use crate::migration::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHUNK_SIZE, DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_POLL_INTERVAL,
    DEFAULT_RATE_LIMIT, MigrationSettings,
};
use crate::rpc_client::{DEFAULT_TIMEOUT, DEFAULT_URL};
use ethereum_types::U256;
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use std::num::{NonZeroU64, NonZeroUsize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const CONFIG_PATH_ENV: &str = "RLN_MIGRATE_CONFIG";
pub const SOURCE_REGISTRY_ENV: &str = "WAKU_RLNV1_REGISTRY_ADDRESS";
pub const SOURCE_STORAGE_INDEX_ENV: &str = "WAKU_RLNV1_STORAGE_INDEX";
pub const DESTINATION_REGISTRY_ENV: &str = "WAKU_RLNV2_REGISTRY_ADDRESS";
pub const PRIVATE_KEY_ENV: &str = "RLN_MIGRATE_PRIVATE_KEY";
pub const RPC_URL_ENV: &str = "RLN_MIGRATE_RPC_URL";
pub const RPC_TOKEN_ENV: &str = "RLN_MIGRATE_RPC_TOKEN";

const REDACTED: &str = "<redacted>";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{key}` is not set; set it in the config file or with {env}")]
    Missing {
        key: &'static str,
        env: &'static str,
    },
    #[error("invalid `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("couldn't read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct RpcConfig {
    /// `http(s)://` or `ws(s)://` endpoint of the destination chain.
    pub url: Url,
    /// Sent as a bearer token when set.
    pub token: Option<String>,
    /// Upper bound of every single request.
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default RPC URL is valid"),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct SourceConfig {
    /// The v1 registry.
    pub registry: Option<EthAddress>,
    /// Index of the storage shard to migrate.
    pub storage_index: Option<u16>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct DestinationConfig {
    /// The v2 registry.
    pub registry: Option<EthAddress>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct SignerConfig {
    /// Hex-encoded secp256k1 key that pays for and sends the registrations.
    pub private_key: Option<String>,
}

#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct MigrationConfig {
    /// Blocks per `eth_getLogs` query.
    pub chunk_size: u64,
    /// Commitments per `register` transaction.
    pub batch_size: usize,
    /// Rate limit assigned to every migrated commitment.
    pub default_rate_limit: u64,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub confirmation_timeout: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub poll_interval: Duration,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE.get(),
            batch_size: DEFAULT_BATCH_SIZE.get(),
            default_rate_limit: DEFAULT_RATE_LIMIT,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub rpc: RpcConfig,
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    pub signer: SignerConfig,
    pub migration: MigrationConfig,
}

fn parse_env<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("{e}"),
    })
}

impl Config {
    /// Overrides settings with the environment variables `lookup` resolves.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(it) = lookup(RPC_URL_ENV) {
            self.rpc.url = parse_env(RPC_URL_ENV, &it)?;
        }
        if let Some(it) = lookup(RPC_TOKEN_ENV) {
            self.rpc.token = Some(it);
        }
        if let Some(it) = lookup(SOURCE_REGISTRY_ENV) {
            self.source.registry = Some(parse_env(SOURCE_REGISTRY_ENV, &it)?);
        }
        if let Some(it) = lookup(SOURCE_STORAGE_INDEX_ENV) {
            self.source.storage_index = Some(parse_env(SOURCE_STORAGE_INDEX_ENV, &it)?);
        }
        if let Some(it) = lookup(DESTINATION_REGISTRY_ENV) {
            self.destination.registry = Some(parse_env(DESTINATION_REGISTRY_ENV, &it)?);
        }
        if let Some(it) = lookup(PRIVATE_KEY_ENV) {
            self.signer.private_key = Some(it);
        }
        Ok(())
    }

    /// [`Config::apply_env`] over the process environment. Empty variables
    /// count as unset.
    pub fn apply_env_vars(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|key| std::env::var(key).ok().filter(|it| !it.is_empty()))
    }

    /// Validates the configuration. The signer is only checked for presence
    /// when `require_signer` is set, but is always validated when present.
    pub fn into_settings(self, require_signer: bool) -> Result<MigrationSettings, ConfigError> {
        let source_registry = self.source.registry.ok_or(ConfigError::Missing {
            key: "source.registry",
            env: SOURCE_REGISTRY_ENV,
        })?;
        let source_storage_index = self.source.storage_index.ok_or(ConfigError::Missing {
            key: "source.storage_index",
            env: SOURCE_STORAGE_INDEX_ENV,
        })?;
        let destination_registry = self.destination.registry.ok_or(ConfigError::Missing {
            key: "destination.registry",
            env: DESTINATION_REGISTRY_ENV,
        })?;
        let signer = match self.signer.private_key.as_deref() {
            Some(key) => Some(Wallet::from_hex(key).map_err(|e| ConfigError::Invalid {
                key: "signer.private_key",
                reason: format!("{e:#}"),
            })?),
            None if require_signer => {
                return Err(ConfigError::Missing {
                    key: "signer.private_key",
                    env: PRIVATE_KEY_ENV,
                });
            }
            None => None,
        };

        let chunk_size =
            NonZeroU64::new(self.migration.chunk_size).ok_or(ConfigError::Invalid {
                key: "migration.chunk_size",
                reason: "must be at least 1".into(),
            })?;
        let batch_size =
            NonZeroUsize::new(self.migration.batch_size).ok_or(ConfigError::Invalid {
                key: "migration.batch_size",
                reason: "must be at least 1".into(),
            })?;
        if self.migration.confirmation_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "migration.confirmation_timeout",
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(MigrationSettings {
            signer,
            chunk_size,
            batch_size,
            default_rate_limit: U256::from(self.migration.default_rate_limit),
            confirmation_timeout: self.migration.confirmation_timeout,
            poll_interval: self.migration.poll_interval,
            ..MigrationSettings::new(source_registry, source_storage_index, destination_registry)
        })
    }

    /// A copy safe to print, with secrets masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.signer.private_key.is_some() {
            config.signer.private_key = Some(REDACTED.into());
        }
        if config.rpc.token.is_some() {
            config.rpc.token = Some(REDACTED.into());
        }
        config
    }
}
