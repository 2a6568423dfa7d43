// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod config_cmd;
pub mod migrate_cmd;
pub mod scan_cmd;

use crate::cli_shared::cli::*;
use crate::cli_shared::read_config;
use crate::eth::EthAddress;
use crate::rpc_client::RpcClient;
use crate::utils::version::VERSION_STRING;
use anyhow::Context as _;
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command-line options for the `rln-migrate` binary
#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"), author = env!("CARGO_PKG_AUTHORS"), version = VERSION_STRING.as_str(), about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(help_template(HELP_MESSAGE))]
pub struct Cli {
    #[command(flatten)]
    pub opts: CliOpts,
    #[command(subcommand)]
    pub cmd: Subcommand,
}

/// rln-migrate sub-commands
#[derive(clap::Subcommand)]
pub enum Subcommand {
    /// Register every commitment of the v1 storage shard with the v2 registry
    Migrate(migrate_cmd::MigrateCommand),

    /// Resolve both registries and collect the v1 commitments without sending
    /// any transaction
    Scan(scan_cmd::ScanCommand),

    /// Inspect the effective configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

/// Configuration sources shared by every subcommand. Flags override
/// environment variables, which override the config file.
#[derive(Debug, Default, clap::Args)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// JSON-RPC endpoint, `http(s)://` or `ws(s)://`
    #[arg(long)]
    pub rpc_url: Option<Url>,
    /// Address of the v1 registry
    #[arg(long)]
    pub source_registry: Option<EthAddress>,
    /// Index of the v1 storage shard to migrate
    #[arg(long)]
    pub storage_index: Option<u16>,
    /// Address of the v2 registry
    #[arg(long)]
    pub destination_registry: Option<EthAddress>,
    /// Blocks per log query
    #[arg(long)]
    pub chunk_size: Option<u64>,
    /// Commitments per registration transaction
    #[arg(long)]
    pub batch_size: Option<usize>,
    /// Rate limit assigned to every migrated commitment
    #[arg(long)]
    pub rate_limit: Option<u64>,
}

impl ConfigArgs {
    pub fn load(&self) -> anyhow::Result<Config> {
        let (path, mut config) = read_config(self.config.as_ref())?;
        match &path {
            Some(path) => tracing::info!("using config file {}", path.to_path_buf().display()),
            None => tracing::debug!("no config file found, using defaults"),
        }
        config.apply_env_vars()?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.rpc_url {
            config.rpc.url = url.clone();
        }
        if let Some(registry) = self.source_registry {
            config.source.registry = Some(registry);
        }
        if let Some(index) = self.storage_index {
            config.source.storage_index = Some(index);
        }
        if let Some(registry) = self.destination_registry {
            config.destination.registry = Some(registry);
        }
        if let Some(size) = self.chunk_size {
            config.migration.chunk_size = size;
        }
        if let Some(size) = self.batch_size {
            config.migration.batch_size = size;
        }
        if let Some(limit) = self.rate_limit {
            config.migration.default_rate_limit = limit;
        }
    }
}

async fn connect(rpc: &RpcConfig) -> anyhow::Result<RpcClient> {
    let client = RpcClient::from_url(&rpc.url, rpc.token.as_deref(), rpc.timeout)
        .await
        .with_context(|| format!("couldn't connect to {}", rpc.url))?;
    tracing::info!("using JSON-RPC endpoint {}", client.url());
    Ok(client)
}
