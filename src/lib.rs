// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod cli_shared;
mod contracts;
mod eth;
mod migration;
mod rpc_client;
#[cfg(test)]
mod test_utils;
mod tool;
mod utils;

pub use cli_shared::cli::Config;
pub use tool::main::main as rln_migrate_main;
