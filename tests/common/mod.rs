// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use tempfile::TempDir;

pub const SOURCE_REGISTRY: &str = "0x1111111111111111111111111111111111111111";
pub const DESTINATION_REGISTRY: &str = "0x2121212121212121212121212121212121212121";
// First default account of a local Hardhat/Anvil node.
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const ENV_VARS: [&str; 7] = [
    "RLN_MIGRATE_CONFIG",
    "RLN_MIGRATE_PRIVATE_KEY",
    "RLN_MIGRATE_RPC_URL",
    "RLN_MIGRATE_RPC_TOKEN",
    "WAKU_RLNV1_REGISTRY_ADDRESS",
    "WAKU_RLNV1_STORAGE_INDEX",
    "WAKU_RLNV2_REGISTRY_ADDRESS",
];

pub fn tool() -> Command {
    cargo_bin_cmd!("rln-migrate")
}

pub trait CommonEnv {
    fn common_env(&mut self, home: &TempDir) -> &mut Self;
}

impl CommonEnv for Command {
    // Start from a clean environment so that neither the caller's variables
    // nor a config file in their home directory leak into the test.
    fn common_env(&mut self, home: &TempDir) -> &mut Self {
        for var in ENV_VARS {
            self.env_remove(var);
        }
        self.env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path())
            .env("RUST_LOG", "warn")
    }
}

pub fn create_tmp_config(contents: &str) -> (PathBuf, TempDir) {
    let temp_dir = tempfile::tempdir().expect("couldn't create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    std::fs::write(&config_file, contents).expect("couldn't write config");
    (config_file, temp_dir)
}
