// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Scans `MemberRegistered` logs of an RLN v1 storage shard and registers the
//! commitments with an RLN v2 registry, in fixed-size batches.
//!
//! A run moves through [`Phase`]s in order and stops at the first failure.
//! Failures past endpoint resolution carry a [`MigrationReport`] describing
//! what was done.

mod batch;
mod error;
mod range;
mod report;
mod runner;
mod settings;
mod submit;

pub use batch::partition;
pub use error::MigrationError;
pub use range::BlockRange;
pub use report::{BatchReceipt, MigrationReport, Phase};
pub use runner::Migrator;
pub use settings::*;
pub use submit::{SubmitError, Submitter};
