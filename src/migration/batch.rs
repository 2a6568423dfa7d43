// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::eth::Commitment;
use ethereum_types::U256;
use std::num::NonZeroUsize;
use std::ops::Range;

/// Commitments sent together in one `register` transaction, each paired with
/// the same rate limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationBatch {
    /// Position of this batch in the full partition.
    pub index: usize,
    /// Position of the first commitment in the full list.
    pub offset: usize,
    pub commitments: Vec<Commitment>,
    pub limits: Vec<U256>,
}

impl MigrationBatch {
    pub fn size(&self) -> usize {
        self.commitments.len()
    }

    /// Offsets of this batch's commitments in the full list.
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.size()
    }
}

/// Splits `commitments` into consecutive batches of at most `size`, in order.
///
/// The result only depends on the input list, so a re-run over the same
/// registrations yields the same batches with the same indices.
pub fn partition(
    commitments: &[Commitment],
    size: NonZeroUsize,
    limit: U256,
) -> Vec<MigrationBatch> {
    commitments
        .chunks(size.get())
        .enumerate()
        .map(|(index, chunk)| MigrationBatch {
            index,
            offset: index * size.get(),
            commitments: chunk.to_vec(),
            limits: vec![limit; chunk.len()],
        })
        .collect()
}
