// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// A half-open span `[start, end)` of block heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    /// An `end` below `start` yields an empty range at `start`.
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest block in the range, the inclusive `toBlock` of a log query.
    pub fn last_block(&self) -> Option<u64> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    /// Splits the range into consecutive chunks of at most `size` blocks.
    pub fn chunks(&self, size: NonZeroU64) -> Chunks {
        Chunks {
            next: self.start,
            end: self.end,
            size: size.get(),
        }
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub struct Chunks {
    next: u64,
    end: u64,
    size: u64,
}

impl Iterator for Chunks {
    type Item = BlockRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let start = self.next;
        let end = start.saturating_add(self.size).min(self.end);
        self.next = end;
        Some(BlockRange { start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end.saturating_sub(self.next)).div_ceil(self.size);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}
