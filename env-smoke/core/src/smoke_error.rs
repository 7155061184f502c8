// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::PartitionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmokeError {
    #[error(transparent)]
    Partition(#[from] PartitionError),

    /// A receiver got data that does not match the root's frame
    #[error("rank {rank} received {received} at offset {offset}, expected {expected} (event {event})")]
    ScatterMismatch {
        rank: usize,
        event: usize,
        offset: usize,
        expected: String,
        received: String,
    },

    /// A rank stopped before the collective finished
    #[error("rank {rank} failed: {reason}")]
    RankFailed { rank: usize, reason: String },

    #[error("world size must be at least {min}, got {size}")]
    WorldTooSmall { size: usize, min: usize },

    #[error("smoke run cancelled")]
    Cancelled,
}
