// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use thiserror::Error;

/// The partition invariants, in the order `validate_partition` checks them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invariant {
    /// counts and offsets have the same, non-zero length
    Lengths,
    /// the first slice starts at zero
    FirstOffset,
    /// every slice starts where the previous one ends
    Contiguity,
    /// the counts add up to the total
    Coverage,
    /// the last slice ends exactly at the total
    Tail,
}

impl std::fmt::Display for Invariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Invariant::Lengths => "counts and offsets lengths differ or are empty",
            Invariant::FirstOffset => "first offset is not zero",
            Invariant::Contiguity => "offset is not the end of the previous slice",
            Invariant::Coverage => "counts do not sum to the total",
            Invariant::Tail => "last slice does not end at the total",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// A size argument was zero
    #[error("invalid argument: {what} must be positive, got {value}")]
    InvalidArgument { what: &'static str, value: usize },

    /// The per-worker vectors cannot be allocated
    #[error("cannot allocate a partition for {worker_count} workers")]
    TooManyWorkers { worker_count: usize },

    /// A partition breaks one of its invariants
    #[error(
        "counts={counts:?} offsets={offsets:?} do not partition n={total}: {invariant} (index {index})"
    )]
    PartitionInconsistent {
        invariant: Invariant,
        index: usize,
        counts: Vec<usize>,
        offsets: Vec<usize>,
        total: usize,
    },
}

impl PartitionError {
    /// The violated invariant, if this is a consistency failure
    pub fn invariant(&self) -> Option<Invariant> {
        match self {
            PartitionError::PartitionInconsistent { invariant, .. } => Some(*invariant),
            PartitionError::InvalidArgument { .. } | PartitionError::TooManyWorkers { .. } => None,
        }
    }
}
