// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{divide_evenly, validate_partition, PartitionError};

/// Per-rank scatter layout: rank 0 is the root and receives nothing,
/// ranks `1..world_size` split the elements evenly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScatterPlan {
    counts: Vec<usize>,
    offsets: Vec<usize>,
    num_elements: usize,
}

impl ScatterPlan {
    pub fn new(num_elements: usize, world_size: usize) -> Result<Self, PartitionError> {
        if world_size < 2 {
            return Err(PartitionError::InvalidArgument {
                what: "receiver count (world_size - 1)",
                value: world_size.saturating_sub(1),
            });
        }

        let (receiver_offsets, receiver_counts) =
            divide_evenly(num_elements, world_size - 1)?.into_parts();

        let mut counts = Vec::with_capacity(world_size);
        let mut offsets = Vec::with_capacity(world_size);
        counts.push(0);
        offsets.push(0);
        counts.extend(receiver_counts);
        offsets.extend(receiver_offsets);

        Ok(Self {
            counts,
            offsets,
            num_elements,
        })
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn count(&self, rank: usize) -> usize {
        self.counts.get(rank).copied().unwrap_or(0)
    }

    pub fn offset(&self, rank: usize) -> usize {
        self.offsets.get(rank).copied().unwrap_or(0)
    }

    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    /// Number of ranks that receive data (all but the root)
    pub fn receivers(&self) -> usize {
        self.counts.len() - 1
    }

    /// The slice of `frame` that `rank` receives
    pub fn slice<'a, T>(&self, frame: &'a [T], rank: usize) -> &'a [T] {
        let offset = self.offset(rank);
        &frame[offset..offset + self.count(rank)]
    }

    pub fn validate(&self) -> Result<(), PartitionError> {
        validate_partition(&self.counts, &self.offsets, self.num_elements)
    }
}
