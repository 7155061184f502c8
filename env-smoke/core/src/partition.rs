// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Invariant, PartitionError};
use serde::Serialize;

/// Contiguous split of `total` work units among workers
/// Worker `i` owns `offsets[i]..offsets[i] + counts[i]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    offsets: Vec<usize>,
    counts: Vec<usize>,
    total: usize,
}

impl Partition {
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn num_workers(&self) -> usize {
        self.counts.len()
    }

    /// The index range owned by `worker`
    pub fn range(&self, worker: usize) -> Option<std::ops::Range<usize>> {
        let offset = *self.offsets.get(worker)?;
        let count = *self.counts.get(worker)?;
        Some(offset..offset + count)
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<usize>) {
        (self.offsets, self.counts)
    }
}

/// Splits `total_units` into `worker_count` contiguous slices as evenly as possible.
///
/// The first `total_units % worker_count` workers get one extra unit.
///
/// ```
/// let partition = env_smoke_core::divide_evenly(11, 3).unwrap();
/// assert_eq!(partition.offsets(), &[0, 4, 8]);
/// assert_eq!(partition.counts(), &[4, 4, 3]);
/// ```
pub fn divide_evenly(total_units: usize, worker_count: usize) -> Result<Partition, PartitionError> {
    if total_units == 0 {
        return Err(PartitionError::InvalidArgument {
            what: "total_units",
            value: total_units,
        });
    }
    if worker_count == 0 {
        return Err(PartitionError::InvalidArgument {
            what: "worker_count",
            value: worker_count,
        });
    }

    let base = total_units / worker_count;
    let remainder = total_units % worker_count;

    let mut offsets = Vec::new();
    let mut counts = Vec::new();
    offsets
        .try_reserve_exact(worker_count)
        .and_then(|_| counts.try_reserve_exact(worker_count))
        .map_err(|_| PartitionError::TooManyWorkers { worker_count })?;
    let mut next_offset = 0;
    for worker in 0..worker_count {
        let count = if worker < remainder { base + 1 } else { base };
        offsets.push(next_offset);
        counts.push(count);
        next_offset += count;
    }

    validate_partition(&counts, &offsets, total_units)?;

    Ok(Partition {
        offsets,
        counts,
        total: total_units,
    })
}

/// Checks that `counts`/`offsets` partition `total_units`.
///
/// Invariants are checked in order (lengths, first offset, contiguity,
/// coverage, tail) and the first violation is returned.
pub fn validate_partition(
    counts: &[usize],
    offsets: &[usize],
    total_units: usize,
) -> Result<(), PartitionError> {
    let fail = |invariant, index| PartitionError::PartitionInconsistent {
        invariant,
        index,
        counts: counts.to_vec(),
        offsets: offsets.to_vec(),
        total: total_units,
    };

    if counts.len() != offsets.len() || counts.is_empty() {
        return Err(fail(Invariant::Lengths, counts.len().min(offsets.len())));
    }

    if offsets[0] != 0 {
        return Err(fail(Invariant::FirstOffset, 0));
    }

    for i in 1..counts.len() {
        if offsets[i - 1].checked_add(counts[i - 1]) != Some(offsets[i]) {
            return Err(fail(Invariant::Contiguity, i));
        }
    }

    let mut sum: usize = 0;
    for (i, count) in counts.iter().enumerate() {
        sum = sum
            .checked_add(*count)
            .ok_or_else(|| fail(Invariant::Coverage, i))?;
    }
    if sum != total_units {
        return Err(fail(Invariant::Coverage, counts.len() - 1));
    }

    let last = counts.len() - 1;
    if offsets[last].checked_add(counts[last]) != Some(total_units) {
        return Err(fail(Invariant::Tail, last));
    }

    Ok(())
}
