// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{HostMap, SmokeError, World};
use std::time::Instant;

/// Longest barrier wait across the world
#[derive(Debug, Clone, PartialEq)]
pub struct BarrierReport {
    /// Seconds
    pub longest_wait: f32,
    pub rank: usize,
    pub host: Option<String>,
}

impl BarrierReport {
    pub fn message(&self) -> String {
        let host = match &self.host {
            Some(host) => format!(" host={}", host),
            None => String::new(),
        };
        format!(
            "After MPI_Barrier. longest wait time: {:.2} sec, rank={}{}",
            self.longest_wait, self.rank, host
        )
    }
}

/// Rank with the longest wait; the lowest rank wins ties
pub fn longest_wait(waits: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (rank, wait) in waits.iter().copied().enumerate() {
        match best {
            Some((_, longest)) if wait <= longest || wait.is_nan() => {}
            _ => best = Some((rank, wait)),
        }
    }
    best
}

/// Every rank times its wait at the barrier; the waits are gathered at the root
pub async fn timed_barrier(
    world: &World,
    host_map: Option<&HostMap>,
) -> Result<BarrierReport, SmokeError> {
    let waits = world
        .run(|rank| async move {
            let start = Instant::now();
            rank.barrier().await?;
            Ok::<_, SmokeError>(start.elapsed().as_secs_f32())
        })
        .await?;

    let (rank, longest_wait) = longest_wait(&waits).unwrap_or((0, 0.0));
    Ok(BarrierReport {
        longest_wait,
        rank,
        host: host_map.and_then(|hosts| hosts.get(rank)).map(str::to_string),
    })
}

/// Every rank reports its host name; the root assembles the map
pub async fn gather_hosts(world: &World, host: &str) -> Result<HostMap, SmokeError> {
    let hosts = world
        .run(|_rank| {
            let host = host.to_string();
            async move { Ok::<_, SmokeError>(host) }
        })
        .await?;
    Ok(HostMap::from_gathered(hosts))
}

/// Plain barrier across all ranks
pub async fn barrier(world: &World) -> Result<(), SmokeError> {
    world
        .run(|rank| async move { rank.barrier().await })
        .await
        .map(|_| ())
}
