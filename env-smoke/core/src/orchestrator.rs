// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::barrier_timing::{barrier, gather_hosts, timed_barrier};
use crate::{
    rank_line, run_scatter, BarrierReport, ElementType, HostMap, ScatterReport, SmokeConfig,
    SmokeError, World,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// What a full smoke run observed
#[derive(Debug, Clone)]
pub struct SmokeSummary {
    pub world_size: usize,
    pub host_map: HostMap,
    pub initial_barrier: BarrierReport,
    pub synchronized_barrier: BarrierReport,
    pub scatter: ScatterReport,
    /// Root output lines, in the order they were printed
    pub lines: Vec<String>,
}

/// Drives the smoke sequence: timed barrier, host gather, barrier,
/// timed barrier with hosts, scatter benchmark
pub struct Orchestrator {
    config: SmokeConfig,
    world: World,
    host: String,
}

impl Orchestrator {
    pub fn new(config: SmokeConfig, host: String) -> Result<Self, SmokeError> {
        if config.world_size < 2 {
            return Err(SmokeError::WorldTooSmall {
                size: config.world_size,
                min: 2,
            });
        }
        let world = World::new(config.world_size)?;
        Ok(Self {
            config,
            world,
            host,
        })
    }

    /// Returns a clone of the cancellation token for external control
    pub fn cancellation_token(&self) -> CancellationToken {
        self.world.cancellation_token()
    }

    pub async fn run(&self) -> Result<SmokeSummary, SmokeError> {
        info!(world_size = self.world.size(), "smoke run started");
        let mut lines = Vec::new();
        let mut emit = |host_map: Option<&HostMap>, msg: String| {
            let line = rank_line(host_map, 0, &msg);
            println!("{}", line);
            lines.push(line);
        };

        emit(
            None,
            "MPI Test. Before Initial MPI_Barrier. If no output follows, there is a problem with the cluster"
                .to_string(),
        );
        emit(None, format!("worldsize={}", self.world.size()));

        let initial_barrier = timed_barrier(&self.world, None).await?;
        emit(None, initial_barrier.message());

        let host_map = gather_hosts(&self.world, &self.host).await?;
        barrier(&self.world).await?;
        emit(
            Some(&host_map),
            "MPI Test. Third MPI_Barrier, after synchronization and getting hostnames.".to_string(),
        );

        let synchronized_barrier = timed_barrier(&self.world, Some(&host_map)).await?;
        emit(Some(&host_map), synchronized_barrier.message());

        let scatter = match self.config.element_type {
            ElementType::F32 => run_scatter::<f32>(&self.world, &self.config).await?,
            ElementType::F64 => run_scatter::<f64>(&self.world, &self.config).await?,
            ElementType::I16 => run_scatter::<i16>(&self.world, &self.config).await?,
        };
        emit(Some(&host_map), scatter.to_string());

        info!("smoke run finished");
        Ok(SmokeSummary {
            world_size: self.world.size(),
            host_map,
            initial_barrier,
            synchronized_barrier,
            scatter,
            lines,
        })
    }
}
