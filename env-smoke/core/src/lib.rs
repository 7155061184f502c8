// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod partition;
pub use partition::{divide_evenly, validate_partition, Partition};

mod partition_error;
pub use partition_error::{Invariant, PartitionError};

mod scatter_plan;
pub use scatter_plan::ScatterPlan;

mod detector;
pub use detector::{Detector, ElementType, Sample};

mod host_map;
pub use host_map::{local_hostname, rank_line, HostMap};

mod smoke_error;
pub use smoke_error::SmokeError;

mod config;
pub use config::{ConfigError, SmokeConfig};

mod world;
pub use world::{Rank, World};

pub mod barrier_timing;
pub use barrier_timing::{longest_wait, BarrierReport};

mod scatter;
pub use scatter::{check_slice, run_scatter, ScatterReport};

mod orchestrator;
pub use orchestrator::{Orchestrator, SmokeSummary};

mod inventory_error;
pub use inventory_error::InventoryError;

pub mod inventory;
pub use inventory::Inventory;
