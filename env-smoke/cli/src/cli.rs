// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use clap::{Parser, Subcommand, ValueEnum};
use env_smoke_core::{ElementType, SmokeConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "env-smoke")]
#[command(about = "Smoke tests for an MPI / parallel I/O computing environment")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Split TOTAL work units among WORKERS as evenly as possible
    Divide {
        total: usize,
        workers: usize,
        /// Print the partition as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that counts and offsets partition TOTAL
    Validate {
        /// Comma separated, e.g. 2,2,2
        #[arg(long, value_delimiter = ',', required = true)]
        counts: Vec<usize>,
        /// Comma separated, e.g. 0,2,4
        #[arg(long, value_delimiter = ',', required = true)]
        offsets: Vec<usize>,
        #[arg(long)]
        total: usize,
    },

    /// Run the barrier / host gather / scatter smoke test in-process
    MpiSmoke {
        /// JSON config file; missing fields take defaults
        #[arg(long, default_value = "env-smoke.json")]
        config: PathBuf,
        /// Number of events to scatter
        #[arg(short = 'n', long = "numevents")]
        num_events: Option<usize>,
        /// Scatter a full cspad sized amount of data
        #[arg(long)]
        cspad: bool,
        /// Number of ranks, root included
        #[arg(long)]
        world_size: Option<usize>,
        #[arg(long, value_enum)]
        element_type: Option<ElementArg>,
    },

    /// List executables, importable modules and shared libraries of an installation
    Inventory {
        /// Interpreter bin directory; defaults to the one holding python on PATH
        #[arg(long)]
        bin_dir: Option<PathBuf>,
        /// Module search directories; defaults to lib/python*/ of the installation
        #[arg(long = "search-path")]
        search_paths: Vec<PathBuf>,
        /// Print the inventory, masked entries included, as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ElementArg {
    F32,
    F64,
    I16,
}

impl From<ElementArg> for ElementType {
    fn from(arg: ElementArg) -> Self {
        match arg {
            ElementArg::F32 => ElementType::F32,
            ElementArg::F64 => ElementType::F64,
            ElementArg::I16 => ElementType::I16,
        }
    }
}

/// Applies command line overrides on top of a loaded config
pub fn apply_overrides(
    mut config: SmokeConfig,
    num_events: Option<usize>,
    cspad: bool,
    world_size: Option<usize>,
    element_type: Option<ElementArg>,
) -> SmokeConfig {
    if let Some(num_events) = num_events {
        config.num_events = num_events;
    }
    if cspad {
        config.detector = env_smoke_core::Detector::Cspad;
    }
    if let Some(world_size) = world_size {
        config.world_size = world_size;
    }
    if let Some(element_type) = element_type {
        config.element_type = element_type.into();
    }
    config
}
