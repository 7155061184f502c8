// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{apply_overrides, Cli, Command};
use env_smoke_core::{
    divide_evenly, inventory, local_hostname, validate_partition, Orchestrator, SmokeConfig,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Divide {
            total,
            workers,
            json,
        } => divide(total, workers, json),
        Command::Validate {
            counts,
            offsets,
            total,
        } => {
            validate_partition(&counts, &offsets, total)?;
            println!(
                "counts={:?} offsets={:?} partition n={}",
                counts, offsets, total
            );
            Ok(())
        }
        Command::MpiSmoke {
            config,
            num_events,
            cspad,
            world_size,
            element_type,
        } => {
            let config = apply_overrides(
                load_config(&config),
                num_events,
                cspad,
                world_size,
                element_type,
            );
            mpi_smoke(config).await
        }
        Command::Inventory {
            bin_dir,
            search_paths,
            json,
        } => print_inventory(bin_dir, search_paths, json),
    }
}

fn divide(total: usize, workers: usize, json: bool) -> Result<()> {
    let partition = divide_evenly(total, workers)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&partition)?);
    } else {
        println!("offsets={:?}", partition.offsets());
        println!("counts={:?}", partition.counts());
    }
    Ok(())
}

fn load_config(path: &Path) -> SmokeConfig {
    match SmokeConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "using default configuration");
            SmokeConfig::default()
        }
    }
}

async fn mpi_smoke(config: SmokeConfig) -> Result<()> {
    let start_time = Instant::now();
    info!(
        world_size = config.world_size,
        num_events = config.num_events,
        detector = %config.detector,
        "starting MPI smoke test"
    );

    let orchestrator = Orchestrator::new(config, local_hostname())?;
    let cancel_token = orchestrator.cancellation_token();

    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl+C received, initiating shutdown");
            ctrl_c_token.cancel();
        }
    });

    orchestrator.run().await.context("MPI smoke test failed")?;

    info!(
        seconds = start_time.elapsed().as_secs_f64(),
        "MPI smoke test complete"
    );
    Ok(())
}

fn print_inventory(
    bin_dir: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
    json: bool,
) -> Result<()> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    let bin_dir = match bin_dir {
        Some(dir) => dir,
        None => inventory::interpreter_bin_dir(&path_var)?,
    };
    let search_paths = if search_paths.is_empty() {
        inventory::default_search_paths(&bin_dir)?
    } else {
        search_paths
    };

    let found = inventory::collect(&bin_dir, &search_paths, &path_var)
        .with_context(|| format!("inventory of {} failed", bin_dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    println!("=========== bins =============");
    println!("{}", found.bins.bins.join("\n"));
    println!("\n\n=========== imports =============");
    println!("{}", found.imports.imports.join("\n"));
    println!("\n\n=========== libs =============");
    println!("{}", found.libs.join("\n"));
    Ok(())
}
