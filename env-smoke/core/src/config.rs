// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Detector, ElementType};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings for the in-process MPI smoke run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Number of ranks, root included
    pub world_size: usize,
    /// Frames scattered by the benchmark
    pub num_events: usize,
    pub detector: Detector,
    pub element_type: ElementType,
    pub barrier_before: bool,
    pub barrier_after: bool,
    /// Copy the frame into a fresh send buffer before every scatter
    pub with_copy: bool,
    pub seed: u64,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            world_size: 3,
            num_events: 120,
            detector: Detector::Cspad2x2,
            element_type: ElementType::F32,
            barrier_before: false,
            barrier_after: true,
            with_copy: false,
            seed: 153,
        }
    }
}

impl SmokeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}
