// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Detector frame geometries used by the scatter benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detector {
    Cspad2x2,
    Cspad,
}

impl Detector {
    pub fn shape(&self) -> [usize; 3] {
        match self {
            Detector::Cspad2x2 => [2, 188, 385],
            Detector::Cspad => [32, 188, 385],
        }
    }

    pub fn num_elements(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Detector::Cspad2x2 => "cspad2x2",
            Detector::Cspad => "cspad",
        }
    }

    /// Builds one flattened frame of values in `[0, 100)`
    pub fn frame<T: Sample>(&self, seed: u64) -> Vec<T> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..self.num_elements())
            .map(|_| T::from_unit(rng.random::<f64>()))
            .collect()
    }
}

impl std::fmt::Display for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    F32,
    F64,
    I16,
}

impl ElementType {
    pub fn bytes_per_element(&self) -> usize {
        match self {
            ElementType::F32 => 4,
            ElementType::F64 => 8,
            ElementType::I16 => 2,
        }
    }
}

/// Element type a detector frame can be made of
pub trait Sample: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    const ELEMENT_TYPE: ElementType;

    /// Maps a uniform draw in `[0, 1)` to `100 * x`
    fn from_unit(x: f64) -> Self;
}

impl Sample for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::F32;

    fn from_unit(x: f64) -> Self {
        (100.0 * x) as f32
    }
}

impl Sample for f64 {
    const ELEMENT_TYPE: ElementType = ElementType::F64;

    fn from_unit(x: f64) -> Self {
        100.0 * x
    }
}

impl Sample for i16 {
    const ELEMENT_TYPE: ElementType = ElementType::I16;

    fn from_unit(x: f64) -> Self {
        (100.0 * x) as i16
    }
}
