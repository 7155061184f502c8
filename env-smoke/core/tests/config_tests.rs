// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use env_smoke_core::{ConfigError, Detector, ElementType, SmokeConfig};
use std::fs;

#[test]
fn test_defaults_match_the_reference_run() {
    let config = SmokeConfig::default();
    assert_eq!(config.world_size, 3);
    assert_eq!(config.num_events, 120);
    assert_eq!(config.detector, Detector::Cspad2x2);
    assert_eq!(config.element_type, ElementType::F32);
    assert!(!config.barrier_before);
    assert!(config.barrier_after);
    assert!(!config.with_copy);
    assert_eq!(config.seed, 153);
}

#[test]
fn test_missing_fields_take_defaults() {
    let config =
        SmokeConfig::from_json(r#"{ "num_events": 10, "detector": "cspad", "element_type": "i16" }"#)
            .unwrap();
    assert_eq!(config.num_events, 10);
    assert_eq!(config.detector, Detector::Cspad);
    assert_eq!(config.element_type, ElementType::I16);
    assert_eq!(config.world_size, 3);
}

#[test]
fn test_load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("env-smoke.json");
    fs::write(&path, r#"{ "world_size": 8, "with_copy": true }"#).unwrap();

    let config = SmokeConfig::load(&path).unwrap();
    assert_eq!(config.world_size, 8);
    assert!(config.with_copy);
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("env-smoke.json");
    fs::write(&path, "{ world_size: ").unwrap();

    assert!(matches!(
        SmokeConfig::load(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        SmokeConfig::load(dir.path().join("absent.json")),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_unknown_detector_is_rejected() {
    assert!(SmokeConfig::from_json(r#"{ "detector": "epix" }"#).is_err());
}
