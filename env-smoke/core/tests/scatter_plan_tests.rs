// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use env_smoke_core::{Detector, ElementType, PartitionError, Sample, ScatterPlan};

#[test]
fn test_root_slot_is_empty_and_receivers_split_the_rest() {
    let plan = ScatterPlan::new(11, 4).unwrap();
    assert_eq!(plan.counts(), &[0, 4, 4, 3]);
    assert_eq!(plan.offsets(), &[0, 0, 4, 8]);
    assert_eq!(plan.receivers(), 3);
    assert!(plan.validate().is_ok());
}

#[test]
fn test_plan_slices_follow_offsets() {
    let frame: Vec<u32> = (0..11).collect();
    let plan = ScatterPlan::new(11, 4).unwrap();
    assert!(plan.slice(&frame, 0).is_empty());
    assert_eq!(plan.slice(&frame, 1), &[0, 1, 2, 3]);
    assert_eq!(plan.slice(&frame, 3), &[8, 9, 10]);
}

#[test]
fn test_world_of_one_cannot_scatter() {
    let err = ScatterPlan::new(10, 1).unwrap_err();
    assert!(matches!(err, PartitionError::InvalidArgument { value: 0, .. }));
}

#[test]
fn test_cspad2x2_plan_covers_the_frame() {
    let detector = Detector::Cspad2x2;
    assert_eq!(detector.num_elements(), 2 * 188 * 385);
    let plan = ScatterPlan::new(detector.num_elements(), 3).unwrap();
    assert!(plan.validate().is_ok());
    assert_eq!(plan.count(1), plan.count(2));
}

#[test]
fn test_cspad_is_sixteen_cspad2x2_frames() {
    assert_eq!(
        Detector::Cspad.num_elements(),
        16 * Detector::Cspad2x2.num_elements()
    );
    assert_eq!(Detector::Cspad.shape(), [32, 188, 385]);
}

#[test]
fn test_element_widths() {
    assert_eq!(ElementType::F32.bytes_per_element(), 4);
    assert_eq!(ElementType::F64.bytes_per_element(), 8);
    assert_eq!(ElementType::I16.bytes_per_element(), 2);
    assert_eq!(<f32 as Sample>::ELEMENT_TYPE, ElementType::F32);
}

#[test]
fn test_frames_are_seeded_and_in_range() {
    let first: Vec<f64> = Detector::Cspad2x2.frame(153);
    let second: Vec<f64> = Detector::Cspad2x2.frame(153);
    assert_eq!(first, second);
    assert!(first.iter().all(|value| (0.0..100.0).contains(value)));

    let other: Vec<f64> = Detector::Cspad2x2.frame(154);
    assert_ne!(first, other);
}
