//! Exercises the calibration and measurement chain on a synthetic mesh,
//! without any model inference involved.

use headscan_vision::calibrate::{calibrate, LEFT_PUPIL_INDEX, RIGHT_PUPIL_INDEX};
use headscan_vision::facemesh::{Landmark, LandmarkSet};
use headscan_vision::measure::{keys, measure, MeasurementSchema};
use headscan_vision::statics;
use headscan_vision::validate::validate_measurements;
use headscan_vision::{Gender, PipelineError};

/// A 1000x1000 frame: pupils 100px apart, tragion pair 220px apart, eye
/// corners 160px apart, crown-to-chin 220px.
fn synthetic_front_mesh() -> LandmarkSet {
    let mut points = vec![Landmark { x: 0.5, y: 0.5 }; 478];
    points[RIGHT_PUPIL_INDEX] = Landmark { x: 0.45, y: 0.5 };
    points[LEFT_PUPIL_INDEX] = Landmark { x: 0.55, y: 0.5 };
    points[454] = Landmark { x: 0.61, y: 0.5 };
    points[234] = Landmark { x: 0.39, y: 0.5 };
    points[359] = Landmark { x: 0.58, y: 0.5 };
    points[130] = Landmark { x: 0.42, y: 0.5 };
    points[10] = Landmark { x: 0.5, y: 0.35 };
    points[152] = Landmark { x: 0.5, y: 0.57 };
    LandmarkSet::from_points(points, 1000, 1000)
}

#[test]
fn calibration_from_100px_pupils() {
    let cal = calibrate(&synthetic_front_mesh()).unwrap();
    assert!((cal.pixels_per_mm - 1.5625).abs() < 1e-9);
}

#[test]
fn ear_to_ear_from_220px_is_140_8_mm() {
    let mesh = synthetic_front_mesh();
    let cal = calibrate(&mesh).unwrap();
    let set = measure(&mesh, &cal, MeasurementSchema::AppBasic).unwrap();
    assert!((set.get(keys::EAR_TO_EAR).unwrap() - 140.8).abs() < 1e-9);
}

#[test]
fn short_head_fails_plausibility() {
    let mesh = synthetic_front_mesh();
    let cal = calibrate(&mesh).unwrap();
    let set = measure(&mesh, &cal, MeasurementSchema::AppBasic).unwrap();
    // eye_to_eye 102.4, ear_to_ear 140.8, head_height 140.8... head_height
    // here is 220px / 1.5625 = 140.8 which is below the 180mm floor
    let err = validate_measurements(&set).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::PlausibilityFailed {
            feature: "head_height",
            ..
        }
    ));
}

#[test]
fn taller_head_passes_validation() {
    let mut mesh = synthetic_front_mesh();
    // Stretch crown-to-chin to 320px → 204.8 mm, inside [180, 260]
    let mut points: Vec<Landmark> = (0..mesh.len()).map(|i| mesh.point(i).unwrap()).collect();
    points[10] = Landmark { x: 0.5, y: 0.30 };
    points[152] = Landmark { x: 0.5, y: 0.62 };
    mesh = LandmarkSet::from_points(points, 1000, 1000);

    let cal = calibrate(&mesh).unwrap();
    let set = measure(&mesh, &cal, MeasurementSchema::AppBasic).unwrap();
    assert!((set.get(keys::HEAD_HEIGHT).unwrap() - 204.8).abs() < 1e-9);
    assert!(validate_measurements(&set).is_ok());
}

#[test]
fn surface_schema_emits_full_vocabulary_only() {
    let mesh = synthetic_front_mesh();
    let cal = calibrate(&mesh).unwrap();
    let dynamic = headscan_vision::measure::dynamic_surface_entries(&mesh, &cal).unwrap();
    let merged = statics::merge_dynamic(Gender::Female, &dynamic);

    for key in keys::SURFACE {
        assert!(merged.contains_key(key), "missing {key}");
    }
    // Surface sets never carry app-basic keys
    assert!(!merged.contains_key(keys::EYE_TO_EYE));
    assert!(!merged.contains_key(keys::HEAD_LENGTH));
}
