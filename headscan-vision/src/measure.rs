//! Pixel-to-physical measurement derivation.
//!
//! Designated landmark pairs are measured in pixel space and divided by the
//! calibrated pixels-per-mm scale. All values produced here are millimeters;
//! the persistence layer converts to centimeters at rest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calibrate::{pixel_distance, CalibrationResult};
use crate::error::Result;
use crate::facemesh::{Landmark, LandmarkSet};

/// Measurement vocabulary a pipeline run commits to. The two sets are not
/// reconcilable and are never mixed within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSchema {
    /// The five-field app-specific set, range-validated.
    #[default]
    AppBasic,
    /// The letter-coded surface set, static defaults overlaid with any
    /// dynamically derivable entries.
    Surface,
}

/// Measurement names, fixed vocabulary.
pub mod keys {
    pub const EYE_TO_EYE: &str = "eye_to_eye";
    pub const EAR_TO_EAR: &str = "ear_to_ear";
    pub const HEAD_WIDTH: &str = "head_width";
    pub const HEAD_HEIGHT: &str = "head_height";
    pub const HEAD_LENGTH: &str = "head_length";

    pub const HEAD_CIRCUMFERENCE_A: &str = "head_circumference_A";
    pub const FOREHEAD_TO_BACK_B: &str = "forehead_to_back_B";
    pub const CROSS_MEASUREMENT_C: &str = "cross_measurement_C";
    pub const UNDER_CHIN_D: &str = "under_chin_D";
    pub const EYEBROW_TO_EARLOBE_E: &str = "eyebrow_to_earlobe_E";
    pub const EYE_CORNER_TO_EAR_F: &str = "eye_corner_to_ear_F";
    pub const EAR_HEIGHT_G: &str = "ear_height_G";
    pub const EAR_WIDTH_H: &str = "ear_width_H";
    pub const CHEEK_GUARD_CLEARANCE_L: &str = "cheek_guard_clearance_L";
    pub const CHEEK_GUARD_HEIGHT_M: &str = "cheek_guard_height_M";
    pub const CHEEK_GUARD_WIDTH_N: &str = "cheek_guard_width_N";

    /// The surface vocabulary. Letters run A through N; I, J and K were
    /// never assigned in the measurement sheet this vocabulary comes from.
    pub const SURFACE: [&str; 11] = [
        HEAD_CIRCUMFERENCE_A,
        FOREHEAD_TO_BACK_B,
        CROSS_MEASUREMENT_C,
        UNDER_CHIN_D,
        EYEBROW_TO_EARLOBE_E,
        EYE_CORNER_TO_EAR_F,
        EAR_HEIGHT_G,
        EAR_WIDTH_H,
        CHEEK_GUARD_CLEARANCE_L,
        CHEEK_GUARD_HEIGHT_M,
        CHEEK_GUARD_WIDTH_N,
    ];
}

// Landmark index pairs for the app-specific vocabulary.
const EYE_TO_EYE_PAIR: (usize, usize) = (359, 130);
const EAR_TO_EAR_PAIR: (usize, usize) = (454, 234);
const HEAD_HEIGHT_PAIR: (usize, usize) = (10, 152);

// Points for the ratio-based head-height derivation.
const RIGHT_EYEBROW_INDEX: usize = 105;
const LEFT_EYEBROW_INDEX: usize = 334;
const NOSE_TIP_INDEX: usize = 1;

// Points for the dynamically derivable surface entries.
const LEFT_EYE_OUTER_INDEX: usize = 359;
const LEFT_TRAGION_INDEX: usize = 454;
const LEFT_EARLOBE_INDEX: usize = 361;

/// Empirical multiplier from eyebrow-midpoint-to-nose-tip distance to full
/// head height, used by the surface-schema derivation.
pub const HEAD_HEIGHT_RATIO: f64 = 3.1;

/// Head length is never measured independently; it is approximated from
/// head height with this factor, in every schema.
pub const HEAD_LENGTH_FACTOR: f64 = 1.1;

/// Named physical measurements in millimeters, annotated with the
/// calibration that produced them.
#[derive(Debug, Clone)]
pub struct MeasurementSet {
    pub schema: MeasurementSchema,
    pub values: BTreeMap<&'static str, f64>,
    pub calibration: CalibrationResult,
    pub calibration_method: &'static str,
}

impl MeasurementSet {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

fn feature_mm(landmarks: &LandmarkSet, pair: (usize, usize), cal: &CalibrationResult) -> Result<f64> {
    Ok(pixel_distance(landmarks, pair.0, pair.1)? / cal.pixels_per_mm)
}

fn midpoint(a: Landmark, b: Landmark) -> Landmark {
    Landmark {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

/// Head height from the eyebrow midpoint to the nose tip, scaled by the
/// empirical ratio. The crown landmark sits at the hairline rather than the
/// top of the skull, so the surface schema prefers this derivation.
fn ratio_head_height(landmarks: &LandmarkSet, cal: &CalibrationResult) -> Result<f64> {
    let brow = midpoint(
        landmarks.point(RIGHT_EYEBROW_INDEX)?,
        landmarks.point(LEFT_EYEBROW_INDEX)?,
    );
    let nose = landmarks.point(NOSE_TIP_INDEX)?;
    let dx = (brow.x - nose.x) as f64 * landmarks.image_width as f64;
    let dy = (brow.y - nose.y) as f64 * landmarks.image_height as f64;
    let px = (dx * dx + dy * dy).sqrt();
    Ok(px / cal.pixels_per_mm * HEAD_HEIGHT_RATIO)
}

/// Derive the app-specific measurement set from one front-image mesh.
///
/// This is also the internal base of the surface schema: its values feed
/// the plausibility check and the reconstruction step before the surface
/// table is assembled.
pub fn measure(
    landmarks: &LandmarkSet,
    cal: &CalibrationResult,
    schema: MeasurementSchema,
) -> Result<MeasurementSet> {
    let eye_to_eye = feature_mm(landmarks, EYE_TO_EYE_PAIR, cal)?;
    let ear_to_ear = feature_mm(landmarks, EAR_TO_EAR_PAIR, cal)?;

    let head_height = match schema {
        MeasurementSchema::AppBasic => feature_mm(landmarks, HEAD_HEIGHT_PAIR, cal)?,
        MeasurementSchema::Surface => ratio_head_height(landmarks, cal)?,
    };

    let mut values = BTreeMap::new();
    values.insert(keys::EYE_TO_EYE, eye_to_eye);
    values.insert(keys::EAR_TO_EAR, ear_to_ear);
    values.insert(keys::HEAD_WIDTH, ear_to_ear);
    values.insert(keys::HEAD_HEIGHT, head_height);
    values.insert(keys::HEAD_LENGTH, head_height * HEAD_LENGTH_FACTOR);

    Ok(MeasurementSet {
        schema,
        values,
        calibration: *cal,
        calibration_method: crate::calibrate::CALIBRATION_METHOD,
    })
}

/// Surface entries a single front image can actually measure. Everything
/// else in the surface vocabulary comes from the static tables.
pub fn dynamic_surface_entries(
    landmarks: &LandmarkSet,
    cal: &CalibrationResult,
) -> Result<BTreeMap<&'static str, f64>> {
    let mut values = BTreeMap::new();
    values.insert(
        keys::EYEBROW_TO_EARLOBE_E,
        feature_mm(landmarks, (LEFT_EYEBROW_INDEX, LEFT_EARLOBE_INDEX), cal)?,
    );
    values.insert(
        keys::EYE_CORNER_TO_EAR_F,
        feature_mm(landmarks, (LEFT_EYE_OUTER_INDEX, LEFT_TRAGION_INDEX), cal)?,
    );
    Ok(values)
}
