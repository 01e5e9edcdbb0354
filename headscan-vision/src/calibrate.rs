//! Biometric scale calibration.
//!
//! The pipeline has no physical reference object in frame, so it assumes a
//! population-average interpupillary distance and derives a pixels-per-mm
//! scale from the detected pupil centers. An accepted accuracy trade-off:
//! per-subject IPD varies a few millimeters around the assumed constant.

use crate::error::{PipelineError, Result};
use crate::facemesh::LandmarkSet;

/// Population-average interpupillary distance.
pub const ASSUMED_IPD_MM: f64 = 64.0;

/// Iris-refined pupil center indices in the 478-point mesh topology.
pub const RIGHT_PUPIL_INDEX: usize = 468;
pub const LEFT_PUPIL_INDEX: usize = 473;

/// Below this pixel distance the detection is degenerate, not a valid scale.
const MIN_IPD_PIXELS: f64 = 1.0;

/// Provenance tag written alongside every measurement set.
pub const CALIBRATION_METHOD: &str = "Biometric IPD Assumption";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationResult {
    pub assumed_ipd_mm: f64,
    pub pixels_per_mm: f64,
}

/// Euclidean distance between two landmarks in source-image pixel space.
pub fn pixel_distance(landmarks: &LandmarkSet, a: usize, b: usize) -> Result<f64> {
    let (ax, ay) = landmarks.pixel(a)?;
    let (bx, by) = landmarks.pixel(b)?;
    Ok(((ax - bx).powi(2) + (ay - by).powi(2)).sqrt())
}

/// Derive the pixels-per-mm scale from the pupil pair.
pub fn calibrate(landmarks: &LandmarkSet) -> Result<CalibrationResult> {
    let ipd_pixels = pixel_distance(landmarks, LEFT_PUPIL_INDEX, RIGHT_PUPIL_INDEX)?;

    if ipd_pixels < MIN_IPD_PIXELS {
        return Err(PipelineError::CalibrationFailed(format!(
            "pupils could not be distinguished ({:.3} px apart)",
            ipd_pixels
        )));
    }

    let pixels_per_mm = ipd_pixels / ASSUMED_IPD_MM;
    log::debug!(
        "calibrated {:.4} px/mm from {:.1} px pupil distance",
        pixels_per_mm,
        ipd_pixels
    );

    Ok(CalibrationResult {
        assumed_ipd_mm: ASSUMED_IPD_MM,
        pixels_per_mm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facemesh::Landmark;

    fn set_with_pupils(left: (f32, f32), right: (f32, f32)) -> LandmarkSet {
        let mut points = vec![Landmark { x: 0.0, y: 0.0 }; 478];
        points[RIGHT_PUPIL_INDEX] = Landmark {
            x: right.0,
            y: right.1,
        };
        points[LEFT_PUPIL_INDEX] = Landmark {
            x: left.0,
            y: left.1,
        };
        LandmarkSet::from_points(points, 1000, 1000)
    }

    #[test]
    fn test_scale_is_pixel_distance_over_ipd() {
        // Pupils 100px apart on a 1000px-wide image
        let set = set_with_pupils((0.45, 0.5), (0.55, 0.5));
        let cal = calibrate(&set).unwrap();
        assert!((cal.pixels_per_mm - 100.0 / 64.0).abs() < 1e-9);
        assert_eq!(cal.assumed_ipd_mm, 64.0);
    }

    #[test]
    fn test_coincident_pupils_fail() {
        let set = set_with_pupils((0.5, 0.5), (0.5, 0.5));
        let err = calibrate(&set).unwrap_err();
        assert!(matches!(err, PipelineError::CalibrationFailed(_)));
    }

    #[test]
    fn test_sub_pixel_distance_fails_without_nan() {
        let set = set_with_pupils((0.5, 0.5), (0.5005, 0.5));
        match calibrate(&set) {
            Err(PipelineError::CalibrationFailed(_)) => {}
            Ok(cal) => panic!("expected failure, got scale {}", cal.pixels_per_mm),
            Err(e) => panic!("wrong error: {e}"),
        }
    }

    #[test]
    fn test_scale_always_positive_and_finite() {
        let set = set_with_pupils((0.4, 0.5), (0.6, 0.5));
        let cal = calibrate(&set).unwrap();
        assert!(cal.pixels_per_mm.is_finite());
        assert!(cal.pixels_per_mm > 0.0);
    }
}
