//! Plausibility validation.
//!
//! A failed or adversarial detection can still calibrate and produce
//! numbers; this check stops biometrically impossible values from being
//! persisted. The whole set is accepted or rejected atomically.

use crate::error::{PipelineError, Result};
use crate::measure::{keys, MeasurementSet};

/// Acceptable physical ranges in millimeters, endpoints inclusive.
/// Consulted only for the app-specific vocabulary.
pub const PLAUSIBLE_RANGES_MM: [(&str, f64, f64); 3] = [
    (keys::EYE_TO_EYE, 80.0, 140.0),
    (keys::EAR_TO_EAR, 120.0, 180.0),
    (keys::HEAD_HEIGHT, 180.0, 260.0),
];

/// Check every ranged measurement; the first violation rejects the set.
/// A required key that is absent is itself a violation.
pub fn validate_measurements(set: &MeasurementSet) -> Result<()> {
    for (feature, min, max) in PLAUSIBLE_RANGES_MM {
        let value = match set.get(feature) {
            Some(v) => v,
            None => return Err(PipelineError::MeasurementMissing { feature }),
        };
        if !(min..=max).contains(&value) {
            return Err(PipelineError::PlausibilityFailed {
                feature,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}
