use std::path::PathBuf;

use ort::session::Session;

use crate::calibrate;
use crate::error::{PipelineError, Result};
use crate::facemesh;
use crate::gender;
use crate::measure::{self, MeasurementSchema, MeasurementSet};
use crate::reconstruct::{self, ReconstructionResult};
use crate::statics;

/// Everything the pipeline needs to know about its environment, passed in
/// explicitly at construction.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the landmark model, the gender classifier and the
    /// `base_heads` meshes.
    pub models_dir: PathBuf,
    /// Media root; generated meshes land under `outputs/` inside it.
    pub media_dir: PathBuf,
    /// Measurement vocabulary this deployment commits to.
    pub schema: MeasurementSchema,
    /// Face-presence threshold for the landmark extractor.
    pub min_detection_confidence: f32,
}

/// The four photos and identifier of one submitted scan. Immutable once
/// processing starts.
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub id: String,
    pub image_front: PathBuf,
    pub image_back: PathBuf,
    pub image_left: PathBuf,
    pub image_right: PathBuf,
}

/// Result of one successful pipeline run.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub measurements: MeasurementSet,
    pub reconstruction: ReconstructionResult,
}

/// Full pipeline: gender → landmarks → calibrate → measure → validate →
/// reconstruct (→ merge statics for the surface schema).
///
/// A strict composition: any component failure propagates unmodified, with
/// no retry and no partial result. Fault handling belongs to the caller.
pub struct Pipeline {
    landmarks: Session,
    config: PipelineConfig,
}

impl Pipeline {
    /// Load the landmark model fresh; one `Pipeline` serves one run.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let landmarks = crate::model::landmark_session(&config.models_dir)
            .map_err(|e| PipelineError::Pipeline(format!("{e:#}")))?;
        Ok(Self { landmarks, config })
    }

    pub fn process_scan(&mut self, scan: &ScanInput) -> Result<ScanOutcome> {
        log::info!("starting scan pipeline for {}", scan.id);

        // Fail-open: a broken classifier never fails the scan
        let gender = gender::predict(&self.config.models_dir, &scan.image_front);
        log::debug!("predicted gender: {gender}");

        let mesh = facemesh::extract_landmarks(
            &mut self.landmarks,
            &scan.image_front,
            self.config.min_detection_confidence,
        )?;
        let cal = calibrate::calibrate(&mesh)?;
        let measured = measure::measure(&mesh, &cal, self.config.schema)?;
        crate::validate::validate_measurements(&measured)?;

        let reconstruction = reconstruct::generate_head_model(
            &self.config.models_dir,
            &self.config.media_dir,
            gender,
            &scan.id,
            &measured,
        )?;

        let measurements = match self.config.schema {
            MeasurementSchema::AppBasic => measured,
            MeasurementSchema::Surface => {
                let dynamic = measure::dynamic_surface_entries(&mesh, &cal)?;
                MeasurementSet {
                    schema: MeasurementSchema::Surface,
                    values: statics::merge_dynamic(gender, &dynamic),
                    calibration: measured.calibration,
                    calibration_method: measured.calibration_method,
                }
            }
        };

        log::info!("pipeline finished successfully for {}", scan.id);
        Ok(ScanOutcome {
            measurements,
            reconstruction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_landmark_model_fails_construction() {
        let config = PipelineConfig {
            models_dir: PathBuf::from("/nonexistent/models"),
            media_dir: PathBuf::from("/nonexistent/media"),
            schema: MeasurementSchema::AppBasic,
            min_detection_confidence: crate::facemesh::MIN_FACE_SCORE,
        };
        assert!(Pipeline::new(config).is_err());
    }
}
