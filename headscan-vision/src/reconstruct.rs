//! 3D head model generation.
//!
//! Reshaping the base mesh from the measured dimensions is not implemented
//! yet; the current behavior selects the base mesh by gender and copies it
//! to the scan's output path. The interface already takes the measurement
//! set so a real deformation step can slot in without touching callers.

use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::gender::Gender;
use crate::measure::{keys, MeasurementSet};
use crate::model::BASE_HEADS_DIR;

/// Subdirectory of the media root where generated meshes land.
pub const OUTPUTS_DIR: &str = "outputs";

#[derive(Debug, Clone)]
pub struct ReconstructionResult {
    /// Path of the generated mesh, relative to the media root.
    pub output_model_relative_path: String,
    pub gender: Gender,
}

pub fn generate_head_model(
    models_dir: &Path,
    media_dir: &Path,
    gender: Gender,
    scan_id: &str,
    measurements: &MeasurementSet,
) -> Result<ReconstructionResult> {
    let base_model_path = models_dir.join(BASE_HEADS_DIR).join(gender.base_mesh_file());
    if !base_model_path.is_file() {
        return Err(PipelineError::ReconstructionAssetMissing(base_model_path));
    }

    if let Some(head_height) = measurements.get(keys::HEAD_HEIGHT) {
        log::info!("simulating 3D reconstruction with head height {head_height:.2} mm");
    }

    let output_dir = media_dir.join(OUTPUTS_DIR);
    // Idempotent; reprocessing the same scan overwrites its previous mesh
    fs::create_dir_all(&output_dir)?;
    let output_filename = format!("{scan_id}.obj");
    fs::copy(&base_model_path, output_dir.join(&output_filename))?;

    Ok(ReconstructionResult {
        output_model_relative_path: format!("{OUTPUTS_DIR}/{output_filename}"),
        gender,
    })
}
