//! Gender classification for static-table and base-mesh selection.
//!
//! The classifier selects which population-average table and which base
//! head mesh a scan uses; it is not surfaced to the user. Any internal
//! failure (missing model file, unreadable image, session error) falls
//! open to `Gender::Male` rather than failing the scan. `classify` keeps
//! the error path visible; `predict` supplies the fallback.

use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::value::Value;
use serde::{Deserialize, Serialize};

use crate::model;

/// Classifier input resolution.
const GENDER_INPUT_SIZE: u32 = 227;

/// Per-channel mean subtraction, B/G/R order, matching the training set.
const MODEL_MEAN_VALUES: [f32; 3] = [78.4263377603, 87.7689143744, 114.895847746];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Base head mesh asset for this gender.
    pub fn base_mesh_file(&self) -> &'static str {
        match self {
            Gender::Male => "male_head.obj",
            Gender::Female => "female_head.obj",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the front image, propagating every failure.
pub fn classify(models_dir: &Path, image_path: &Path) -> Result<Gender> {
    let mut session = model::gender_session(models_dir)?;

    let img = image::open(image_path)
        .with_context(|| format!("reading image {}", image_path.display()))?;

    // The classifier expects a face-centered 227x227 crop; the front scan
    // photo is assumed to be framed that way already.
    let size = GENDER_INPUT_SIZE;
    let face = img.resize_exact(size, size, image::imageops::FilterType::Triangle);
    let face_rgb = face.to_rgb8();

    // CHW in BGR order with per-channel mean subtraction
    let pixel_count = (size * size) as usize;
    let mut input_data = vec![0.0f32; 3 * pixel_count];
    let (b_channel, rest) = input_data.split_at_mut(pixel_count);
    let (g_channel, r_channel) = rest.split_at_mut(pixel_count);

    let pixels = face_rgb.as_raw();
    for i in 0..pixel_count {
        let idx = i * 3;
        r_channel[i] = pixels[idx] as f32 - MODEL_MEAN_VALUES[2];
        g_channel[i] = pixels[idx + 1] as f32 - MODEL_MEAN_VALUES[1];
        b_channel[i] = pixels[idx + 2] as f32 - MODEL_MEAN_VALUES[0];
    }

    let input_array = Array4::from_shape_vec((1, 3, size as usize, size as usize), input_data)?;
    let input_tensor = Value::from_array(input_array)?;

    let outputs = session.run(ort::inputs![input_tensor])?;
    let (_shape, data) = outputs[0].try_extract_tensor::<f32>()?;

    if data.len() < 2 {
        anyhow::bail!("gender model produced {} outputs, expected 2", data.len());
    }

    Ok(if data[1] > data[0] {
        Gender::Female
    } else {
        Gender::Male
    })
}

/// Classify the front image, defaulting to `Male` on any failure.
pub fn predict(models_dir: &Path, image_path: &Path) -> Gender {
    match classify(models_dir, image_path) {
        Ok(gender) => gender,
        Err(e) => {
            log::warn!("gender prediction failed: {e:#}. Defaulting to Male.");
            Gender::Male
        }
    }
}
