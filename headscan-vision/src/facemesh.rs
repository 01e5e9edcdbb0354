//! Face-mesh landmark extraction.
//!
//! Runs a 478-point face-mesh model (468-point topology refined with iris
//! landmarks, so the pupil centers exist at indices 468/473) over a single
//! photo. The model predicts one face; when several faces are present only
//! that one mesh is returned, a documented simplification.

use std::path::Path;

use image::GenericImageView;
use ndarray::Array4;
use ort::{session::Session, value::Value};

use crate::error::{PipelineError, Result};

/// Fixed input resolution of the face-mesh model.
const MESH_INPUT_SIZE: u32 = 192;

/// Number of landmark points the mesh topology defines.
pub const MESH_POINTS: usize = 478;

/// Default face-presence threshold; deployments may tune it via config.
pub const MIN_FACE_SCORE: f32 = 0.5;

/// One mesh point, normalized to [0,1] relative to image width/height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// The full mesh for one photo. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
    pub image_width: u32,
    pub image_height: u32,
}

impl LandmarkSet {
    /// Build a set from raw points, e.g. in tests or from a decoded tensor.
    pub fn from_points(points: Vec<Landmark>, image_width: u32, image_height: u32) -> Self {
        Self {
            points,
            image_width,
            image_height,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Result<Landmark> {
        self.points.get(index).copied().ok_or_else(|| {
            PipelineError::Pipeline(format!(
                "landmark index {} out of range ({} points)",
                index,
                self.points.len()
            ))
        })
    }

    /// Landmark converted to pixel space of the source image.
    pub fn pixel(&self, index: usize) -> Result<(f64, f64)> {
        let p = self.point(index)?;
        Ok((
            p.x as f64 * self.image_width as f64,
            p.y as f64 * self.image_height as f64,
        ))
    }
}

/// Decode an image and run the landmark model on it. A face-presence
/// score below `min_confidence` is a `FaceNotFound`.
pub fn extract_landmarks(
    session: &mut Session,
    image_path: &Path,
    min_confidence: f32,
) -> Result<LandmarkSet> {
    let img = image::open(image_path).map_err(|e| PipelineError::ImageUnreadable {
        path: image_path.to_path_buf(),
        source: e,
    })?;

    let (orig_width, orig_height) = img.dimensions();
    let target_size = MESH_INPUT_SIZE;

    // Pad to a square canvas before resizing to avoid distorting the face
    let max_dim = orig_width.max(orig_height);
    let scale = target_size as f32 / max_dim as f32;
    let new_width = (orig_width as f32 * scale) as u32;
    let new_height = (orig_height as f32 * scale) as u32;

    let resized = img.resize_exact(new_width, new_height, image::imageops::FilterType::Triangle);
    let mut canvas = image::DynamicImage::new_rgb8(target_size, target_size);
    let offset_x = (target_size - new_width) / 2;
    let offset_y = (target_size - new_height) / 2;
    image::imageops::overlay(&mut canvas, &resized, offset_x as i64, offset_y as i64);

    let img_rgb = canvas.to_rgb8();

    // Model expects [1, 3, H, W] RGB with values scaled to [0, 1]
    let pixel_count = (target_size * target_size) as usize;
    let mut input_data = vec![0.0f32; 3 * pixel_count];
    let (r_channel, rest) = input_data.split_at_mut(pixel_count);
    let (g_channel, b_channel) = rest.split_at_mut(pixel_count);

    let pixels = img_rgb.as_raw();
    for i in 0..pixel_count {
        let idx = i * 3;
        r_channel[i] = pixels[idx] as f32 / 255.0;
        g_channel[i] = pixels[idx + 1] as f32 / 255.0;
        b_channel[i] = pixels[idx + 2] as f32 / 255.0;
    }

    let input_array = Array4::from_shape_vec(
        (1, 3, target_size as usize, target_size as usize),
        input_data,
    )?;
    let input_tensor = Value::from_array(input_array)?;

    let outputs = session.run(ort::inputs![input_tensor])?;

    // The model emits a coordinate tensor (478 * 3 values in input-pixel
    // space) and a face-presence logit; identify them by element count.
    let mut coords: Option<Vec<f32>> = None;
    let mut score: Option<f32> = None;
    for (_name, output) in outputs.iter() {
        let (_shape, data) = output.try_extract_tensor::<f32>()?;
        if data.len() == MESH_POINTS * 3 {
            coords = Some(data.to_vec());
        } else if data.len() == 1 {
            score = Some(data[0]);
        }
    }

    let coords = coords.ok_or_else(|| {
        PipelineError::Pipeline("landmark model produced no coordinate tensor".to_string())
    })?;
    let score = score.ok_or_else(|| {
        PipelineError::Pipeline("landmark model produced no face score".to_string())
    })?;

    let presence = sigmoid(score);
    if presence < min_confidence {
        log::debug!("face presence {:.3} below threshold", presence);
        return Err(PipelineError::FaceNotFound);
    }

    // Coordinates are in canvas pixel space. Remove the padding offset,
    // undo the resize scale, then normalize to the original dimensions.
    let mut points = Vec::with_capacity(MESH_POINTS);
    for i in 0..MESH_POINTS {
        let cx = coords[i * 3];
        let cy = coords[i * 3 + 1];
        let x_px = (cx - offset_x as f32) / scale;
        let y_px = (cy - offset_y as f32) / scale;
        points.push(Landmark {
            x: x_px / orig_width as f32,
            y: y_px / orig_height as f32,
        });
    }

    Ok(LandmarkSet::from_points(points, orig_width, orig_height))
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_conversion() {
        let set = LandmarkSet::from_points(
            vec![Landmark { x: 0.5, y: 0.25 }],
            640,
            480,
        );
        let (x, y) = set.pixel(0).unwrap();
        assert_eq!(x, 320.0);
        assert_eq!(y, 120.0);
    }

    #[test]
    fn test_out_of_range_index() {
        let set = LandmarkSet::from_points(vec![], 640, 480);
        assert!(set.point(468).is_err());
    }

    #[test]
    fn test_sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
    }
}
