use std::path::PathBuf;

use thiserror::Error;

/// Failures a pipeline run can surface to its caller.
///
/// Every component is allowed to propagate its failure unmodified through the
/// orchestrator; nothing is retried or suppressed inside the pipeline except
/// the gender predictor's deliberate fail-open default.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not read image at {}: {source}", .path.display())]
    ImageUnreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("face not detected in the image")]
    FaceNotFound,

    #[error("calibration failed: {0}")]
    CalibrationFailed(String),

    #[error(
        "plausibility check failed for {feature}: value {value:.2} mm not in range [{min}, {max}]"
    )]
    PlausibilityFailed {
        feature: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("plausibility check failed for {feature}: measurement missing")]
    MeasurementMissing { feature: &'static str },

    #[error("base head asset missing: {}", .0.display())]
    ReconstructionAssetMissing(PathBuf),

    /// Catch-all for inference/runtime failures that have no dedicated variant.
    #[error("{0}")]
    Pipeline(String),
}

impl From<ort::Error> for PipelineError {
    fn from(e: ort::Error) -> Self {
        PipelineError::Pipeline(e.to_string())
    }
}

impl From<ndarray::ShapeError> for PipelineError {
    fn from(e: ndarray::ShapeError) -> Self {
        PipelineError::Pipeline(e.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::Pipeline(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_image_unreadable_chains_decode_error() {
        let err = PipelineError::ImageUnreadable {
            path: PathBuf::from("/tmp/front.jpg"),
            source: image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "missing",
            )),
        };
        assert!(err.to_string().contains("/tmp/front.jpg"));
        assert!(err.source().is_some());
    }
}

