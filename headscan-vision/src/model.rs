use std::path::Path;

use anyhow::{Context, Result};
use ort::{
    ep::{self, ExecutionProvider},
    session::{
        builder::{GraphOptimizationLevel, SessionBuilder},
        Session,
    },
};

/// File names expected under the configured models directory.
pub const LANDMARK_MODEL_FILE: &str = "face_landmarker.onnx";
pub const GENDER_MODEL_FILE: &str = "gender_net.onnx";
pub const BASE_HEADS_DIR: &str = "base_heads";

pub fn session_builder() -> Result<SessionBuilder> {
    let mut builder =
        Session::builder()?.with_optimization_level(GraphOptimizationLevel::Level3)?;

    #[cfg(feature = "openvino")]
    {
        let ep = ep::OpenVINO::default();
        if ep.is_available()? {
            ep.register(&mut builder)?;
        } else {
            log::warn!("openvino feature is enabled, onnx runtime not compiled with openvino")
        }
    }

    #[cfg(feature = "cuda")]
    {
        let ep = ep::CUDA::default();
        if ep.is_available()? {
            ep.register(&mut builder);
        } else {
            log::warn!("cuda feature is enabled, onnx runtime not compiled with cuda")
        }
    }

    Ok(builder)
}

/// Session over the 478-point face-mesh landmark model.
pub fn landmark_session(models_dir: &Path) -> Result<Session> {
    let path = models_dir.join(LANDMARK_MODEL_FILE);
    session_builder()?
        .commit_from_file(&path)
        .with_context(|| format!("load landmark model {}", path.display()))
}

/// Session over the binary gender classifier.
pub fn gender_session(models_dir: &Path) -> Result<Session> {
    let path = models_dir.join(GENDER_MODEL_FILE);
    session_builder()?
        .commit_from_file(&path)
        .with_context(|| format!("load gender model {}", path.display()))
}
