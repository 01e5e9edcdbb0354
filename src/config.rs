use anyhow::{Context, Result};
use headscan_vision::MeasurementSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub static CONFIG_PATH: Lazy<&'static Path> = Lazy::new(|| {
    Path::new(option_env!("HEADSCAN_CONFIG_PATH").unwrap_or("/usr/local/etc/headscan/config.toml"))
});

pub static SCAN_STORE_PREFIX: Lazy<&'static Path> = Lazy::new(|| {
    Path::new(option_env!("HEADSCAN_STORE_PREFIX").unwrap_or("/usr/local/var/headscan"))
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory with the landmark model, gender classifier and base_heads/.
    pub models_dir: PathBuf,
    /// Media root; generated meshes are written under outputs/ inside it.
    pub media_dir: PathBuf,
    /// Measurement vocabulary this deployment commits to.
    pub schema: MeasurementSchema,
    /// Face-presence score below this is treated as "no face detected".
    pub min_detection_confidence: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("/usr/local/share/headscan/models"),
            media_dir: PathBuf::from("/usr/local/var/headscan/media"),
            schema: MeasurementSchema::AppBasic,
            min_detection_confidence: headscan_vision::facemesh::MIN_FACE_SCORE,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(&CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(&CONFIG_PATH);
    let data = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}
