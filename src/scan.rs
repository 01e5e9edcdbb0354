use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

use headscan_vision::pipeline::ScanInput;
use serde::{Deserialize, Serialize};

/// Processing state of one scan. Exactly one pipeline run is attempted per
/// submission; the record terminates in Completed or Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "PROCESSING")]
    Processing,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "FAILED")]
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Processing => "PROCESSING",
            Status::Completed => "COMPLETED",
            Status::Failed => "FAILED",
        }
    }
}

/// The persisted scan record. Measurement fields hold centimeters and stay
/// `None` until a run completes; a failed run populates only
/// `failure_reason`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: String,
    pub user: String,

    // User inputs, immutable once processing starts
    pub name: String,
    pub notes: Option<String>,
    pub custom_field: Option<String>,
    pub image_front: PathBuf,
    pub image_back: PathBuf,
    pub image_left: PathBuf,
    pub image_right: PathBuf,

    // Processing & outputs
    pub status: Status,
    pub failure_reason: Option<String>,
    pub processed_model_path: Option<String>,

    // App-specific measurements (cm)
    pub eye_to_eye: Option<f64>,
    pub ear_to_ear: Option<f64>,
    pub head_width: Option<f64>,
    pub head_height: Option<f64>,
    pub head_length: Option<f64>,

    // Surface measurements (cm)
    pub head_circumference_a: Option<f64>,
    pub forehead_to_back_b: Option<f64>,
    pub cross_measurement_c: Option<f64>,
    pub under_chin_d: Option<f64>,
    pub eyebrow_to_earlobe_e: Option<f64>,
    pub eye_corner_to_ear_f: Option<f64>,
    pub ear_height_g: Option<f64>,
    pub ear_width_h: Option<f64>,
    pub cheek_guard_clearance_l: Option<f64>,
    pub cheek_guard_height_m: Option<f64>,
    pub cheek_guard_width_n: Option<f64>,

    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl ScanRecord {
    pub fn new(
        user: String,
        name: String,
        notes: Option<String>,
        custom_field: Option<String>,
        image_front: PathBuf,
        image_back: PathBuf,
        image_left: PathBuf,
        image_right: PathBuf,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user,
            name,
            notes,
            custom_field,
            image_front,
            image_back,
            image_left,
            image_right,
            status: Status::Processing,
            failure_reason: None,
            processed_model_path: None,
            eye_to_eye: None,
            ear_to_ear: None,
            head_width: None,
            head_height: None,
            head_length: None,
            head_circumference_a: None,
            forehead_to_back_b: None,
            cross_measurement_c: None,
            under_chin_d: None,
            eyebrow_to_earlobe_e: None,
            eye_corner_to_ear_f: None,
            ear_height_g: None,
            ear_width_h: None,
            cheek_guard_clearance_l: None,
            cheek_guard_height_m: None,
            cheek_guard_width_n: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The pipeline-facing view of this record.
    pub fn to_input(&self) -> ScanInput {
        ScanInput {
            id: self.id.clone(),
            image_front: self.image_front.clone(),
            image_back: self.image_back.clone(),
            image_left: self.image_left.clone(),
            image_right: self.image_right.clone(),
        }
    }

    /// Write pipeline measurements (millimeters) onto the record,
    /// converting to centimeters. Keys without a matching field are
    /// ignored.
    pub fn apply_measurements(&mut self, values: &BTreeMap<&'static str, f64>) {
        for (key, mm) in values {
            let cm = mm / 10.0;
            match *key {
                "eye_to_eye" => self.eye_to_eye = Some(cm),
                "ear_to_ear" => self.ear_to_ear = Some(cm),
                "head_width" => self.head_width = Some(cm),
                "head_height" => self.head_height = Some(cm),
                "head_length" => self.head_length = Some(cm),
                "head_circumference_A" => self.head_circumference_a = Some(cm),
                "forehead_to_back_B" => self.forehead_to_back_b = Some(cm),
                "cross_measurement_C" => self.cross_measurement_c = Some(cm),
                "under_chin_D" => self.under_chin_d = Some(cm),
                "eyebrow_to_earlobe_E" => self.eyebrow_to_earlobe_e = Some(cm),
                "eye_corner_to_ear_F" => self.eye_corner_to_ear_f = Some(cm),
                "ear_height_G" => self.ear_height_g = Some(cm),
                "ear_width_H" => self.ear_width_h = Some(cm),
                "cheek_guard_clearance_L" => self.cheek_guard_clearance_l = Some(cm),
                "cheek_guard_height_M" => self.cheek_guard_height_m = Some(cm),
                "cheek_guard_width_N" => self.cheek_guard_width_n = Some(cm),
                other => log::debug!("no record field for measurement {other}"),
            }
        }
    }

    pub fn has_measurements(&self) -> bool {
        self.eye_to_eye.is_some()
            || self.ear_to_ear.is_some()
            || self.head_height.is_some()
            || self.head_circumference_a.is_some()
    }
}
