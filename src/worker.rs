//! Runs the pipeline for one scan and persists the outcome.
//!
//! This is the task-execution side of the system: the pipeline itself is a
//! strict composition that either returns a result or raises a typed
//! error; everything here is about turning that into a terminal record
//! state without ever crashing the worker.

use std::path::Path;
use std::time::SystemTime;

use anyhow::Result;
use headscan_vision::{Pipeline, PipelineConfig, PipelineError, ScanOutcome};
use log::{error, info, warn};

use crate::config::{Config, SCAN_STORE_PREFIX};
use crate::scan::{ScanRecord, Status};
use crate::store;

/// Load the record, run one pipeline attempt and persist the terminal
/// state. The final save is best-effort: a store failure is logged, never
/// propagated as a worker crash.
pub fn process_scan(cfg: &Config, scan_id: &str) -> Result<()> {
    process_scan_at(&SCAN_STORE_PREFIX, cfg, scan_id)
}

pub fn process_scan_at(prefix: &Path, cfg: &Config, scan_id: &str) -> Result<()> {
    let mut record = store::load_record_at(prefix, scan_id)?;

    // Guard the Processing -> terminal transition: a completed scan is
    // never reprocessed. A failed one may be re-attempted once by the
    // caller.
    if record.status == Status::Completed {
        warn!("scan {scan_id} already completed, skipping");
        return Ok(());
    }

    let outcome = run_pipeline(cfg, &record);
    apply_outcome(&mut record, outcome);

    if let Err(e) = store::save_record_at(prefix, &record) {
        error!("failed to persist scan {scan_id}: {e:#}");
    }
    Ok(())
}

fn run_pipeline(
    cfg: &Config,
    record: &ScanRecord,
) -> std::result::Result<ScanOutcome, PipelineError> {
    let mut pipeline = Pipeline::new(PipelineConfig {
        models_dir: cfg.models_dir.clone(),
        media_dir: cfg.media_dir.clone(),
        schema: cfg.schema,
        min_detection_confidence: cfg.min_detection_confidence,
    })?;
    pipeline.process_scan(&record.to_input())
}

/// Fold a pipeline result into the record: millimeter values become
/// centimeters on success; any error marks the scan FAILED with its
/// stringified reason and leaves every measurement field null.
pub fn apply_outcome(
    record: &mut ScanRecord,
    result: std::result::Result<ScanOutcome, PipelineError>,
) {
    match result {
        Ok(outcome) => {
            record.apply_measurements(&outcome.measurements.values);
            record.processed_model_path =
                Some(outcome.reconstruction.output_model_relative_path);
            record.status = Status::Completed;
            record.failure_reason = None;
            info!("scan {} completed", record.id);
        }
        Err(e) => {
            error!("scan {} failed: {e}", record.id);
            record.status = Status::Failed;
            record.failure_reason = Some(e.to_string());
        }
    }
    record.updated_at = SystemTime::now();
}

#[cfg(test)]
mod tests {
    use super::*;
    use headscan_vision::calibrate::CalibrationResult;
    use headscan_vision::measure::{keys, MeasurementSchema, MeasurementSet};
    use headscan_vision::{Gender, ReconstructionResult};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn record() -> ScanRecord {
        ScanRecord::new(
            "carol".into(),
            "scan".into(),
            None,
            None,
            PathBuf::from("front.jpg"),
            PathBuf::from("back.jpg"),
            PathBuf::from("left.jpg"),
            PathBuf::from("right.jpg"),
        )
    }

    fn outcome() -> ScanOutcome {
        let mut values = BTreeMap::new();
        values.insert(keys::EAR_TO_EAR, 140.8);
        values.insert(keys::HEAD_HEIGHT, 204.8);
        ScanOutcome {
            measurements: MeasurementSet {
                schema: MeasurementSchema::AppBasic,
                values,
                calibration: CalibrationResult {
                    assumed_ipd_mm: 64.0,
                    pixels_per_mm: 1.5625,
                },
                calibration_method: "Biometric IPD Assumption",
            },
            reconstruction: ReconstructionResult {
                output_model_relative_path: "outputs/test.obj".into(),
                gender: Gender::Male,
            },
        }
    }

    #[test]
    fn test_success_persists_centimeters_and_model_path() {
        let mut r = record();
        apply_outcome(&mut r, Ok(outcome()));

        assert_eq!(r.status, Status::Completed);
        assert_eq!(r.ear_to_ear, Some(14.08));
        assert_eq!(r.head_height, Some(20.48));
        assert_eq!(r.processed_model_path.as_deref(), Some("outputs/test.obj"));
        assert!(r.failure_reason.is_none());
    }

    #[test]
    fn test_no_face_marks_failed_with_reason() {
        let mut r = record();
        apply_outcome(&mut r, Err(PipelineError::FaceNotFound));

        assert_eq!(r.status, Status::Failed);
        let reason = r.failure_reason.as_deref().unwrap();
        assert!(reason.contains("face not detected"));
        assert!(!r.has_measurements());
        assert!(r.processed_model_path.is_none());
    }

    #[test]
    fn test_plausibility_failure_reason_names_feature() {
        let mut r = record();
        apply_outcome(
            &mut r,
            Err(PipelineError::PlausibilityFailed {
                feature: "ear_to_ear",
                value: 300.0,
                min: 120.0,
                max: 180.0,
            }),
        );
        assert_eq!(r.status, Status::Failed);
        assert!(r.failure_reason.as_deref().unwrap().contains("ear_to_ear"));
    }

    #[test]
    fn test_missing_models_produce_failed_record() {
        let prefix =
            std::env::temp_dir().join(format!("headscan-worker-{}", std::process::id()));
        std::fs::create_dir_all(&prefix).unwrap();

        let r = record();
        let id = r.id.clone();
        store::save_record_at(&prefix, &r).unwrap();

        let cfg = Config {
            models_dir: PathBuf::from("/nonexistent/models"),
            media_dir: prefix.join("media"),
            schema: MeasurementSchema::AppBasic,
            min_detection_confidence: 0.5,
        };
        process_scan_at(&prefix, &cfg, &id).unwrap();

        let loaded = store::load_record_at(&prefix, &id).unwrap();
        assert_eq!(loaded.status, Status::Failed);
        assert!(loaded.failure_reason.is_some());
        assert!(!loaded.has_measurements());
    }

    #[test]
    fn test_completed_scan_not_reprocessed() {
        let prefix =
            std::env::temp_dir().join(format!("headscan-worker-done-{}", std::process::id()));
        std::fs::create_dir_all(&prefix).unwrap();

        let mut r = record();
        apply_outcome(&mut r, Ok(outcome()));
        let id = r.id.clone();
        store::save_record_at(&prefix, &r).unwrap();

        let cfg = Config {
            models_dir: PathBuf::from("/nonexistent/models"),
            media_dir: prefix.join("media"),
            schema: MeasurementSchema::AppBasic,
            min_detection_confidence: 0.5,
        };
        process_scan_at(&prefix, &cfg, &id).unwrap();

        // Still completed, not overwritten by a failed re-run
        let loaded = store::load_record_at(&prefix, &id).unwrap();
        assert_eq!(loaded.status, Status::Completed);
        assert_eq!(loaded.ear_to_ear, Some(14.08));
    }
}
