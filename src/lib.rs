pub mod config;
pub mod scan;
pub mod store;
pub mod worker;

// Re-export vision types for convenience
pub use headscan_vision::{
    Gender, MeasurementSchema, MeasurementSet, Pipeline, PipelineConfig, PipelineError,
    ScanInput, ScanOutcome,
};
