pub mod calibrate;
pub mod error;
pub mod facemesh;
pub mod gender;
pub mod measure;
pub mod model;
pub mod pipeline;
pub mod reconstruct;
pub mod statics;
pub mod validate;

// Re-export commonly used types
pub use error::PipelineError;
pub use facemesh::{Landmark, LandmarkSet};
pub use gender::Gender;
pub use measure::{MeasurementSchema, MeasurementSet};
pub use pipeline::{Pipeline, PipelineConfig, ScanInput, ScanOutcome};
pub use reconstruct::ReconstructionResult;
