pub mod config;
pub mod dxf;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod pipeline;
pub mod report;
pub mod topology;

pub use config::{NestedRingPolicy, PipelineConfig};
pub use error::{EstiError, Result};
pub use pipeline::Pipeline;
pub use report::{Condition, MeasurementResult, Report, Totals};
