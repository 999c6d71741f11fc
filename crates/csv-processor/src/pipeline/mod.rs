//! Pipeline module.
//!
//! This module provides the processing pipeline and related components.

mod builder;
mod executor;
pub mod outliers;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use executor::PipelineExecutor;
pub use outliers::OutlierHandler;
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
