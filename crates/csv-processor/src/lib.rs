//! CSV Data Processor Library
//!
//! Loads CSV uploads into Polars tables, cleans them and summarizes the
//! result.
//!
//! # Overview
//!
//! - **Loading**: CSV bytes or files into a `DataFrame`, rejecting empty and
//!   malformed input ([`CsvLoader`])
//! - **Cleaning**: duplicate removal on a column subset, missing value
//!   imputation (mean, median, mode), min-max normalization and z-score
//!   outlier removal, always in that order ([`Pipeline`])
//! - **Statistics**: mean, median, standard deviation, min and max of every
//!   numeric column ([`compute_summary`])
//! - **Export**: the processed table back to CSV text ([`CsvExporter`])
//! - **Sessions**: raw and processed tables plus run history for one user
//!   ([`Session`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use csv_processor::{CsvLoader, ImputationMethod, LoadOptions, Pipeline, PipelineConfig};
//!
//! let df = CsvLoader::load_file("data.csv", &LoadOptions::default())?;
//!
//! let config = PipelineConfig::builder()
//!     .selected_columns(["price", "category"])
//!     .remove_duplicates(true)
//!     .handle_missing(true)
//!     .missing_method(ImputationMethod::Median)
//!     .remove_outliers(true)
//!     .outlier_threshold(2.5)
//!     .build()?;
//!
//! let result = Pipeline::builder().config(config).build()?.process(&df)?;
//!
//! println!("{} -> {} rows", result.summary.rows_before, result.summary.rows_after);
//! for row in result.statistics.formatted() {
//!     println!("{}: mean {} std {}", row.column, row.mean, row.std);
//! }
//! ```
//!
//! # Sessions
//!
//! ```rust,ignore
//! use csv_processor::{PipelineConfig, Session};
//!
//! let mut session = Session::new();
//! session.load_csv("upload.csv", &bytes)?;
//! session.process(&PipelineConfig::builder().normalize(true).build()?)?;
//! let csv_text = session.export_csv()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod session;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, Normalizer};
pub use config::{
    ConfigValidationError, ImputationMethod, LoadOptions, PipelineConfig, PipelineConfigBuilder,
};
pub use error::{ErrorKind, ProcessingError, Result as ProcessingResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use io::{CsvExporter, CsvLoader};
pub use pipeline::{
    ClosureProgressReporter, OutlierHandler, Pipeline, PipelineBuilder, PipelineExecutor,
    PipelineStage, ProgressReporter, ProgressUpdate,
};
pub use profiler::{
    ColumnStatistics, DataProfiler, FormattedStatistics, SummaryStatistics, compute_summary,
};
pub use session::{HistoryEntry, LoadedTable, MAX_HISTORY_ENTRIES, Session, TableInfo};
pub use types::{ActionType, ColumnInfo, PipelineResult, ProcessingAction, ProcessingSummary};
pub use utils::ColumnKind;
