//! Main processing pipeline module.
//!
//! This module provides the `Pipeline` struct and its builder, which
//! validate a request, run the transform stages and summarize the result.

use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::pipeline::PipelineExecutor;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::compute_summary;
use crate::types::{PipelineResult, ProcessingSummary};
use crate::utils::{column_names, validate_columns};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The processing pipeline.
///
/// Use [`Pipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use csv_processor::{ImputationMethod, Pipeline, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .remove_duplicates(true)
///     .handle_missing(true)
///     .missing_method(ImputationMethod::Median)
///     .build()?;
///
/// let result = Pipeline::builder()
///     .config(config)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(&df)?;
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    executor: PipelineExecutor,
}

// The pipeline can be handed to a worker thread.
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process a table through the enabled operations.
    ///
    /// The input is left untouched. On success the result holds the new
    /// table, its statistics and a summary of the actions taken.
    ///
    /// # Errors
    ///
    /// Fails with [`ProcessingError::ColumnNotFound`] if a selected column is
    /// not in `df`, and with [`ProcessingError::NoValidValues`] if missing
    /// values cannot be filled. No partial result is returned.
    pub fn process(&self, df: &DataFrame) -> Result<PipelineResult> {
        match self.process_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Processed {} rows into {}",
                    result.summary.rows_before, result.summary.rows_after
                )));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(&self, df: &DataFrame) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let mut summary = ProcessingSummary::new();
        summary.rows_before = df.height();
        summary.columns = df.width();

        // Step 1: Validate the selection against this table's schema
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Validating,
            0.0,
            "Validating column selection",
        ));
        info!(
            "Step 1: Validating input ({} rows, {} columns)",
            df.height(),
            df.width()
        );
        let columns = self.config.resolve_columns(&column_names(df));
        validate_columns(df, &columns)?;
        debug!("Selected columns: {:?}", columns);
        summary.selected_columns = columns.clone();

        // Step 2: Transform stages
        info!("Step 2: Running transform stages");
        let report = |update: ProgressUpdate| self.report_progress(update);
        let data = self
            .executor
            .execute(df, &self.config, &columns, &mut summary, &report)?;

        // Step 3: Statistics of the result
        self.report_progress(ProgressUpdate::new(
            PipelineStage::ComputingStatistics,
            0.0,
            "Computing summary statistics",
        ));
        info!("Step 3: Computing summary statistics");
        let statistics = compute_summary(&data)?;

        summary.rows_after = data.height();
        summary.rows_removed = summary.rows_before - summary.rows_after;
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Pipeline completed in {}ms: {} -> {} rows, {} actions",
            summary.duration_ms,
            summary.rows_before,
            summary.rows_after,
            summary.actions.len()
        );

        Ok(PipelineResult {
            data,
            statistics,
            summary,
        })
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// Convenience over [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ProcessingError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            executor: PipelineExecutor,
        })
    }
}
