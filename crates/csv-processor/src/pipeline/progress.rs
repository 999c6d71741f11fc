//! Progress reporting for the processing pipeline.
//!
//! The pipeline emits a [`ProgressUpdate`] at the start of each stage it
//! runs and a final `Complete` or `Failed` update.
//!
//! # Example
//!
//! ```rust,ignore
//! use csv_processor::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(&df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the processing pipeline, in execution order.
///
/// Disabled operations are skipped, so a run may jump straight from
/// `Validating` to `ComputingStatistics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Checking the configuration and column selection against the table
    Validating,
    /// Removing duplicate rows
    Deduplicating,
    /// Filling missing values
    Imputing,
    /// Min-max scaling numeric columns
    Normalizing,
    /// Dropping z-score outliers
    RemovingOutliers,
    /// Computing summary statistics over the result
    ComputingStatistics,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Validating => "Validating Input",
            Self::Deduplicating => "Removing Duplicates",
            Self::Imputing => "Filling Missing Values",
            Self::Normalizing => "Normalizing",
            Self::RemovingOutliers => "Removing Outliers",
            Self::ComputingStatistics => "Computing Statistics",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run attributed to this stage (0.0 - 1.0).
    ///
    /// The non-terminal weights sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Validating => 0.05,
            Self::Deduplicating => 0.20,
            Self::Imputing => 0.25,
            Self::Normalizing => 0.15,
            Self::RemovingOutliers => 0.20,
            Self::ComputingStatistics => 0.15,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Validating => 0.0,
            Self::Deduplicating => 0.05,
            Self::Imputing => 0.25,
            Self::Normalizing => 0.50,
            Self::RemovingOutliers => 0.65,
            Self::ComputingStatistics => 0.85,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A single progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: PipelineStage,

    /// Optional detail within the stage (e.g. "Step 2 of 4")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message
    pub message: String,

    /// Items handled so far (enabled operations, for the transform stages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    /// Total items to handle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,
}

impl ProgressUpdate {
    /// Creates an update for a stage without sub-stage info.
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        Self::build(stage, None, stage_progress, message.into(), None)
    }

    /// Creates the update sent when step `index` (zero-based) of `total`
    /// starts.
    ///
    /// Nothing of the stage has run yet, so `stage_progress` is 0. The step
    /// counts go to `items_processed` and `items_total`.
    pub fn step_started(
        stage: PipelineStage,
        index: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::build(
            stage,
            Some(format!("Step {} of {}", index + 1, total)),
            0.0,
            message.into(),
            Some((index, total)),
        )
    }

    /// Creates a completion update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            sub_stage: None,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Creates a failure update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            sub_stage: None,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    fn build(
        stage: PipelineStage,
        sub_stage: Option<String>,
        stage_progress: f32,
        message: String,
        items: Option<(usize, usize)>,
    ) -> Self {
        let stage_progress = stage_progress.clamp(0.0, 1.0);
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress,
            message,
            items_processed: items.map(|(current, _)| current),
            items_total: items.map(|(_, total)| total),
        }
    }
}

/// Receives progress updates while the pipeline runs.
///
/// Implementations must be `Send + Sync` so a pipeline holding one can be
/// moved to a worker thread.
///
/// # Example
///
/// ```rust,ignore
/// use csv_processor::{ProgressReporter, ProgressUpdate};
///
/// struct StderrReporter;
///
/// impl ProgressReporter for StderrReporter {
///     fn report(&self, update: ProgressUpdate) {
///         eprintln!("{}: {}", update.stage.display_name(), update.message);
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called for every progress event. Should return quickly.
    fn report(&self, update: ProgressUpdate);
}

/// Adapts a closure to [`ProgressReporter`].
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
