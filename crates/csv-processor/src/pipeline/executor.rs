//! Transform stage execution.
//!
//! Runs the enabled operations of a [`PipelineConfig`] in their fixed order:
//! deduplicate, fill missing, normalize, remove outliers.

use crate::cleaner::{DataCleaner, Normalizer};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::pipeline::outliers::OutlierHandler;
use crate::pipeline::progress::{PipelineStage, ProgressUpdate};
use crate::types::ProcessingSummary;
use polars::prelude::*;
use tracing::info;

/// Executes the transform stages on a DataFrame.
pub struct PipelineExecutor;

impl PipelineExecutor {
    /// Stages enabled by `config`, in execution order.
    pub fn planned_stages(config: &PipelineConfig) -> Vec<PipelineStage> {
        [
            (config.remove_duplicates, PipelineStage::Deduplicating),
            (config.handle_missing, PipelineStage::Imputing),
            (config.normalize, PipelineStage::Normalizing),
            (config.remove_outliers, PipelineStage::RemovingOutliers),
        ]
        .into_iter()
        .filter_map(|(enabled, stage)| enabled.then_some(stage))
        .collect()
    }

    /// Run every enabled stage on `columns`.
    ///
    /// Actions and warnings are appended to `summary`. The first failing
    /// stage aborts the run and its error is returned unchanged.
    pub fn execute(
        &self,
        df: &DataFrame,
        config: &PipelineConfig,
        columns: &[String],
        summary: &mut ProcessingSummary,
        report: &dyn Fn(ProgressUpdate),
    ) -> Result<DataFrame> {
        let stages = Self::planned_stages(config);
        let total = stages.len();
        let mut current = df.clone();

        for (index, stage) in stages.into_iter().enumerate() {
            report(ProgressUpdate::step_started(stage, index, total, stage.display_name()));

            let before = current.height();
            current = match stage {
                PipelineStage::Deduplicating => {
                    DataCleaner::remove_duplicates(&current, columns, &mut summary.actions)?
                }
                PipelineStage::Imputing => StatisticalImputer::fill_missing(
                    &current,
                    columns,
                    config.missing_method,
                    &mut summary.actions,
                )?,
                PipelineStage::Normalizing => Normalizer::min_max_scale(
                    &current,
                    columns,
                    &mut summary.actions,
                    &mut summary.warnings,
                )?,
                PipelineStage::RemovingOutliers => OutlierHandler::remove_outliers(
                    &current,
                    columns,
                    config.outlier_threshold,
                    &mut summary.actions,
                    &mut summary.warnings,
                )?,
                _ => current,
            };

            info!(
                "Step {}: {} done ({} -> {} rows)",
                index + 1,
                stage.display_name(),
                before,
                current.height()
            );
        }

        Ok(current)
    }
}
