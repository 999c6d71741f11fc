//! Outlier handling module.
//!
//! Removes rows whose z-score on any selected numeric column reaches a
//! threshold.

use crate::error::{Result, ResultExt};
use crate::types::{ActionType, ProcessingAction};
use crate::utils::{
    ColumnKind, get_series, keep_mask, numeric_values, present_count, series_kind, series_std,
    validate_columns,
};
use polars::prelude::*;
use tracing::debug;

/// Handles outlier detection and removal.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Drop every row with `|z| >= threshold` on at least one selected
    /// numeric column.
    ///
    /// Means and standard deviations come from the input table, so filtering
    /// on one column does not shift the statistics used for the next; the
    /// removed rows accumulate across columns. Columns with zero spread (or
    /// fewer than two values) cannot produce a z-score and filter nothing.
    /// Missing cells never mark a row as an outlier.
    pub fn remove_outliers(
        df: &DataFrame,
        columns: &[String],
        threshold: f64,
        actions: &mut Vec<ProcessingAction>,
        warnings: &mut Vec<String>,
    ) -> Result<DataFrame> {
        validate_columns(df, columns)?;

        let mut keep = vec![true; df.height()];

        for col_name in columns {
            let series = get_series(df, col_name)?;
            if series_kind(series) != ColumnKind::Numeric {
                debug!("Skipping outlier check on non-numeric column '{}'", col_name);
                continue;
            }

            let (Some(col_mean), Some(col_std)) = (series.mean(), series_std(series)) else {
                continue;
            };

            if present_count(series) < 2 || col_std == 0.0 {
                warnings.push(format!(
                    "Outlier check skipped for '{}': zero standard deviation",
                    col_name
                ));
                continue;
            }

            let mut flagged = 0;
            for (row, value) in numeric_values(series)?.into_iter().enumerate() {
                let Some(value) = value else { continue };
                let z = ((value - col_mean) / col_std).abs();
                if z >= threshold && keep[row] {
                    keep[row] = false;
                    flagged += 1;
                }
            }

            if flagged > 0 {
                actions.push(
                    ProcessingAction::new(
                        ActionType::OutliersRemoved,
                        col_name,
                        format!("Removed {} rows with outliers in '{}'", flagged, col_name),
                    )
                    .with_details(format!(
                        "|z| >= {:.2} (mean = {:.2}, std = {:.2})",
                        threshold, col_mean, col_std
                    )),
                );
            }
            debug!(
                "Column '{}': {} rows flagged as outliers (mean {:.4}, std {:.4})",
                col_name, flagged, col_mean, col_std
            );
        }

        df.filter(&keep_mask(&keep))
            .context("Filtering outlier rows")
    }
}
