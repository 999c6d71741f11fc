//! Min-max normalization of numeric columns.

use crate::error::Result;
use crate::types::{ActionType, ProcessingAction};
use crate::utils::{
    ColumnKind, get_series, numeric_values, series_kind, series_min_max, validate_columns,
};
use polars::prelude::*;
use tracing::debug;

/// Rescales numeric columns into `[0, 1]`.
pub struct Normalizer;

impl Normalizer {
    /// Apply `(v - min) / (max - min)` to each numeric column in `columns`.
    ///
    /// Non-numeric columns are left as they are. A constant column (or one
    /// without any value) is also left unchanged, since its range is zero.
    /// Missing cells stay missing.
    pub fn min_max_scale(
        df: &DataFrame,
        columns: &[String],
        actions: &mut Vec<ProcessingAction>,
        warnings: &mut Vec<String>,
    ) -> Result<DataFrame> {
        validate_columns(df, columns)?;
        let mut result = df.clone();

        for col_name in columns {
            let series = get_series(df, col_name)?;
            if series_kind(series) != ColumnKind::Numeric {
                debug!("Skipping normalization of non-numeric column '{}'", col_name);
                continue;
            }

            let Some((min, max)) = series_min_max(series)? else {
                warnings.push(format!(
                    "Normalization skipped for '{}': no values present",
                    col_name
                ));
                continue;
            };

            if min == max {
                warnings.push(format!(
                    "Normalization skipped for '{}': constant column",
                    col_name
                ));
                debug!("Column '{}' is constant ({}), left unchanged", col_name, min);
                continue;
            }

            let range = max - min;
            let scaled: Vec<Option<f64>> = numeric_values(series)?
                .into_iter()
                .map(|v| v.map(|v| (v - min) / range))
                .collect();
            result.replace(col_name, Series::new(col_name.as_str().into(), scaled))?;

            actions.push(
                ProcessingAction::new(
                    ActionType::DataNormalized,
                    col_name,
                    format!("Scaled '{}' to the range [0, 1]", col_name),
                )
                .with_details(format!("min = {:.2}, max = {:.2}", min, max)),
            );
            debug!("Normalized '{}' (min {}, max {})", col_name, min, max);
        }

        Ok(result)
    }
}
