//! Statistical imputation methods.
//!
//! Provides mean, median and mode imputation.

use crate::config::ImputationMethod;
use crate::error::{ProcessingError, Result};
use crate::types::{ActionType, ProcessingAction};
use crate::utils::{
    ColumnKind, fill_nulls_with, fill_numeric_nulls, get_series, series_kind, series_mode,
    validate_columns,
};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

/// A filled column plus the value and method that produced it.
struct Fill {
    series: Series,
    value: String,
    method: ImputationMethod,
}

impl StatisticalImputer {
    /// Fill missing cells in each of `columns`.
    ///
    /// Numeric columns use the requested method. Every other case (mode, or a
    /// non-numeric column whatever the method) fills with the most frequent
    /// value, ties going to the value that appears first.
    ///
    /// Fill values are computed before any replacement. A column that has
    /// missing cells but no value at all is an error.
    pub fn fill_missing(
        df: &DataFrame,
        columns: &[String],
        method: ImputationMethod,
        actions: &mut Vec<ProcessingAction>,
    ) -> Result<DataFrame> {
        validate_columns(df, columns)?;
        let mut result = df.clone();

        for col_name in columns {
            let series = get_series(df, col_name)?;
            let missing = series.null_count();
            if missing == 0 {
                continue;
            }

            let numeric = series_kind(series) == ColumnKind::Numeric;
            let fill = match method {
                ImputationMethod::Mean if numeric => {
                    Self::fill_numeric(series, ImputationMethod::Mean, series.mean())?
                }
                ImputationMethod::Median if numeric => {
                    Self::fill_numeric(series, ImputationMethod::Median, series.median())?
                }
                _ => Self::fill_mode(series)?,
            };

            debug!(
                "Filled '{}' with {}: {} ({} cells)",
                col_name,
                fill.method.as_str(),
                fill.value,
                missing
            );
            actions.push(
                ProcessingAction::new(
                    ActionType::ValueImputed,
                    col_name,
                    format!("Filled {} missing values in '{}'", missing, col_name),
                )
                .with_details(format!("{} = {}", fill.method.as_str(), fill.value)),
            );
            result.replace(col_name, fill.series)?;
        }

        Ok(result)
    }

    /// Fill a numeric column with a statistic of its present values.
    ///
    /// `statistic` is `None` when the column has no value at all.
    fn fill_numeric(
        series: &Series,
        method: ImputationMethod,
        statistic: Option<f64>,
    ) -> Result<Fill> {
        let fill_value = statistic.ok_or_else(|| {
            ProcessingError::no_valid_values(series.name().as_str(), method.as_str())
        })?;

        Ok(Fill {
            series: fill_numeric_nulls(series, fill_value)?,
            value: format!("{:.2}", fill_value),
            method,
        })
    }

    /// Fill any column with its mode, keeping the column's dtype.
    fn fill_mode(series: &Series) -> Result<Fill> {
        let mode = series_mode(series)?.ok_or_else(|| {
            ProcessingError::no_valid_values(series.name().as_str(), ImputationMethod::Mode.as_str())
        })?;

        let value = match mode.get(0)? {
            AnyValue::String(s) => s.to_string(),
            other => other.to_string(),
        };
        Ok(Fill {
            series: fill_nulls_with(series, &mode)?,
            value,
            method: ImputationMethod::Mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn impute(df: &DataFrame, columns: &[&str], method: ImputationMethod) -> Result<DataFrame> {
        let mut actions = Vec::new();
        StatisticalImputer::fill_missing(df, &cols(columns), method, &mut actions)
    }

    // ========================================================================
    // mean / median
    // ========================================================================

    #[test]
    fn test_fill_mean_basic() {
        let df = df!["a" => [Some(1i64), Some(2), Some(2), None, Some(5)]].unwrap();
        let result = impute(&df, &["a"], ImputationMethod::Mean).unwrap();

        let a = result.column("a").unwrap();
        assert_eq!(a.null_count(), 0);
        // Mean of [1, 2, 2, 5] = 2.5
        assert_eq!(a.f64().unwrap().get(3), Some(2.5));
        assert_eq!(a.f64().unwrap().get(0), Some(1.0));
    }

    #[test]
    fn test_fill_median_basic() {
        let df = df!["values" => [Some(1.0), None, Some(3.0), None, Some(5.0)]].unwrap();
        let result = impute(&df, &["values"], ImputationMethod::Median).unwrap();

        let values = result.column("values").unwrap();
        assert_eq!(values.null_count(), 0);
        // Median of [1, 3, 5] = 3
        assert_eq!(values.f64().unwrap().get(1), Some(3.0));
        assert_eq!(values.f64().unwrap().get(3), Some(3.0));
    }

    #[test]
    fn test_fill_median_even_count() {
        let df = df!["values" => [Some(1.0), None, Some(3.0)]].unwrap();
        let result = impute(&df, &["values"], ImputationMethod::Median).unwrap();
        assert_eq!(result.column("values").unwrap().f64().unwrap().get(1), Some(2.0));
    }

    #[test]
    fn test_fill_records_action() {
        let df = df!["values" => [Some(1.0), None, Some(3.0)]].unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::fill_missing(&df, &cols(&["values"]), ImputationMethod::Median, &mut actions)
            .unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action_type, ActionType::ValueImputed);
        assert_eq!(actions[0].details.as_deref(), Some("median = 2.00"));
    }

    #[test]
    fn test_fill_no_nulls_keeps_column() {
        let df = df!["values" => [1i64, 2, 3]].unwrap();
        let mut actions = Vec::new();

        let result =
            StatisticalImputer::fill_missing(&df, &cols(&["values"]), ImputationMethod::Mean, &mut actions)
                .unwrap();

        assert!(result.equals_missing(&df));
        assert_eq!(result.column("values").unwrap().dtype(), &DataType::Int64);
        assert!(actions.is_empty());
    }

    // ========================================================================
    // mode
    // ========================================================================

    #[test]
    fn test_fill_mode_text() {
        let df = df!["category" => [Some("A"), Some("B"), Some("A"), None, Some("A")]].unwrap();
        let result = impute(&df, &["category"], ImputationMethod::Mode).unwrap();

        let category = result.column("category").unwrap();
        assert_eq!(category.null_count(), 0);
        assert_eq!(category.str().unwrap().get(3), Some("A"));
    }

    #[test]
    fn test_fill_mode_tie_goes_to_first_seen() {
        let df = df!["category" => [Some("B"), Some("A"), None, Some("A"), Some("B")]].unwrap();
        let result = impute(&df, &["category"], ImputationMethod::Mode).unwrap();
        assert_eq!(result.column("category").unwrap().str().unwrap().get(2), Some("B"));
    }

    #[test]
    fn test_fill_mode_numeric_keeps_integer_dtype() {
        let df = df!["n" => [Some(4i64), Some(9), Some(9), None]].unwrap();
        let result = impute(&df, &["n"], ImputationMethod::Mode).unwrap();

        let n = result.column("n").unwrap();
        assert_eq!(n.dtype(), &DataType::Int64);
        assert_eq!(n.i64().unwrap().get(3), Some(9));
    }

    #[test]
    fn test_fill_mode_signed_zero_counts_together() {
        let df = df!["v" => [Some(1.0), Some(0.0), Some(-0.0), None]].unwrap();
        let result = impute(&df, &["v"], ImputationMethod::Mode).unwrap();

        let v = result.column("v").unwrap().f64().unwrap();
        assert_eq!(v.get(3), Some(0.0));
    }

    #[test]
    fn test_mean_on_text_falls_back_to_mode() {
        let df = df!["t" => [Some("x"), None, Some("x"), Some("y")]].unwrap();
        let mut actions = Vec::new();

        let result =
            StatisticalImputer::fill_missing(&df, &cols(&["t"]), ImputationMethod::Mean, &mut actions)
                .unwrap();

        assert_eq!(result.column("t").unwrap().str().unwrap().get(1), Some("x"));
        assert_eq!(actions[0].details.as_deref(), Some("mode = x"));
    }

    #[test]
    fn test_fill_mode_boolean() {
        let df = df!["flag" => [Some(true), None, Some(false), Some(false)]].unwrap();
        let result = impute(&df, &["flag"], ImputationMethod::Median).unwrap();

        let flag = result.column("flag").unwrap();
        assert_eq!(flag.dtype(), &DataType::Boolean);
        assert_eq!(flag.bool().unwrap().get(1), Some(false));
    }

    // ========================================================================
    // errors
    // ========================================================================

    #[test]
    fn test_fill_all_missing_is_error() {
        let df = df!["values" => [Option::<f64>::None, None, None]].unwrap();

        for method in [ImputationMethod::Mean, ImputationMethod::Median, ImputationMethod::Mode] {
            let err = impute(&df, &["values"], method).unwrap_err();
            assert!(matches!(err, ProcessingError::NoValidValues { ref column, .. } if column == "values"));
        }
    }

    #[test]
    fn test_fill_unknown_column() {
        let df = df!["other" => [1.0, 2.0]].unwrap();
        let err = impute(&df, &["values"], ImputationMethod::Mean).unwrap_err();
        assert!(matches!(err, ProcessingError::ColumnNotFound(_)));
    }

    #[test]
    fn test_fill_leaves_unselected_columns() {
        let df = df![
            "a" => [Some(1.0), None],
            "b" => [Some(2.0), None],
        ]
        .unwrap();
        let result = impute(&df, &["a"], ImputationMethod::Mean).unwrap();

        assert_eq!(result.column("a").unwrap().null_count(), 0);
        assert_eq!(result.column("b").unwrap().null_count(), 1);
        assert_eq!(df.column("a").unwrap().null_count(), 1);
    }
}
