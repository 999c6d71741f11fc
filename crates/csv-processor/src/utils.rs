//! Shared utilities for the processing pipeline.
//!
//! Column classification, value extraction and the Series helpers (sample
//! standard deviation, range, mode) used by the imputers, the outlier filter
//! and the statistics engine.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Kind of values a column holds, as far as processing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// Boolean values
    Boolean,
    /// String values
    Text,
    /// Anything else (dates, nested types, ...)
    Other,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Other => "other",
        }
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Get the kind of a DataType.
pub fn get_column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else if matches!(dtype, DataType::String) {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

/// Get the kind of a Series.
pub fn series_kind(series: &Series) -> ColumnKind {
    get_column_kind(series.dtype())
}

/// Column names of a DataFrame as owned strings, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Check that every selected column exists in the DataFrame.
pub fn validate_columns(df: &DataFrame, columns: &[String]) -> Result<()> {
    let available = column_names(df);
    match columns.iter().find(|c| !available.contains(c)) {
        Some(missing) => Err(ProcessingError::ColumnNotFound(missing.clone())),
        None => Ok(()),
    }
}

/// Borrow a column of the DataFrame as a Series.
pub fn get_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| ProcessingError::ColumnNotFound(name.to_string()))
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Extract a numeric Series as `f64` values, keeping missing cells as `None`.
pub fn numeric_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().collect())
}

/// Extract the non-missing values of a numeric Series.
pub fn present_values(series: &Series) -> Result<Vec<f64>> {
    Ok(numeric_values(series)?.into_iter().flatten().collect())
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Number of non-missing cells in a Series.
#[inline]
pub fn present_count(series: &Series) -> usize {
    series.len() - series.null_count()
}

/// Sample standard deviation (n - 1 denominator) of the present values.
///
/// Returns `None` when no value is present and `0.0` for a single value.
pub fn series_std(series: &Series) -> Option<f64> {
    match present_count(series) {
        0 => None,
        1 => Some(0.0),
        _ => series.std(1),
    }
}

/// Minimum and maximum of the present values of a numeric Series.
pub fn series_min_max(series: &Series) -> Result<Option<(f64, f64)>> {
    Ok(series.min::<f64>()?.zip(series.max::<f64>()?))
}

/// Most frequent value; ties go to the value seen first.
pub fn mode_by_key<T, K, F>(values: &[T], key: F) -> Option<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    // key -> (count, index of first occurrence)
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();
    for (idx, value) in values.iter().enumerate() {
        counts.entry(key(value)).or_insert((0, idx)).0 += 1;
    }

    counts
        .into_values()
        .max_by(|(count_a, first_a), (count_b, first_b)| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(_, first)| values[first].clone())
}

/// Mode of the non-missing values of a Series, as a single-row Series of the
/// same dtype.
///
/// Numbers are compared by value (so `0.0` and `-0.0` count together),
/// booleans directly and everything else by its string form.
pub fn series_mode(series: &Series) -> Result<Option<Series>> {
    let name = series.name().clone();
    let mode = match series_kind(series) {
        ColumnKind::Numeric => {
            let values = present_values(series)?;
            mode_by_key(&values, |v| numeric_key(*v))
                .map(|v| Series::new(name, [v]).cast(series.dtype()))
                .transpose()?
        }
        ColumnKind::Boolean => {
            let values: Vec<bool> = series.bool()?.into_iter().flatten().collect();
            mode_by_key(&values, |v| *v).map(|v| Series::new(name, [v]))
        }
        ColumnKind::Text => {
            let values: Vec<&str> = series.str()?.into_iter().flatten().collect();
            mode_by_key(&values, |v| *v).map(|v| Series::new(name, [v]))
        }
        ColumnKind::Other => {
            let as_text = series.cast(&DataType::String)?;
            let values: Vec<&str> = as_text.str()?.into_iter().flatten().collect();
            mode_by_key(&values, |v| *v)
                .map(|v| Series::new(name, [v]).cast(series.dtype()))
                .transpose()?
        }
    };
    Ok(mode)
}

/// Hash key of a float that equals for equal values.
fn numeric_key(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> Result<Series> {
    let filled: Vec<f64> = numeric_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a Series with the single value held by `fill`.
///
/// `fill` must be a one-row Series of the same dtype as `series`; the result
/// keeps that dtype.
pub fn fill_nulls_with(series: &Series, fill: &Series) -> Result<Series> {
    // The fill value sits one past the last original row.
    let fill_idx = series.len() as IdxSize;
    let mut combined = series.clone();
    combined.append(&fill.slice(0, 1))?;

    let indices: Vec<IdxSize> = series
        .is_null()
        .into_iter()
        .enumerate()
        .map(|(idx, is_null)| {
            if is_null.unwrap_or(false) {
                fill_idx
            } else {
                idx as IdxSize
            }
        })
        .collect();

    Ok(combined.take(&IdxCa::from_vec("idx".into(), indices))?)
}

/// Boolean mask of rows to keep, as a polars mask.
pub fn keep_mask(keep: &[bool]) -> BooleanChunked {
    BooleanChunked::from_slice("keep".into(), keep)
}

// =============================================================================
// Tests
// =============================================================================
