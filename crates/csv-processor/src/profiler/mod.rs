//! Table profiling.
//!
//! This module provides:
//! - Per-column schema information: dtype, kind and null count ([`DataProfiler`])
//! - Descriptive statistics of numeric columns ([`compute_summary`])

mod statistics;

pub use statistics::{ColumnStatistics, FormattedStatistics, SummaryStatistics, compute_summary};

use crate::types::ColumnInfo;
use crate::utils::series_kind;
use polars::prelude::*;

/// Describes the columns of a table.
pub struct DataProfiler;

impl DataProfiler {
    /// One [`ColumnInfo`] per column, in table order.
    pub fn describe_columns(df: &DataFrame) -> Vec<ColumnInfo> {
        df.get_columns()
            .iter()
            .map(|column| {
                let series = column.as_materialized_series();
                ColumnInfo {
                    name: series.name().to_string(),
                    dtype: series.dtype().to_string(),
                    kind: series_kind(series),
                    null_count: series.null_count(),
                }
            })
            .collect()
    }

    /// Total number of missing cells in the table.
    pub fn total_nulls(df: &DataFrame) -> usize {
        df.get_columns().iter().map(|col| col.null_count()).sum()
    }
}
