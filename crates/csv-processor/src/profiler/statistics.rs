//! Descriptive statistics over the numeric columns of a table.

use crate::error::Result;
use crate::utils::{ColumnKind, series_kind, series_min_max, series_std};
use polars::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Statistics of one numeric column, over its non-missing values.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); 0.0 for a single value.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStatistics {
    /// Compute statistics over the present values of a numeric Series.
    ///
    /// `None` when every cell is missing.
    pub fn from_series(series: &Series) -> Result<Option<Self>> {
        let Some((min, max)) = series_min_max(series)? else {
            return Ok(None);
        };
        let stats = series
            .mean()
            .zip(series.median())
            .zip(series_std(series))
            .map(|((mean, median), std)| Self {
                mean,
                median,
                std,
                min,
                max,
            });
        Ok(stats)
    }
}

/// Display form of [`ColumnStatistics`], every value rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FormattedStatistics {
    pub column: String,
    pub mean: String,
    pub median: String,
    pub std: String,
    pub min: String,
    pub max: String,
}

/// Per-column statistics in table column order.
///
/// Only numeric columns with at least one value appear. Serializes as a
/// JSON object keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStatistics {
    columns: Vec<(String, ColumnStatistics)>,
}

impl SummaryStatistics {
    /// Statistics for `column`, if it was summarized.
    pub fn get(&self, column: &str) -> Option<&ColumnStatistics> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnStatistics)> {
        self.columns.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Render every value with two decimals, for display.
    pub fn formatted(&self) -> Vec<FormattedStatistics> {
        self.columns
            .iter()
            .map(|(name, stats)| FormattedStatistics {
                column: name.clone(),
                mean: format!("{:.2}", stats.mean),
                median: format!("{:.2}", stats.median),
                std: format!("{:.2}", stats.std),
                min: format!("{:.2}", stats.min),
                max: format!("{:.2}", stats.max),
            })
            .collect()
    }
}

impl Serialize for SummaryStatistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, stats) in &self.columns {
            map.serialize_entry(name, stats)?;
        }
        map.end()
    }
}

/// Summarize every numeric column of `df`.
///
/// Non-numeric columns are skipped, and so are numeric columns in which
/// every cell is missing.
pub fn compute_summary(df: &DataFrame) -> Result<SummaryStatistics> {
    let mut columns = Vec::new();

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        if series_kind(series) != ColumnKind::Numeric {
            continue;
        }
        if let Some(stats) = ColumnStatistics::from_series(series)? {
            columns.push((series.name().to_string(), stats));
        }
    }

    Ok(SummaryStatistics { columns })
}
