//! Row and value cleaning operations.
//!
//! This module provides:
//! - Duplicate row removal compared on a column subset ([`DataCleaner`])
//! - Min-max normalization of numeric columns ([`Normalizer`])
//!
//! Every operation borrows its input and returns a new DataFrame with the
//! same columns in the same order.

mod normalizer;

pub use normalizer::Normalizer;

use crate::error::{Result, ResultExt};
use crate::types::{ActionType, ProcessingAction};
use crate::utils::validate_columns;
use polars::prelude::*;
use tracing::debug;

/// Duplicate row removal.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove rows that repeat an earlier row on `columns`.
    ///
    /// Only the listed columns are compared; the remaining columns are kept
    /// from the first occurrence. Values are compared the way polars groups
    /// them: missing cells equal each other and `0.0` equals `-0.0`.
    ///
    /// With an empty column list no field can tell rows apart, so every row
    /// duplicates the first one and only the first row survives.
    pub fn remove_duplicates(
        df: &DataFrame,
        columns: &[String],
        actions: &mut Vec<ProcessingAction>,
    ) -> Result<DataFrame> {
        validate_columns(df, columns)?;

        let before = df.height();
        let deduplicated = if columns.is_empty() {
            df.head(Some(1))
        } else {
            df.unique_stable(Some(columns), UniqueKeepStrategy::First, None)
                .context("Removing duplicate rows")?
        };
        let removed = before - deduplicated.height();

        if removed > 0 {
            let pct = (removed as f64 / before as f64) * 100.0;
            actions.push(
                ProcessingAction::new(
                    ActionType::DuplicatesRemoved,
                    "dataset",
                    format!("Removed {} duplicate rows ({:.1}%)", removed, pct),
                )
                .with_details(format!("Compared on: {}", columns.join(", "))),
            );
            debug!("Removed {} duplicate rows", removed);
        } else {
            debug!("No duplicate rows found");
        }

        Ok(deduplicated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::column_names;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn scenario_df() -> DataFrame {
        df![
            "a" => [Some(1i64), Some(2), Some(2), None, Some(5)],
            "b" => ["x", "y", "y", "y", "z"],
        ]
        .unwrap()
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let df = scenario_df();
        let mut actions = Vec::new();

        let result = DataCleaner::remove_duplicates(&df, &cols(&["a", "b"]), &mut actions).unwrap();

        assert_eq!(result.height(), 4);
        let a: Vec<Option<i64>> = result.column("a").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(a, vec![Some(1), Some(2), None, Some(5)]);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action_type, ActionType::DuplicatesRemoved);
    }

    #[test]
    fn test_remove_duplicates_subset_ignores_other_columns() {
        let df = scenario_df();
        let mut actions = Vec::new();

        let result = DataCleaner::remove_duplicates(&df, &cols(&["b"]), &mut actions).unwrap();

        // x, y, z survive; the first "y" row keeps a = 2
        assert_eq!(result.height(), 3);
        assert_eq!(column_names(&result), cols(&["a", "b"]));
        assert_eq!(result.column("a").unwrap().i64().unwrap().get(1), Some(2));
    }

    #[test]
    fn test_remove_duplicates_nulls_compare_equal() {
        let df = df![
            "a" => [None, Some(1.0), None],
        ]
        .unwrap();
        let mut actions = Vec::new();

        let result = DataCleaner::remove_duplicates(&df, &cols(&["a"]), &mut actions).unwrap();
        assert_eq!(result.height(), 2);
    }

    #[test]
    fn test_remove_duplicates_signed_zero_is_duplicate() {
        let df = df![
            "v" => [0.0, -0.0, 1.0],
            "id" => [1i64, 2, 3],
        ]
        .unwrap();
        let mut actions = Vec::new();

        let result = DataCleaner::remove_duplicates(&df, &cols(&["v"]), &mut actions).unwrap();

        assert_eq!(result.height(), 2);
        let ids: Vec<Option<i64>> = result.column("id").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_remove_duplicates_empty_selection_keeps_first_row() {
        let df = scenario_df();
        let mut actions = Vec::new();

        let result = DataCleaner::remove_duplicates(&df, &[], &mut actions).unwrap();

        assert_eq!(result.height(), 1);
        assert_eq!(result.column("a").unwrap().i64().unwrap().get(0), Some(1));
    }

    #[test]
    fn test_remove_duplicates_no_duplicates() {
        let df = df!["a" => [1, 2, 3]].unwrap();
        let mut actions = Vec::new();

        let result = DataCleaner::remove_duplicates(&df, &cols(&["a"]), &mut actions).unwrap();

        assert_eq!(result.height(), 3);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_remove_duplicates_unknown_column() {
        let df = scenario_df();
        let mut actions = Vec::new();

        let result = DataCleaner::remove_duplicates(&df, &cols(&["missing"]), &mut actions);
        assert!(matches!(
            result.unwrap_err(),
            crate::error::ProcessingError::ColumnNotFound(_)
        ));
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let df = scenario_df();
        let columns = cols(&["a", "b"]);
        let mut actions = Vec::new();

        let once = DataCleaner::remove_duplicates(&df, &columns, &mut actions).unwrap();
        let twice = DataCleaner::remove_duplicates(&once, &columns, &mut actions).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_remove_duplicates_leaves_input_untouched() {
        let df = scenario_df();
        let mut actions = Vec::new();

        DataCleaner::remove_duplicates(&df, &cols(&["b"]), &mut actions).unwrap();
        assert_eq!(df.height(), 5);
    }
}
