//! Imputation module for handling missing values.
//!
//! [`StatisticalImputer`] fills missing cells with the mean, median or mode
//! of a column's non-missing values.

mod statistical;

pub use statistical::StatisticalImputer;
