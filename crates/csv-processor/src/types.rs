//! Shared types for processing results and column metadata.

use crate::profiler::SummaryStatistics;
use crate::utils::ColumnKind;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Description of a single column of a loaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Polars data type as string ("i64", "f64", "str", ...)
    pub dtype: String,
    pub kind: ColumnKind,
    pub null_count: usize,
}

/// Result of one processing run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The transformed table.
    pub data: DataFrame,
    /// Descriptive statistics of the transformed table.
    pub statistics: SummaryStatistics,
    /// What the run did.
    pub summary: ProcessingSummary,
}

// ============================================================================
// Processing Summary Types
// ============================================================================

/// Human-readable summary of what the pipeline did.
///
/// # Example
///
/// ```rust,ignore
/// let summary = result.summary;
/// println!("Processed {} rows in {}ms", summary.rows_after, summary.duration_ms);
/// for action in &summary.actions {
///     println!("{}: {}", action.action_type.display_name(), action.description);
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows before processing.
    pub rows_before: usize,
    /// Number of rows after processing.
    pub rows_after: usize,
    /// Number of rows removed during processing.
    pub rows_removed: usize,

    /// Number of columns (unchanged by every operation).
    pub columns: usize,

    /// Columns the operations were applied to.
    pub selected_columns: Vec<String>,

    /// List of actions taken during processing.
    pub actions: Vec<ProcessingAction>,

    /// Columns skipped by an operation and similar notes.
    pub warnings: Vec<String>,
}

impl ProcessingSummary {
    /// Create a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate the percentage of rows removed.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed as f32 / self.rows_before as f32) * 100.0
        }
    }
}

/// A single action taken during processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingAction {
    /// Type of action performed.
    pub action_type: ActionType,
    /// Target of the action (column name or "dataset").
    pub target: String,
    /// Human-readable description of the action.
    pub description: String,
    /// Additional details (e.g., fill value used).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ProcessingAction {
    /// Create a new processing action.
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            details: None,
        }
    }

    /// Add details to the action.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Types of actions that can be taken during processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Duplicate rows were removed.
    DuplicatesRemoved,
    /// Missing values were imputed.
    ValueImputed,
    /// Data was min-max normalized.
    DataNormalized,
    /// Rows with outliers were removed.
    OutliersRemoved,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DuplicatesRemoved => "Duplicates Removed",
            Self::ValueImputed => "Value Imputed",
            Self::DataNormalized => "Data Normalized",
            Self::OutliersRemoved => "Outliers Removed",
        }
    }
}
