//! Per-user session state.
//!
//! A [`Session`] owns the table a user uploaded, the result of the latest
//! processing run and a short history of runs. Sessions are plain values:
//! each user gets their own and nothing is shared between them.
//!
//! ```text
//! ┌─────────────────────────────┬─────────────────────────────┐
//! │ raw: Option<LoadedTable>    │ processed: Option<...>      │
//! │ - df                        │ - df (transformed)          │
//! │ - info (name, shape, cols)  │ - info                      │
//! ├─────────────────────────────┼─────────────────────────────┤
//! │ statistics: Option<...>     │ history: Vec<HistoryEntry>  │
//! │ (of the processed table)    │ newest first, max 10        │
//! └─────────────────────────────┴─────────────────────────────┘
//! ```

use crate::config::{LoadOptions, PipelineConfig};
use crate::error::{ProcessingError, Result};
use crate::io::{CsvExporter, CsvLoader};
use crate::pipeline::Pipeline;
use crate::profiler::{DataProfiler, SummaryStatistics};
use crate::types::{ColumnInfo, ProcessingSummary};
use chrono::Local;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Maximum number of history entries kept per session.
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// Metadata about a table held by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Display name, usually the uploaded file name.
    pub name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    fn describe(name: impl Into<String>, df: &DataFrame) -> Self {
        Self {
            name: name.into(),
            row_count: df.height(),
            column_count: df.width(),
            columns: DataProfiler::describe_columns(df),
        }
    }
}

/// A table together with its cached metadata.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub df: DataFrame,
    pub info: TableInfo,
}

/// One completed processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Identifier unique within the session ("run_1", "run_2", ...).
    pub id: String,
    /// Completion time, RFC 3339.
    pub timestamp: String,
    /// Configuration the run used.
    pub config: PipelineConfig,
    pub summary: ProcessingSummary,
}

/// State of one user session.
#[derive(Debug, Default)]
pub struct Session {
    raw: Option<LoadedTable>,
    processed: Option<LoadedTable>,
    statistics: Option<SummaryStatistics>,
    history: Vec<HistoryEntry>,
    load_options: LoadOptions,
    runs: u64,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session that parses uploads with `options`.
    pub fn with_load_options(options: LoadOptions) -> Self {
        Self {
            load_options: options,
            ..Self::default()
        }
    }

    /// Parse uploaded CSV bytes and make them the session's raw table.
    ///
    /// Any processed result of the previous table is discarded. On error the
    /// session keeps whatever it held before.
    pub fn load_csv(&mut self, name: impl Into<String>, bytes: &[u8]) -> Result<&TableInfo> {
        let name = name.into();
        let df = CsvLoader::load_bytes(bytes, &self.load_options)
            .map_err(|e| e.with_context(format!("Loading '{}'", name)))?;
        Ok(self.replace_raw(name, df))
    }

    /// Read a CSV file from disk and make it the session's raw table.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&TableInfo> {
        let path = path.as_ref();
        let df = CsvLoader::load_file(path, &self.load_options)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.replace_raw(name, df))
    }

    fn replace_raw(&mut self, name: String, df: DataFrame) -> &TableInfo {
        info!(
            "Loaded '{}': {} rows, {} columns",
            name,
            df.height(),
            df.width()
        );
        let info = TableInfo::describe(name, &df);
        self.processed = None;
        self.statistics = None;
        &self.raw.insert(LoadedTable { df, info }).info
    }

    /// Run the pipeline on the raw table and store the result.
    ///
    /// Returns the summary of the run. A failed run leaves the previous
    /// processed table, statistics and history as they were.
    pub fn process(&mut self, config: &PipelineConfig) -> Result<&ProcessingSummary> {
        let raw = self.raw.as_ref().ok_or(ProcessingError::NoDataLoaded)?;

        let result = Pipeline::builder()
            .config(config.clone())
            .build()?
            .process(&raw.df)?;

        let info = TableInfo::describe(raw.info.name.clone(), &result.data);
        self.processed = Some(LoadedTable {
            df: result.data,
            info,
        });
        self.statistics = Some(result.statistics);

        self.runs += 1;
        let entry = HistoryEntry {
            id: format!("run_{}", self.runs),
            timestamp: Local::now().to_rfc3339(),
            config: config.clone(),
            summary: result.summary,
        };
        debug!("Recorded history entry {}", entry.id);

        self.history.insert(0, entry);
        self.history.truncate(MAX_HISTORY_ENTRIES);

        Ok(&self.history[0].summary)
    }

    /// The uploaded table, if any.
    pub fn raw(&self) -> Option<&LoadedTable> {
        self.raw.as_ref()
    }

    /// The latest processed table, if any.
    pub fn processed(&self) -> Option<&LoadedTable> {
        self.processed.as_ref()
    }

    /// Statistics of the latest processed table.
    pub fn statistics(&self) -> Result<&SummaryStatistics> {
        self.statistics.as_ref().ok_or(ProcessingError::NoProcessedData)
    }

    /// Completed runs, newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The processed table as CSV text.
    pub fn export_csv(&self) -> Result<String> {
        let processed = self.processed.as_ref().ok_or(ProcessingError::NoProcessedData)?;
        CsvExporter::to_csv_string(&processed.df)
    }

    /// Suggested download name, e.g. `sales_processed_20240101_120000.csv`.
    pub fn export_file_name(&self) -> Option<String> {
        let raw = self.raw.as_ref()?;
        let stem = Path::new(&raw.info.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data".to_string());
        Some(processed_file_name(&stem))
    }

    /// Drop every table and the history.
    pub fn reset(&mut self) {
        let load_options = std::mem::take(&mut self.load_options);
        *self = Self::with_load_options(load_options);
        debug!("Session reset");
    }
}

/// `{stem}_processed_{local timestamp}.csv`
pub fn processed_file_name(stem: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("{}_processed_{}.csv", stem, timestamp)
}

// Sessions can be moved to the thread serving their user.
static_assertions::assert_impl_all!(Session: Send);

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &[u8] = b"a,b\n1,x\n2,y\n2,y\n,y\n5,z\n";

    fn dedupe_config() -> PipelineConfig {
        PipelineConfig::builder()
            .remove_duplicates(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.raw().is_none());
        assert!(session.processed().is_none());
        assert!(session.history().is_empty());
        assert!(matches!(session.statistics(), Err(ProcessingError::NoProcessedData)));
        assert!(matches!(session.export_csv(), Err(ProcessingError::NoProcessedData)));
    }

    #[test]
    fn test_load_csv_describes_table() {
        let mut session = Session::new();
        let info = session.load_csv("scenario.csv", SCENARIO).unwrap();

        assert_eq!(info.name, "scenario.csv");
        assert_eq!(info.row_count, 5);
        assert_eq!(info.column_count, 2);
        assert_eq!(info.columns[0].null_count, 1);
    }

    #[test]
    fn test_process_without_data() {
        let mut session = Session::new();
        let err = session.process(&dedupe_config()).unwrap_err();
        assert!(matches!(err, ProcessingError::NoDataLoaded));
    }

    #[test]
    fn test_process_stores_result_and_history() {
        let mut session = Session::new();
        session.load_csv("scenario.csv", SCENARIO).unwrap();

        let summary = session.process(&dedupe_config()).unwrap();
        assert_eq!(summary.rows_removed, 1);

        assert_eq!(session.processed().unwrap().info.row_count, 4);
        assert_eq!(session.raw().unwrap().info.row_count, 5);
        assert!(session.statistics().unwrap().get("a").is_some());

        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "run_1");
        assert!(chrono::DateTime::parse_from_rfc3339(&history[0].timestamp).is_ok());

        let csv = session.export_csv().unwrap();
        assert!(csv.starts_with("a,b\n"));
        assert_eq!(csv.lines().count(), 5);
    }

    #[test]
    fn test_failed_process_keeps_previous_result() {
        let mut session = Session::new();
        session.load_csv("scenario.csv", SCENARIO).unwrap();
        session.process(&dedupe_config()).unwrap();

        let bad = PipelineConfig::builder()
            .selected_columns(["missing"])
            .build()
            .unwrap();
        assert!(session.process(&bad).is_err());

        assert_eq!(session.processed().unwrap().info.row_count, 4);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let mut session = Session::new();
        session.load_csv("scenario.csv", SCENARIO).unwrap();
        session.process(&dedupe_config()).unwrap();

        let err = session.load_csv("empty.csv", b"").unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_INPUT");

        assert_eq!(session.raw().unwrap().info.name, "scenario.csv");
        assert!(session.processed().is_some());
    }

    #[test]
    fn test_new_load_clears_processed() {
        let mut session = Session::new();
        session.load_csv("scenario.csv", SCENARIO).unwrap();
        session.process(&dedupe_config()).unwrap();

        session.load_csv("other.csv", b"v\n1\n2\n").unwrap();

        assert!(session.processed().is_none());
        assert!(session.statistics().is_err());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_history_is_bounded_newest_first() {
        let mut session = Session::new();
        session.load_csv("scenario.csv", SCENARIO).unwrap();

        for _ in 0..MAX_HISTORY_ENTRIES + 3 {
            session.process(&PipelineConfig::default()).unwrap();
        }

        let history = session.history();
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history[0].id, "run_13");
        assert_eq!(history[MAX_HISTORY_ENTRIES - 1].id, "run_4");
    }

    #[test]
    fn test_reset() {
        let mut session = Session::new();
        session.load_csv("scenario.csv", SCENARIO).unwrap();
        session.process(&dedupe_config()).unwrap();

        session.reset();

        assert!(session.raw().is_none());
        assert!(session.processed().is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_export_file_name() {
        let mut session = Session::new();
        assert!(session.export_file_name().is_none());

        session.load_csv("sales.csv", SCENARIO).unwrap();
        let name = session.export_file_name().unwrap();
        assert!(name.starts_with("sales_processed_"));
        assert!(name.ends_with(".csv"));
    }
}
