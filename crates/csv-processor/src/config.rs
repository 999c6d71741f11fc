//! Configuration types for the processing pipeline.
//!
//! [`PipelineConfig`] mirrors the options a user picks before pressing
//! "process": which columns to operate on, which of the four operations to
//! enable, the imputation method and the outlier threshold. [`LoadOptions`]
//! controls how raw CSV bytes are turned into a table.

use serde::{Deserialize, Serialize};

/// Default z-score threshold for outlier removal.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 3.0;

/// Strings treated as missing values when reading CSV input.
pub const DEFAULT_NULL_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Method used to fill missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMethod {
    /// Mean of the non-missing values (numeric columns only)
    #[default]
    Mean,
    /// Median of the non-missing values (numeric columns only)
    Median,
    /// Most frequent non-missing value (any column type)
    Mode,
}

impl ImputationMethod {
    /// Lowercase name used in log messages and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
        }
    }
}

/// Configuration for one processing run.
///
/// Use [`PipelineConfig::builder()`] to create a configuration with the
/// fluent API, or deserialize it from JSON.
///
/// # Example
///
/// ```rust
/// use csv_processor::config::{ImputationMethod, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .selected_columns(["age", "income"])
///     .handle_missing(true)
///     .missing_method(ImputationMethod::Median)
///     .remove_outliers(true)
///     .outlier_threshold(2.5)
///     .build()
///     .unwrap();
/// assert!(config.handle_missing);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Columns the operations apply to.
    /// `None` selects every column of the table being processed.
    pub selected_columns: Option<Vec<String>>,

    /// Remove rows duplicated on the selected columns.
    pub remove_duplicates: bool,

    /// Fill missing values in the selected columns.
    pub handle_missing: bool,

    /// Imputation method used when `handle_missing` is set.
    pub missing_method: ImputationMethod,

    /// Min-max scale the selected numeric columns.
    pub normalize: bool,

    /// Drop rows whose z-score on a selected numeric column reaches the threshold.
    pub remove_outliers: bool,

    /// Z-score magnitude at which a value counts as an outlier.
    pub outlier_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            selected_columns: None,
            remove_duplicates: false,
            handle_missing: false,
            missing_method: ImputationMethod::default(),
            normalize: false,
            remove_outliers: false,
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    ///
    /// The threshold is not bounded to any range here; only values that
    /// cannot be compared (NaN) are rejected.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.outlier_threshold.is_nan() {
            return Err(ConfigValidationError::InvalidThreshold(
                self.outlier_threshold,
            ));
        }

        if let Some(columns) = &self.selected_columns {
            let mut seen = std::collections::HashSet::new();
            for column in columns {
                if !seen.insert(column.as_str()) {
                    return Err(ConfigValidationError::DuplicateColumn(column.clone()));
                }
            }
        }

        Ok(())
    }

    /// Whether at least one operation is enabled.
    pub fn has_operations(&self) -> bool {
        self.remove_duplicates || self.handle_missing || self.normalize || self.remove_outliers
    }

    /// Resolve the column selection against the columns of a table.
    pub fn resolve_columns(&self, table_columns: &[String]) -> Vec<String> {
        match &self.selected_columns {
            Some(columns) => columns.clone(),
            None => table_columns.to_vec(),
        }
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid outlier threshold: {0} (must be a number)")]
    InvalidThreshold(f64),

    #[error("Column '{0}' is selected more than once")]
    DuplicateColumn(String),
}

impl From<ConfigValidationError> for crate::error::ProcessingError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ProcessingError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    selected_columns: Option<Vec<String>>,
    remove_duplicates: Option<bool>,
    handle_missing: Option<bool>,
    missing_method: Option<ImputationMethod>,
    normalize: Option<bool>,
    remove_outliers: Option<bool>,
    outlier_threshold: Option<f64>,
}

impl PipelineConfigBuilder {
    /// Restrict the operations to the given columns.
    pub fn selected_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Enable or disable missing value imputation.
    pub fn handle_missing(mut self, handle: bool) -> Self {
        self.handle_missing = Some(handle);
        self
    }

    /// Set the imputation method.
    pub fn missing_method(mut self, method: ImputationMethod) -> Self {
        self.missing_method = Some(method);
        self
    }

    /// Enable or disable min-max normalization.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = Some(normalize);
        self
    }

    /// Enable or disable z-score outlier removal.
    pub fn remove_outliers(mut self, remove: bool) -> Self {
        self.remove_outliers = Some(remove);
        self
    }

    /// Set the z-score threshold for outlier removal.
    pub fn outlier_threshold(mut self, threshold: f64) -> Self {
        self.outlier_threshold = Some(threshold);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            selected_columns: self.selected_columns,
            remove_duplicates: self.remove_duplicates.unwrap_or(false),
            handle_missing: self.handle_missing.unwrap_or(false),
            missing_method: self.missing_method.unwrap_or_default(),
            normalize: self.normalize.unwrap_or(false),
            remove_outliers: self.remove_outliers.unwrap_or(false),
            outlier_threshold: self
                .outlier_threshold
                .unwrap_or(DEFAULT_OUTLIER_THRESHOLD),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Options for reading CSV input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Cell contents that are read as missing values.
    pub null_values: Vec<String>,

    /// Number of rows used to infer column types. `None` scans every row.
    pub infer_schema_length: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
            infer_schema_length: Some(1000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.selected_columns.is_none());
        assert!(!config.remove_duplicates);
        assert!(!config.handle_missing);
        assert!(!config.normalize);
        assert!(!config.remove_outliers);
        assert_eq!(config.missing_method, ImputationMethod::Mean);
        assert_eq!(config.outlier_threshold, 3.0);
        assert!(!config.has_operations());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .selected_columns(["a", "b"])
            .remove_duplicates(true)
            .missing_method(ImputationMethod::Mode)
            .outlier_threshold(1.5)
            .build()
            .unwrap();

        assert_eq!(
            config.selected_columns,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert!(config.remove_duplicates);
        assert_eq!(config.missing_method, ImputationMethod::Mode);
        assert_eq!(config.outlier_threshold, 1.5);
        assert!(config.has_operations());
    }

    #[test]
    fn test_validation_nan_threshold() {
        let result = PipelineConfig::builder().outlier_threshold(f64::NAN).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold(_)
        ));
    }

    #[test]
    fn test_validation_threshold_not_bounded() {
        // Values outside the usual UI range are still accepted
        let config = PipelineConfig::builder()
            .outlier_threshold(12.0)
            .build()
            .unwrap();
        assert_eq!(config.outlier_threshold, 12.0);
    }

    #[test]
    fn test_validation_duplicate_column() {
        let result = PipelineConfig::builder()
            .selected_columns(["a", "a"])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::DuplicateColumn(ref c) if c == "a"
        ));
    }

    #[test]
    fn test_resolve_columns() {
        let table_columns = vec!["x".to_string(), "y".to_string()];
        let all = PipelineConfig::default();
        assert_eq!(all.resolve_columns(&table_columns), table_columns);

        let some = PipelineConfig::builder()
            .selected_columns(["y"])
            .build()
            .unwrap();
        assert_eq!(some.resolve_columns(&table_columns), vec!["y".to_string()]);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "selected_columns": ["price"],
            "handle_missing": true,
            "missing_method": "median",
            "remove_outliers": true,
            "outlier_threshold": 2.0
        }"#;

        let config: PipelineConfig = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(config.selected_columns, Some(vec!["price".to_string()]));
        assert!(config.handle_missing);
        assert_eq!(config.missing_method, ImputationMethod::Median);
        assert!(config.remove_outliers);
        assert!(!config.normalize);
        assert_eq!(config.outlier_threshold, 2.0);
    }

    #[test]
    fn test_load_options_default_null_values() {
        let options = LoadOptions::default();
        assert!(options.null_values.iter().any(|v| v == "NA"));
        assert!(options.null_values.iter().any(|v| v.is_empty()));
    }
}
