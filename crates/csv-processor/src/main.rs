//! CLI entry point for the CSV data processor.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use csv_processor::session::processed_file_name;
use csv_processor::{
    CsvExporter, ImputationMethod, PipelineConfig, PipelineExecutor, ProcessingSummary, Session,
    SummaryStatistics, TableInfo,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible imputation method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliImputationMethod {
    /// Mean of the non-missing values (numeric columns)
    Mean,
    /// Median of the non-missing values (numeric columns)
    Median,
    /// Most frequent value
    Mode,
}

impl From<CliImputationMethod> for ImputationMethod {
    fn from(cli: CliImputationMethod) -> Self {
        match cli {
            CliImputationMethod::Mean => ImputationMethod::Mean,
            CliImputationMethod::Median => ImputationMethod::Median,
            CliImputationMethod::Mode => ImputationMethod::Mode,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean a CSV file and summarize its numeric columns",
    long_about = "Loads a CSV file, applies the selected cleaning operations in a fixed order \
                  (remove duplicates, fill missing values, normalize, remove outliers), prints \
                  summary statistics and writes the processed table.\n\n\
                  EXAMPLES:\n  \
                  # Drop duplicates and fill gaps with the median\n  \
                  csv-processor -i data.csv --remove-duplicates --handle-missing --missing-method median\n\n  \
                  # Only look at two columns, drop rows with |z| >= 2.5\n  \
                  csv-processor -i data.csv --columns price,qty --remove-outliers --outlier-threshold 2.5\n\n  \
                  # Options from a JSON file, machine-readable output\n  \
                  csv-processor -i data.csv --config options.json --json"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the processed CSV
    ///
    /// Defaults to "<input stem>_processed_<timestamp>.csv" next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Columns the operations apply to (comma separated, default: all)
    #[arg(short, long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Remove rows duplicated on the selected columns
    #[arg(long)]
    remove_duplicates: bool,

    /// Fill missing values in the selected columns
    #[arg(long)]
    handle_missing: bool,

    /// How missing values are filled
    #[arg(long, value_enum, default_value = "mean")]
    missing_method: CliImputationMethod,

    /// Min-max scale the selected numeric columns into [0, 1]
    #[arg(long)]
    normalize: bool,

    /// Remove rows with a z-score outlier in a selected numeric column
    #[arg(long)]
    remove_outliers: bool,

    /// Z-score magnitude at which a value is an outlier
    #[arg(long, default_value = "3.0")]
    outlier_threshold: f64,

    /// Read the pipeline options from a JSON file instead of the flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of processed rows to print
    #[arg(long, default_value = "5")]
    preview: usize,

    /// Show the columns and the planned steps without processing
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output a JSON report to stdout instead of the human-readable summary
    ///
    /// Disables all logging so stdout only carries the report.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Build the pipeline configuration from `--config` or the individual flags.
fn build_config(args: &Args) -> Result<PipelineConfig> {
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let mut builder = PipelineConfig::builder()
        .remove_duplicates(args.remove_duplicates)
        .handle_missing(args.handle_missing)
        .missing_method(args.missing_method.into())
        .normalize(args.normalize)
        .remove_outliers(args.remove_outliers)
        .outlier_threshold(args.outlier_threshold);
    if !args.columns.is_empty() {
        builder = builder.selected_columns(args.columns.iter().map(|c| c.trim().to_string()));
    }
    Ok(builder.build()?)
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());
    input.with_file_name(processed_file_name(&stem))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let config = build_config(&args)?;

    let mut session = Session::new();
    info!("Loading dataset from: {}", args.input.display());
    let raw_info = session.load_file(&args.input)?.clone();

    if args.dry_run {
        print_dry_run(&raw_info, &config);
        return Ok(());
    }

    if !config.has_operations() {
        info!("No operations enabled; the output will only differ in formatting");
    }

    let summary = session.process(&config)?.clone();
    let statistics = session.statistics()?.clone();
    let processed = session
        .processed()
        .ok_or_else(|| anyhow!("Processing produced no table"))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    CsvExporter::write_file(&processed.df, &output)?;

    if args.json {
        let report = serde_json::json!({
            "input": args.input.display().to_string(),
            "output": output.display().to_string(),
            "config": config,
            "columns": processed.info.columns,
            "summary": summary,
            "statistics": statistics,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", processed.df.head(Some(args.preview)));
        print_human_readable_summary(&summary, &statistics, &output);
    }

    Ok(())
}

/// Print the planned run without executing it.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_dry_run(info: &TableInfo, config: &PipelineConfig) {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of processing steps");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", info.name);
    println!("  Rows: {}", info.row_count);
    println!("  Columns: {}", info.column_count);
    println!();

    println!("COLUMNS");
    println!("{}", "-".repeat(40));
    println!("  {:<30} {:<10} {:<10} {:>8}", "Name", "Type", "Kind", "Missing");
    println!("  {}", "-".repeat(61));
    for column in &info.columns {
        println!(
            "  {:<30} {:<10} {:<10} {:>8}",
            column.name,
            column.dtype,
            column.kind.as_str(),
            column.null_count
        );
    }
    println!();

    println!("PLANNED STEPS");
    println!("{}", "-".repeat(40));
    let stages = PipelineExecutor::planned_stages(config);
    if stages.is_empty() {
        println!("  No operations enabled");
    }
    for (i, stage) in stages.iter().enumerate() {
        println!("  {}. {}", i + 1, stage.display_name());
    }
    match &config.selected_columns {
        Some(columns) => println!("  Columns: {}", columns.join(", ")),
        None => println!("  Columns: all"),
    }
    if config.handle_missing {
        println!("  Imputation method: {}", config.missing_method.as_str());
    }
    if config.remove_outliers {
        println!("  Outlier threshold: |z| >= {}", config.outlier_threshold);
    }
    println!();
    println!("{}", "=".repeat(80));
    println!("To execute this processing, run without --dry-run");
}

/// Print a human-readable summary of the run.
fn print_human_readable_summary(
    summary: &ProcessingSummary,
    statistics: &SummaryStatistics,
    output: &Path,
) {
    println!("\n{}", "=".repeat(80));
    println!("PROCESSING COMPLETE");
    println!("{}", "=".repeat(80));
    println!(
        "  Rows: {} -> {} ({} removed, {:.1}%)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_removed,
        summary.rows_removed_percentage()
    );
    println!("  Duration: {}ms", summary.duration_ms);
    println!();

    if !summary.actions.is_empty() {
        println!("ACTIONS");
        println!("{}", "-".repeat(40));
        for action in &summary.actions {
            match &action.details {
                Some(details) => println!(
                    "  - [{}] {} ({})",
                    action.action_type.display_name(),
                    action.description,
                    details
                ),
                None => println!(
                    "  - [{}] {}",
                    action.action_type.display_name(),
                    action.description
                ),
            }
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("WARNINGS");
        println!("{}", "-".repeat(40));
        for warning in &summary.warnings {
            println!("  - {}", warning);
        }
        println!();
    }

    println!("SUMMARY STATISTICS");
    println!("{}", "-".repeat(40));
    if statistics.is_empty() {
        println!("  No numeric columns");
    } else {
        println!(
            "  {:<24} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "Column", "Mean", "Median", "Std", "Min", "Max"
        );
        for row in statistics.formatted() {
            println!(
                "  {:<24} {:>12} {:>12} {:>12} {:>12} {:>12}",
                row.column, row.mean, row.median, row.std, row.min, row.max
            );
        }
    }
    println!();
    println!("Output saved to: {}", output.display());
    println!("{}", "=".repeat(80));
}
