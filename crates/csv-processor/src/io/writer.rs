//! Serializing a DataFrame back to CSV text.

use crate::error::{ProcessingError, Result, ResultExt};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Writes tables as RFC 4180 style CSV: header row, one line per row, no
/// index column.
pub struct CsvExporter;

impl CsvExporter {
    /// Serialize a table to CSV text.
    pub fn to_csv_string(df: &DataFrame) -> Result<String> {
        let mut buffer = Vec::new();
        Self::write(df, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            ProcessingError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Write a table to a CSV file, replacing any existing file.
    pub fn write_file(df: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;
        Self::write(df, &mut file)?;
        info!("Dataset saved: {}", path.display());
        Ok(())
    }

    fn write<W: std::io::Write>(df: &DataFrame, writer: &mut W) -> Result<()> {
        // CsvWriter needs a mutable frame; cloning only bumps column refcounts.
        let mut df = df.clone();
        CsvWriter::new(writer)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)
            .context("Writing CSV output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadOptions;
    use crate::io::CsvLoader;

    #[test]
    fn test_to_csv_string_layout() {
        let df = df![
            "a" => [1i64, 2],
            "b" => ["x", "y"],
        ]
        .unwrap();

        let csv = CsvExporter::to_csv_string(&df).unwrap();
        assert_eq!(csv, "a,b\n1,x\n2,y\n");
    }

    #[test]
    fn test_to_csv_string_nulls_and_quotes() {
        let df = df![
            "v" => [Some(2.5), None],
            "t" => [Some("a,b"), Some("plain")],
        ]
        .unwrap();

        let csv = CsvExporter::to_csv_string(&df).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "v,t");
        assert_eq!(lines[1], "2.5,\"a,b\"");
        assert_eq!(lines[2], ",plain");
    }

    #[test]
    fn test_export_then_load_keeps_shape() {
        let df = df![
            "a" => [Some(1.5), None, Some(3.0)],
            "b" => ["x", "y", "z"],
        ]
        .unwrap();

        let csv = CsvExporter::to_csv_string(&df).unwrap();
        let reloaded = CsvLoader::load_bytes(csv.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(reloaded.shape(), df.shape());
        assert_eq!(reloaded.column("a").unwrap().null_count(), 1);
    }
}
