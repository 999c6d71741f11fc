//! Loading CSV input into a DataFrame.

use crate::config::LoadOptions;
use crate::error::{ProcessingError, Result};
use polars::io::csv::read::NullValues;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Loads uploaded CSV data into a table.
pub struct CsvLoader;

impl CsvLoader {
    /// Parse raw CSV bytes.
    ///
    /// The first row is the header. Fails with an input error when the stream
    /// is empty, cannot be parsed, or yields no columns or no data rows.
    pub fn load_bytes(bytes: &[u8], options: &LoadOptions) -> Result<DataFrame> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ProcessingError::EmptyInput);
        }

        debug!("Parsing {} bytes of CSV input", bytes.len());

        let null_values: Vec<PlSmallStr> = options
            .null_values
            .iter()
            .map(|s| PlSmallStr::from(s.as_str()))
            .collect();

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(options.infer_schema_length)
            .map_parse_options(|opts| {
                opts.with_quote_char(Some(b'"'))
                    .with_null_values(Some(NullValues::AllColumns(null_values.clone())))
            })
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
            .map_err(|e| match e {
                PolarsError::NoData(_) => ProcessingError::EmptyInput,
                other => ProcessingError::MalformedCsv(other.to_string()),
            })?;

        if df.width() == 0 {
            return Err(ProcessingError::NoColumns);
        }
        if df.height() == 0 {
            return Err(ProcessingError::EmptyInput);
        }

        info!("Dataset loaded: {} rows x {} columns", df.height(), df.width());
        Ok(df)
    }

    /// Read a CSV file from disk and parse it with [`CsvLoader::load_bytes`].
    pub fn load_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<DataFrame> {
        let path = path.as_ref();
        info!("Loading dataset from: {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::load_bytes(&bytes, options)
    }
}
