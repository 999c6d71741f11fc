//! CSV input and output.
//!
//! - [`CsvLoader`] turns raw uploaded bytes into a table and rejects empty or
//!   malformed input.
//! - [`CsvExporter`] serializes a table back to CSV text for download.

mod reader;
mod writer;

pub use reader::CsvLoader;
pub use writer::CsvExporter;
