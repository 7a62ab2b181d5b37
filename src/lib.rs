//! FileMaker FMPXMLRESULT Importer Library
//!
//! A Rust library for streaming FileMaker Pro XML exports (FMPXMLRESULT
//! grammar) into typed records ready for loading into another data store.
//!
//! This library provides tools for:
//! - Stream-parsing exports of any size with memory bounded by a single row
//! - Recovering field definitions (name, type, repeats, nullability) from the header
//! - Converting cell text into numbers, dates, times and trimmed text
//! - Lenient parsing of hand-entered times ("3.30 pm", "15:30", "24:00")
//! - Plugging in a custom [`RowImporter`] to persist each row
//!
//! ## Usage
//!
//! ```no_run
//! use fmp_importer::{FmpXmlProcessor, ImportConfig, RecordSink};
//!
//! # fn example() -> fmp_importer::Result<()> {
//! let processor = FmpXmlProcessor::new(ImportConfig::default().with_date_format("%m/%d/%Y"))?;
//! let mut sink = RecordSink::new(|record| {
//!     println!("{:?}", record);
//!     Ok(())
//! });
//! let stats = processor.import_file(std::path::Path::new("export.xml"), &mut sink)?;
//! println!("Imported {} rows", stats.rows_imported);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod coercion;
pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod importer;
pub mod models;
pub mod processor;
pub mod time_parser;
pub mod tree;

use std::path::Path;

// Re-export commonly used types
pub use coercion::ValueCoercer;
pub use config::ImportConfig;
pub use error::{FmpError, Result};
pub use header::{ExportHeader, FieldRegistry};
pub use importer::{ImportContext, LoggingImporter, RecordCollector, RecordSink, RowImporter};
pub use models::{
    DatabaseMetadata, FieldDefinition, FieldKind, FieldValue, ImportStats, ProductInfo, Record,
};
pub use processor::FmpXmlProcessor;
pub use time_parser::parse_time;
pub use tree::ElementNode;

/// Import a file with the default configuration.
///
/// Rows go to `importer`, or to [`LoggingImporter`] when none is given.
pub fn import_file(path: &Path, importer: Option<&mut dyn RowImporter>) -> Result<ImportStats> {
    let processor = FmpXmlProcessor::new(ImportConfig::default())?;
    match importer {
        Some(importer) => processor.import_file(path, importer),
        None => processor.import_file(path, &mut LoggingImporter),
    }
}
