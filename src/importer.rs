//! Row importer extension point.
//!
//! The processor hands every completed `ROW` element to a [`RowImporter`]
//! together with the [`ImportContext`] (field registry, export metadata and
//! value coercion). Importers that want typed values call
//! [`ImportContext::format_node`] themselves.
//!
//! Shipped importers:
//! - [`LoggingImporter`] - logs each row's `RECORDID` (the default)
//! - [`RecordCollector`] - converts and keeps every record
//! - [`RecordSink`] - converts each record and passes it to a closure

use tracing::info;

use crate::coercion::ValueCoercer;
use crate::config::ImportConfig;
use crate::constants::attributes;
use crate::error::Result;
use crate::header::{ExportHeader, FieldRegistry};
use crate::models::{DatabaseMetadata, ProductInfo, Record};
use crate::tree::ElementNode;

/// Consumer of completed rows
pub trait RowImporter {
    /// Called once per `ROW`, in document order. An error aborts the import.
    fn import_row(&mut self, row: &ElementNode, context: &ImportContext) -> Result<()>;
}

/// Header state and value conversion available to importers
#[derive(Debug, Clone)]
pub struct ImportContext {
    header: ExportHeader,
    coercer: ValueCoercer,
}

impl ImportContext {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            header: ExportHeader::default(),
            coercer: ValueCoercer::new(config),
        }
    }

    pub fn header(&self) -> &ExportHeader {
        &self.header
    }

    pub(crate) fn header_mut(&mut self) -> &mut ExportHeader {
        &mut self.header
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.header.registry
    }

    pub fn database(&self) -> &DatabaseMetadata {
        &self.header.database
    }

    pub fn product(&self) -> &ProductInfo {
        &self.header.product
    }

    pub fn coercer(&self) -> &ValueCoercer {
        &self.coercer
    }

    /// Convert (field name, raw text) pairs into a record
    pub fn format_row<N, V>(&self, row: impl IntoIterator<Item = (N, V)>) -> Result<Record>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        self.coercer.format_row(&self.header.registry, row)
    }

    /// Convert a raw `ROW` node into a record
    pub fn format_node(&self, row: &ElementNode) -> Result<Record> {
        self.coercer.format_node(&self.header.registry, row)
    }
}

/// Default importer: reports each row's identifier and nothing else
#[derive(Debug, Default)]
pub struct LoggingImporter;

impl RowImporter for LoggingImporter {
    fn import_row(&mut self, row: &ElementNode, _context: &ImportContext) -> Result<()> {
        info!(
            "Row {}",
            row.attribute(attributes::RECORD_ID).unwrap_or("<no RECORDID>")
        );
        Ok(())
    }
}

/// Converts every row and keeps the records in memory
#[derive(Debug, Default)]
pub struct RecordCollector {
    pub records: Vec<Record>,
}

impl RecordCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl RowImporter for RecordCollector {
    fn import_row(&mut self, row: &ElementNode, context: &ImportContext) -> Result<()> {
        self.records.push(context.format_node(row)?);
        Ok(())
    }
}

/// Converts every row and passes the record to a callback
pub struct RecordSink<F>
where
    F: FnMut(Record) -> Result<()>,
{
    callback: F,
}

impl<F> RecordSink<F>
where
    F: FnMut(Record) -> Result<()>,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> RowImporter for RecordSink<F>
where
    F: FnMut(Record) -> Result<()>,
{
    fn import_row(&mut self, row: &ElementNode, context: &ImportContext) -> Result<()> {
        let record = context.format_node(row)?;
        (self.callback)(record)
    }
}
