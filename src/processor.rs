//! Streaming import driver.
//!
//! Pulls events from `quick-xml` one at a time (reusing a single buffer) and
//! feeds them to the [`TreeBuilder`] in document order. The first fatal error
//! stops the import; no further rows are delivered to the importer.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ImportConfig;
use crate::constants::EVENT_BUFFER_CAPACITY;
use crate::error::{FmpError, Result};
use crate::importer::{ImportContext, RowImporter};
use crate::models::ImportStats;
use crate::tree::TreeBuilder;

/// Imports FMPXMLRESULT documents, handing each row to a [`RowImporter`]
#[derive(Debug, Clone)]
pub struct FmpXmlProcessor {
    config: ImportConfig,
}

impl FmpXmlProcessor {
    /// Create a processor; fails if the configuration is invalid
    pub fn new(config: ImportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import an export file from disk
    pub fn import_file<I>(&self, path: &Path, importer: &mut I) -> Result<ImportStats>
    where
        I: RowImporter + ?Sized,
    {
        info!("Importing FileMaker export: {}", path.display());

        let file = File::open(path).map_err(|e| FmpError::io(path, e))?;
        self.run(BufReader::new(file), importer, Some(path))
    }

    /// Import from any buffered byte source
    pub fn import_reader<R, I>(&self, source: R, importer: &mut I) -> Result<ImportStats>
    where
        R: BufRead,
        I: RowImporter + ?Sized,
    {
        self.run(source, importer, None)
    }

    /// Import an in-memory document
    pub fn import_str<I>(&self, xml: &str, importer: &mut I) -> Result<ImportStats>
    where
        I: RowImporter + ?Sized,
    {
        self.run(xml.as_bytes(), importer, None)
    }

    fn run<R, I>(&self, source: R, importer: &mut I, path: Option<&Path>) -> Result<ImportStats>
    where
        R: BufRead,
        I: RowImporter + ?Sized,
    {
        let start_time = Instant::now();

        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(false);

        let mut builder = TreeBuilder::new(ImportContext::new(&self.config), importer);
        let mut buf = Vec::with_capacity(EVENT_BUFFER_CAPACITY);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let (tag, attributes) = element_parts(e, position(&reader))?;
                    builder.start_element(&tag, attributes);
                }
                Ok(Event::Empty(ref e)) => {
                    let (tag, attributes) = element_parts(e, position(&reader))?;
                    builder.start_element(&tag, attributes);
                    builder.end_element(&tag, position(&reader))?;
                }
                Ok(Event::End(ref e)) => {
                    let tag = decode_name(e.local_name().as_ref(), position(&reader))?;
                    builder.end_element(&tag, position(&reader))?;
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| FmpError::malformed_xml(position(&reader), err.to_string()))?;
                    builder.characters(&text);
                }
                Ok(Event::CData(ref e)) => {
                    let text = str::from_utf8(e)
                        .map_err(|err| FmpError::malformed_xml(position(&reader), err.to_string()))?;
                    builder.characters(text);
                }
                Ok(Event::Eof) => break,
                // Declarations, comments, processing instructions, DOCTYPE
                Ok(_) => {}
                Err(err) => {
                    return Err(reader_error(err, error_position(&reader), path));
                }
            }
            buf.clear();
        }

        let (context, mut stats) = builder.finish(position(&reader))?;
        stats.processing_time_ms = start_time.elapsed().as_millis();

        if let Some(name) = &context.database().name {
            debug!("Source database: {}", name);
        }
        info!(
            "Imported {} rows ({} fields) in {}ms",
            stats.rows_imported, stats.fields_registered, stats.processing_time_ms
        );
        debug!("Peak live element nodes: {}", stats.peak_live_nodes);

        Ok(stats)
    }
}

fn position<R>(reader: &Reader<R>) -> u64 {
    reader.buffer_position() as u64
}

fn error_position<R>(reader: &Reader<R>) -> u64 {
    reader.error_position() as u64
}

fn decode_name(name: &[u8], position: u64) -> Result<String> {
    str::from_utf8(name)
        .map(str::to_string)
        .map_err(|e| FmpError::malformed_xml(position, format!("invalid element name: {}", e)))
}

/// Owned tag name and unescaped attributes of a start tag
fn element_parts(e: &BytesStart<'_>, position: u64) -> Result<(String, Vec<(String, String)>)> {
    let tag = decode_name(e.local_name().as_ref(), position)?;

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| FmpError::malformed_xml(position, err.to_string()))?;
        let key = decode_name(attr.key.as_ref(), position)?;
        let value = attr
            .unescape_value()
            .map_err(|err| FmpError::malformed_xml(position, err.to_string()))?;
        attributes.push((key, value.into_owned()));
    }

    Ok((tag, attributes))
}

fn reader_error(err: quick_xml::Error, position: u64, path: Option<&Path>) -> FmpError {
    match (err, path) {
        (quick_xml::Error::Io(source), Some(path)) => FmpError::io(
            path,
            std::io::Error::new(source.kind(), source.to_string()),
        ),
        (err, _) => FmpError::malformed_xml(position, err.to_string()),
    }
}

#[cfg(test)]
mod tests;
