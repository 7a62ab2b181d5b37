//! Error handling for FMPXMLRESULT import operations.
//!
//! Every variant is fatal to the import run. Dirty NUMBER and TIME values never
//! reach this layer because they degrade to empty/midnight during coercion.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::FieldKind;

#[derive(Error, Debug)]
pub enum FmpError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML at byte {position}: {reason}")]
    MalformedXml { position: u64, reason: String },

    #[error("Row references unknown field '{name}'")]
    UnknownField { name: String },

    #[error("Couldn't format column {field}:'{value}' as {kind}: {reason}")]
    FieldFormat {
        field: String,
        value: String,
        kind: FieldKind,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Row import failed: {message}")]
    Import { message: String },
}

impl FmpError {
    /// Create an I/O error tied to the file being imported
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed_xml(position: u64, reason: impl Into<String>) -> Self {
        Self::MalformedXml {
            position,
            reason: reason.into(),
        }
    }

    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an error on behalf of a consumer-supplied importer
    pub fn import(message: impl Into<String>) -> Self {
        Self::Import {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FmpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_format_message_carries_context() {
        let error = FmpError::FieldFormat {
            field: "Born".to_string(),
            value: "15-01-2020".to_string(),
            kind: FieldKind::Date,
            reason: "input contains invalid characters".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("Born"));
        assert!(message.contains("15-01-2020"));
        assert!(message.contains("DATE"));
    }

    #[test]
    fn test_malformed_xml_reports_position() {
        let error = FmpError::malformed_xml(128, "unexpected end tag </ROW>");
        assert_eq!(
            error.to_string(),
            "Malformed XML at byte 128: unexpected end tag </ROW>"
        );
    }
}
