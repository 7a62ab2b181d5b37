//! Core data structures and types for FMPXMLRESULT imports.
//!
//! Defines declared field kinds, field metadata, typed cell values, records,
//! export-level metadata and import statistics.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::attributes;
use crate::tree::ElementNode;

/// Declared type of a FileMaker field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Number,
    Date,
    Time,
    Text,
}

impl FieldKind {
    /// Map the `TYPE` attribute to a kind. Anything unrecognised (TIMESTAMP,
    /// CONTAINER, ...) is treated as text.
    pub fn from_declared(declared: &str) -> Self {
        match declared {
            "NUMBER" => FieldKind::Number,
            "DATE" => FieldKind::Date,
            "TIME" => FieldKind::Time,
            _ => FieldKind::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Number => "NUMBER",
            FieldKind::Date => "DATE",
            FieldKind::Time => "TIME",
            FieldKind::Text => "TEXT",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one exported column, taken from a header `FIELD` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: FieldKind,
    /// Raw `TYPE` attribute, kept for diagnostics
    pub declared_type: String,
    pub max_repeat: u32,
    pub allow_empty: bool,
}

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    Text(String),
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            FieldValue::Time(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// One converted row: field name to typed value, in column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_id: Option<String>,
    pub fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, replacing an earlier value for the same field
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Attributes of the `DATABASE` header element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    pub name: Option<String>,
    pub layout: Option<String>,
    pub records: Option<u64>,
    pub date_format: Option<String>,
    pub time_format: Option<String>,
}

impl DatabaseMetadata {
    pub fn from_node(node: &ElementNode) -> Self {
        Self {
            name: node.attribute(attributes::NAME).map(str::to_string),
            layout: node.attribute(attributes::LAYOUT).map(str::to_string),
            records: node
                .attribute(attributes::RECORDS)
                .and_then(|value| value.trim().parse().ok()),
            date_format: node.attribute(attributes::DATE_FORMAT).map(str::to_string),
            time_format: node.attribute(attributes::TIME_FORMAT).map(str::to_string),
        }
    }
}

/// Attributes of the `PRODUCT` header element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub build: Option<String>,
}

impl ProductInfo {
    pub fn from_node(node: &ElementNode) -> Self {
        Self {
            name: node.attribute(attributes::NAME).map(str::to_string),
            version: node.attribute(attributes::VERSION).map(str::to_string),
            build: node.attribute(attributes::BUILD).map(str::to_string),
        }
    }
}

/// Import statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportStats {
    pub fields_registered: usize,
    pub rows_imported: usize,
    /// Largest number of element nodes held in memory at once
    pub peak_live_nodes: usize,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_from_declared() {
        assert_eq!(FieldKind::from_declared("NUMBER"), FieldKind::Number);
        assert_eq!(FieldKind::from_declared("DATE"), FieldKind::Date);
        assert_eq!(FieldKind::from_declared("TIME"), FieldKind::Time);
        assert_eq!(FieldKind::from_declared("TEXT"), FieldKind::Text);
        assert_eq!(FieldKind::from_declared("TIMESTAMP"), FieldKind::Text);
        assert_eq!(FieldKind::from_declared("CONTAINER"), FieldKind::Text);
    }

    #[test]
    fn test_record_insert_keeps_order_and_replaces() {
        let mut record = Record::new();
        record.insert("b", FieldValue::Number(1.0));
        record.insert("a", FieldValue::Empty);
        record.insert("b", FieldValue::Number(2.0));

        assert_eq!(record.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&FieldValue::Number(2.0)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_field_value_serializes_untagged() {
        let mut record = Record::new();
        record.insert("Qty", FieldValue::Number(42.0));
        record.insert("Note", FieldValue::Empty);
        record.insert(
            "Born",
            FieldValue::Date(NaiveDate::from_ymd_opt(2020, 1, 15).unwrap()),
        );

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"fields":[["Qty",42.0],["Note",null],["Born","2020-01-15"]]}"#
        );
    }
}
