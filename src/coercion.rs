//! Conversion of raw cell text into typed values.
//!
//! Each [`FieldKind`] has its own policy for values that do not parse:
//!
//! | Kind   | Empty input | Unparseable input          |
//! |--------|-------------|----------------------------|
//! | NUMBER | `Empty`     | `Empty`                    |
//! | DATE   | `Empty`     | fatal `FieldFormat` error  |
//! | TIME   | midnight    | midnight                   |
//! | TEXT   | `""`        | n/a (whitespace trimmed)   |
//!
//! Dates are fatal because the pattern is operator-configured: a mismatch
//! means the import is misconfigured rather than the data being dirty.

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, error};

use crate::config::ImportConfig;
use crate::constants::{attributes, elements};
use crate::error::{FmpError, Result};
use crate::header::FieldRegistry;
use crate::models::{FieldDefinition, FieldKind, FieldValue, Record};
use crate::time_parser::parse_time;
use crate::tree::ElementNode;

/// Converts raw text to [`FieldValue`]s according to field definitions
#[derive(Debug, Clone)]
pub struct ValueCoercer {
    date_format: String,
}

impl ValueCoercer {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Coerce one raw value according to its field definition
    pub fn coerce(&self, field: &FieldDefinition, raw: &str) -> Result<FieldValue> {
        let converted = match field.kind {
            FieldKind::Number => Ok(format_number(raw)),
            FieldKind::Date => self.format_date(raw),
            FieldKind::Time => Ok(format_time(raw)),
            FieldKind::Text => Ok(format_text(raw)),
        };

        converted.map_err(|e| {
            error!(
                "Couldn't format column {}:'{}' as {}",
                field.name, raw, field.declared_type
            );
            FmpError::FieldFormat {
                field: field.name.clone(),
                value: raw.to_string(),
                kind: field.kind,
                reason: e.to_string(),
            }
        })
    }

    /// Convert a row of (field name, raw text) pairs into a record
    pub fn format_row<N, V>(
        &self,
        registry: &FieldRegistry,
        row: impl IntoIterator<Item = (N, V)>,
    ) -> Result<Record>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut record = Record::new();
        for (name, raw) in row {
            let name = name.as_ref();
            let field = registry
                .get(name)
                .ok_or_else(|| FmpError::unknown_field(name))?;
            record.insert(name, self.coerce(field, raw.as_ref())?);
        }
        Ok(record)
    }

    /// Flatten a `ROW` node into name/text pairs and convert them.
    ///
    /// Each `COL` supplies the text of its first `DATA` child (an empty `COL`
    /// supplies ""); columns are zipped positionally with the registry's
    /// declaration order.
    pub fn format_node(&self, registry: &FieldRegistry, row: &ElementNode) -> Result<Record> {
        let values: Vec<&str> = row
            .children_named(elements::COL)
            .map(|col| {
                col.first_child(elements::DATA)
                    .map_or("", |data| data.text.as_str())
            })
            .collect();

        if registry.is_empty() && !values.is_empty() {
            return Err(FmpError::configuration(
                "ROW encountered before any FIELD definitions",
            ));
        }
        if values.len() != registry.len() {
            debug!(
                "Row {:?} has {} columns for {} declared fields",
                row.attribute(attributes::RECORD_ID),
                values.len(),
                registry.len()
            );
        }

        let mut record = self.format_row(registry, registry.field_names().zip(values))?;
        record.record_id = row.attribute(attributes::RECORD_ID).map(str::to_string);
        record.mod_id = row.attribute(attributes::MOD_ID).map(str::to_string);
        Ok(record)
    }

    fn format_date(&self, raw: &str) -> std::result::Result<FieldValue, chrono::ParseError> {
        if raw.is_empty() {
            return Ok(FieldValue::Empty);
        }
        NaiveDate::parse_from_str(raw, &self.date_format).map(FieldValue::Date)
    }
}

/// Keep only digits and decimal points, then parse as `f64`.
///
/// Currency symbols, thousands separators and signs are all discarded, so
/// "$1,234.56" becomes 1234.56 and "-5" becomes 5.
pub fn format_number(raw: &str) -> FieldValue {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if digits.is_empty() {
        return FieldValue::Empty;
    }

    match digits.parse::<f64>() {
        Ok(value) => FieldValue::Number(value),
        Err(_) => {
            debug!("Number '{}' still unparseable after cleanup", raw);
            FieldValue::Empty
        }
    }
}

/// Unrecognised times fall back to midnight rather than `Empty`
pub fn format_time(raw: &str) -> FieldValue {
    FieldValue::Time(parse_time(raw).unwrap_or(NaiveTime::MIN))
}

pub fn format_text(raw: &str) -> FieldValue {
    FieldValue::Text(raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, kind: FieldKind) -> FieldDefinition {
        FieldDefinition {
            name: name.to_string(),
            kind,
            declared_type: kind.as_str().to_string(),
            max_repeat: 1,
            allow_empty: true,
        }
    }

    fn coercer() -> ValueCoercer {
        ValueCoercer::new(&ImportConfig::default())
    }

    fn registry(fields: &[(&str, FieldKind)]) -> FieldRegistry {
        let mut registry = FieldRegistry::new();
        for (name, kind) in fields {
            registry.insert(definition(name, *kind));
        }
        registry
    }

    fn date(y: i32, m: u32, d: u32) -> FieldValue {
        FieldValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_number_strips_non_numeric_characters() {
        assert_eq!(format_number("$1,234.56"), FieldValue::Number(1234.56));
        assert_eq!(format_number("42"), FieldValue::Number(42.0));
        assert_eq!(format_number(" 7 kg"), FieldValue::Number(7.0));
        assert_eq!(format_number("-5"), FieldValue::Number(5.0));
    }

    #[test]
    fn test_number_degrades_to_empty() {
        assert_eq!(format_number(""), FieldValue::Empty);
        assert_eq!(format_number("abc"), FieldValue::Empty);
        assert_eq!(format_number("1.2.3"), FieldValue::Empty);
        assert_eq!(format_number("."), FieldValue::Empty);
    }

    #[test]
    fn test_date_default_pattern() {
        let field = definition("Born", FieldKind::Date);
        let coercer = coercer();

        assert_eq!(coercer.coerce(&field, "2020/01/15").unwrap(), date(2020, 1, 15));
        assert_eq!(coercer.coerce(&field, "").unwrap(), FieldValue::Empty);
    }

    #[test]
    fn test_date_mismatch_is_fatal() {
        let field = definition("Born", FieldKind::Date);

        match coercer().coerce(&field, "15-01-2020") {
            Err(FmpError::FieldFormat {
                field,
                value,
                kind,
                ..
            }) => {
                assert_eq!(field, "Born");
                assert_eq!(value, "15-01-2020");
                assert_eq!(kind, FieldKind::Date);
            }
            other => panic!("Expected FieldFormat error, got {:?}", other),
        }
    }

    #[test]
    fn test_date_custom_pattern() {
        let config = ImportConfig::default().with_date_format("%m/%d/%Y");
        let coercer = ValueCoercer::new(&config);
        let field = definition("Born", FieldKind::Date);

        assert_eq!(coercer.date_format(), "%m/%d/%Y");
        assert_eq!(coercer.coerce(&field, "1/5/2021").unwrap(), date(2021, 1, 5));
        assert!(coercer.coerce(&field, "2021/01/05").is_err());
    }

    #[test]
    fn test_time_defaults_to_midnight() {
        let field = definition("Start", FieldKind::Time);
        let coercer = coercer();

        assert_eq!(
            coercer.coerce(&field, "").unwrap(),
            FieldValue::Time(NaiveTime::MIN)
        );
        assert_eq!(
            coercer.coerce(&field, "sometime").unwrap(),
            FieldValue::Time(NaiveTime::MIN)
        );
        assert_eq!(
            coercer.coerce(&field, "3:30 pm").unwrap(),
            FieldValue::Time(NaiveTime::from_hms_opt(15, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_text_is_trimmed() {
        let field = definition("Name", FieldKind::Text);
        assert_eq!(
            coercer().coerce(&field, "  Ada Lovelace \n").unwrap(),
            FieldValue::Text("Ada Lovelace".to_string())
        );
    }

    #[test]
    fn test_format_row_dispatches_by_kind() {
        let registry = registry(&[
            ("Qty", FieldKind::Number),
            ("Born", FieldKind::Date),
            ("Name", FieldKind::Text),
        ]);

        let record = coercer()
            .format_row(
                &registry,
                [("Name", " Ada "), ("Qty", "$3"), ("Born", "1815/12/10")],
            )
            .unwrap();

        assert_eq!(record.names().collect::<Vec<_>>(), vec!["Name", "Qty", "Born"]);
        assert_eq!(record.get("Qty"), Some(&FieldValue::Number(3.0)));
        assert_eq!(record.get("Born"), Some(&date(1815, 12, 10)));
        assert_eq!(record.get("Name").and_then(FieldValue::as_text), Some("Ada"));
    }

    #[test]
    fn test_format_row_unknown_field() {
        let registry = registry(&[("Qty", FieldKind::Number)]);

        let result = coercer().format_row(&registry, [("Price", "1")]);
        assert!(matches!(result, Err(FmpError::UnknownField { name }) if name == "Price"));
    }

    fn row_node(values: &[&str]) -> ElementNode {
        let mut row = ElementNode::new(
            "ROW",
            vec![
                ("MODID".to_string(), "3".to_string()),
                ("RECORDID".to_string(), "17".to_string()),
            ],
        );
        for value in values {
            let mut data = ElementNode::new("DATA", vec![]);
            data.text = value.to_string();
            let mut col = ElementNode::new("COL", vec![]);
            col.children.push(data);
            row.children.push(col);
        }
        row
    }

    #[test]
    fn test_format_node_zips_columns_with_fields() {
        let registry = registry(&[("Qty", FieldKind::Number), ("Name", FieldKind::Text)]);

        let record = coercer()
            .format_node(&registry, &row_node(&["42", " widget "]))
            .unwrap();

        assert_eq!(record.record_id.as_deref(), Some("17"));
        assert_eq!(record.mod_id.as_deref(), Some("3"));
        assert_eq!(record.get("Qty"), Some(&FieldValue::Number(42.0)));
        assert_eq!(record.get("Name"), Some(&FieldValue::Text("widget".to_string())));
    }

    #[test]
    fn test_format_node_empty_col_and_short_row() {
        let registry = registry(&[
            ("Name", FieldKind::Text),
            ("Qty", FieldKind::Number),
            ("Born", FieldKind::Date),
        ]);
        let mut row = row_node(&["x"]);
        row.children.push(ElementNode::new("COL", vec![]));

        let record = coercer().format_node(&registry, &row).unwrap();

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("Qty"), Some(&FieldValue::Empty));
        assert!(record.get("Born").is_none());
    }

    #[test]
    fn test_format_node_before_header_is_rejected() {
        let result = coercer().format_node(&FieldRegistry::new(), &row_node(&["1"]));
        assert!(matches!(result, Err(FmpError::Configuration { .. })));
    }
}
