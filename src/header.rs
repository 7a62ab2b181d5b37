//! FMPXMLRESULT header state: field definitions and export metadata.
//!
//! The header (`ERRORCODE`, `PRODUCT`, `DATABASE` and the `FIELD` elements
//! inside `METADATA`) always precedes `RESULTSET`, so the registry is complete
//! before the first row is converted.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::constants::attributes;
use crate::error::{FmpError, Result};
use crate::models::{DatabaseMetadata, FieldDefinition, FieldKind, ProductInfo};

/// Ordered, append-only mapping of field name to definition
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDefinition>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field from the attributes of a `FIELD` element
    pub fn add_field(&mut self, attrs: &[(String, String)]) -> Result<&FieldDefinition> {
        let definition = field_from_attributes(attrs)?;
        Ok(self.insert(definition))
    }

    /// Store a definition. Re-declaring a name replaces the definition but
    /// keeps its original position.
    pub fn insert(&mut self, definition: FieldDefinition) -> &FieldDefinition {
        let position = match self.index.get(&definition.name) {
            Some(&position) => {
                warn!(
                    "Field '{}' declared more than once; keeping the last definition",
                    definition.name
                );
                self.fields[position] = definition;
                position
            }
            None => {
                debug!(
                    "Registered field '{}' as {} (MAXREPEAT={}, EMPTYOK={})",
                    definition.name,
                    definition.kind,
                    definition.max_repeat,
                    definition.allow_empty
                );
                self.index
                    .insert(definition.name.clone(), self.fields.len());
                self.fields.push(definition);
                self.fields.len() - 1
            }
        };

        &self.fields[position]
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Everything captured from the header section of an export
#[derive(Debug, Clone, Default)]
pub struct ExportHeader {
    pub registry: FieldRegistry,
    pub database: DatabaseMetadata,
    pub product: ProductInfo,
    /// Text of `ERRORCODE`, "0" on a clean export
    pub error_code: Option<String>,
}

fn field_from_attributes(attrs: &[(String, String)]) -> Result<FieldDefinition> {
    let name = required_attribute(attrs, attributes::NAME)?;
    let declared_type = required_attribute(attrs, attributes::TYPE)?;
    let max_repeat_raw = required_attribute(attrs, attributes::MAX_REPEAT)?;

    let max_repeat = max_repeat_raw.trim().parse::<u32>().map_err(|e| {
        FmpError::configuration(format!(
            "Field '{}' has invalid MAXREPEAT '{}' ({})",
            name, max_repeat_raw, e
        ))
    })?;
    if max_repeat == 0 {
        return Err(FmpError::configuration(format!(
            "Field '{}' has MAXREPEAT 0; expected at least 1",
            name
        )));
    }

    let allow_empty = lookup(attrs, attributes::EMPTY_OK) == Some(attributes::YES);

    Ok(FieldDefinition {
        name: name.to_string(),
        kind: FieldKind::from_declared(declared_type),
        declared_type: declared_type.to_string(),
        max_repeat,
        allow_empty,
    })
}

fn lookup<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn required_attribute<'a>(attrs: &'a [(String, String)], key: &str) -> Result<&'a str> {
    lookup(attrs, key).ok_or_else(|| {
        FmpError::configuration(format!("FIELD element is missing the {} attribute", key))
    })
}
