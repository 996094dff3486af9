//! Column layout types
//!
//! A `Schema` is the ordered list of fixed-width fields read from a data
//! dictionary. Field order defines both the table's column order and the
//! order in which a record is sliced.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::validator::validate_column_name;

/// One fixed-width field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// 0-based byte position in a line
    pub offset: usize,
    /// Column name
    pub name: String,
    /// Byte width, always > 0
    pub length: usize,
    /// Free-text description from the dictionary comment, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// Create a field descriptor from an already 0-based offset.
    pub fn new(offset: usize, name: impl Into<String>, length: usize) -> Self {
        Self {
            offset,
            name: name.into(),
            length,
            description: None,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Exclusive end position of the field.
    ///
    /// Cannot overflow for fields held by a `Schema`.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Ordered, validated sequence of field descriptors.
///
/// The only constructor validates every name, so a `Schema` value can be used
/// to render SQL without further checks. It is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Build a schema, rejecting empty layouts, invalid names and duplicates.
    pub fn new(fields: Vec<FieldDescriptor>) -> SchemaResult<Self> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            validate_column_name(&field.name)?;
            if field.length == 0 {
                return Err(SchemaError::InvalidField {
                    name: field.name.clone(),
                    reason: "length must be greater than zero",
                });
            }
            if field.offset.checked_add(field.length).is_none() {
                return Err(SchemaError::InvalidField {
                    name: field.name.clone(),
                    reason: "offset plus length overflows",
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(field.name.clone()));
            }
        }

        Ok(Self { fields })
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of declared fields (the provenance column is not counted).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false: an empty schema cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Whether a field with this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Minimum line length that fills every field.
    pub fn record_width(&self) -> usize {
        self.fields.iter().map(FieldDescriptor::end).max().unwrap_or(0)
    }
}
