//! Table schemas as declared by a store.
//!
//! A [`TableSchema`] is a read-only view: callers never own it and should
//! fetch it from the [`Store`](crate::Store) each time they need it.

use serde::{Deserialize, Serialize};

/// The declared kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// A byte buffer
    Binary,
    /// A boolean
    Boolean,
    /// A timestamp with an offset
    Date,
    /// A 64-bit float
    Double,
    /// A 32-bit float
    Float,
    /// A 64-bit signed integer
    Integer,
    /// A UTF-8 string
    String,
    /// A link to a single row of `target`
    Object {
        /// Name of the linked table
        target: String,
    },
    /// An ordered list of links to rows of `target`
    List {
        /// Name of the linked table
        target: String,
    },
    /// Rows of `source` whose `field` links back here. Computed, never stored.
    LinkingObjects {
        /// Table holding the forward links
        source: String,
        /// Link field in `source`
        field: String,
    },
    /// The engine's legacy date representation
    UnsupportedDate,
    /// A polymorphic value
    UnsupportedMixed,
    /// A nested sub-table
    UnsupportedTable,
    /// A kind written by a newer engine
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// The name used for this kind in store files and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Binary => "binary",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Integer => "integer",
            FieldType::String => "string",
            FieldType::Object { .. } => "object",
            FieldType::List { .. } => "list",
            FieldType::LinkingObjects { .. } => "linking_objects",
            FieldType::UnsupportedDate => "unsupported_date",
            FieldType::UnsupportedMixed => "unsupported_mixed",
            FieldType::UnsupportedTable => "unsupported_table",
            FieldType::Unknown => "unknown",
        }
    }

    /// The table a link field points into, if this is a link kind
    pub fn link_target(&self) -> Option<&str> {
        match self {
            FieldType::Object { target } | FieldType::List { target } => Some(target),
            _ => None,
        }
    }
}

/// A single named, typed field of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Declared kind
    #[serde(flatten)]
    pub field_type: FieldType,
}

impl FieldSchema {
    /// Declare a field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// The ordered field list of one table, plus its primary key if it has one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table (class) name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldSchema>,
    /// Name of the primary key field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
}

impl TableSchema {
    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.name.clone()).collect()
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Whether a primary key is declared
    pub fn has_primary_key(&self) -> bool {
        self.primary_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_reads_link_fields_with_targets() -> anyhow::Result<()> {
        let field: FieldSchema =
            serde_json::from_str(r#"{ "name": "author", "type": "object", "target": "Author" }"#)?;

        assert_eq!(
            field,
            FieldSchema::new(
                "author",
                FieldType::Object {
                    target: "Author".into()
                }
            )
        );
        assert_eq!(field.field_type.link_target(), Some("Author"));
        Ok(())
    }

    #[test]
    fn it_tolerates_kinds_it_does_not_know() -> anyhow::Result<()> {
        let field: FieldSchema =
            serde_json::from_str(r#"{ "name": "price", "type": "decimal128" }"#)?;

        assert_eq!(field.field_type, FieldType::Unknown);
        Ok(())
    }
}
