use std::path::Path;

use serde_json::Value;

use super::{SNAPSHOT_VERSION, SnapshotDocument, TableDocument, envelope};
use crate::{FieldSchema, FieldType, StoreError, TableSchema};

/// Authors snapshot files.
///
/// ```no_run
/// # use vitrine_store::{FieldType, SnapshotBuilder};
/// # use serde_json::json;
/// SnapshotBuilder::default()
///     .table("Book", |table| {
///         table
///             .field("title", FieldType::String)
///             .row(json!({ "title": "Exodus" }))
///     })
///     .write("books.vdb", None)?;
/// # Ok::<(), vitrine_store::StoreError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    tables: Vec<TableDocument>,
}

/// Describes one table inside a [`SnapshotBuilder`]
#[derive(Debug, Clone)]
pub struct TableBuilder {
    document: TableDocument,
}

impl TableBuilder {
    /// Append a field
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.document
            .schema
            .fields
            .push(FieldSchema::new(name, field_type));
        self
    }

    /// Declare `name` as the primary key
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.document.schema.primary_key = Some(name.into());
        self
    }

    /// Append a row. Values are written as given; links are row positions.
    pub fn row(mut self, values: Value) -> Self {
        self.document.rows.push(values);
        self
    }
}

impl SnapshotBuilder {
    /// Append a table described by `build`
    pub fn table(
        mut self,
        name: impl Into<String>,
        build: impl FnOnce(TableBuilder) -> TableBuilder,
    ) -> Self {
        let table = build(TableBuilder {
            document: TableDocument {
                schema: TableSchema {
                    name: name.into(),
                    fields: Vec::new(),
                    primary_key: None,
                },
                rows: Vec::new(),
            },
        });
        self.tables.push(table.document);
        self
    }

    /// Serialize the snapshot, sealing it when `key` is given
    pub fn to_bytes(&self, key: Option<&[u8]>) -> Result<Vec<u8>, StoreError> {
        let document = SnapshotDocument {
            version: SNAPSHOT_VERSION,
            tables: self.tables.clone(),
        };
        let plaintext = serde_json::to_vec_pretty(&document)
            .map_err(|error| StoreError::Decode(format!("{error}")))?;

        match key {
            Some(key) => envelope::seal(key, &plaintext),
            None => Ok(plaintext),
        }
    }

    /// Write the snapshot to `path`, sealing it when `key` is given
    pub fn write(&self, path: impl AsRef<Path>, key: Option<&[u8]>) -> Result<(), StoreError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bytes(key)?)
            .map_err(|error| StoreError::Open(format!("{}: {error}", path.display())))
    }
}
