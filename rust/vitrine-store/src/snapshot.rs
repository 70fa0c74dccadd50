//! A file-backed [`Store`].
//!
//! A snapshot file is a JSON document listing every table with its schema
//! and rows. Row values are kept as written and only interpreted when a
//! field is read, so a file whose values disagree with its schema opens
//! fine and fails on the offending read.
//!
//! ```json
//! {
//!   "version": 1,
//!   "tables": [
//!     {
//!       "name": "Author",
//!       "primary_key": "name",
//!       "fields": [{ "name": "name", "type": "string" }],
//!       "rows": [{ "name": "Moses" }]
//!     },
//!     {
//!       "name": "Book",
//!       "fields": [
//!         { "name": "title", "type": "string" },
//!         { "name": "author", "type": "object", "target": "Author" }
//!       ],
//!       "rows": [{ "title": "Genesis", "author": 0 }]
//!     }
//!   ]
//! }
//! ```
//!
//! Links are row positions in the target table. Files may be sealed with a
//! key, see [`SnapshotBuilder::write`].

mod builder;
mod envelope;

pub use builder::*;

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Cell, FieldSchema, FieldType, OpenOptions, RowRef, Store, StoreError, StoreOpener, TableSchema,
};

/// The newest snapshot format this crate reads and writes
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotDocument {
    version: u32,
    #[serde(default)]
    tables: Vec<TableDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableDocument {
    #[serde(flatten)]
    schema: TableSchema,
    #[serde(default)]
    rows: Vec<Value>,
}

impl SnapshotDocument {
    fn validate(&self) -> Result<(), StoreError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(StoreError::Decode(format!(
                "Snapshot version {} is newer than supported version {SNAPSHOT_VERSION}",
                self.version
            )));
        }

        let mut names = HashSet::new();
        for table in &self.tables {
            if !names.insert(table.schema.name.as_str()) {
                return Err(StoreError::Decode(format!(
                    "Table '{}' is declared twice",
                    table.schema.name
                )));
            }
        }

        for table in &self.tables {
            let schema = &table.schema;
            if let Some(key) = &schema.primary_key {
                if schema.field(key).is_none() {
                    return Err(StoreError::Decode(format!(
                        "Primary key '{key}' of table '{}' is not a field",
                        schema.name
                    )));
                }
            }
            for field in &schema.fields {
                let target = match &field.field_type {
                    FieldType::Object { target } | FieldType::List { target } => target,
                    FieldType::LinkingObjects { source, .. } => source,
                    _ => continue,
                };
                if !names.contains(target.as_str()) {
                    return Err(StoreError::Decode(format!(
                        "Field '{}.{}' links to unknown table '{target}'",
                        schema.name, field.name
                    )));
                }
            }
            if let Some(position) = table.rows.iter().position(|row| !row.is_object()) {
                return Err(StoreError::Decode(format!(
                    "Row {position} of table '{}' is not an object",
                    schema.name
                )));
            }
        }

        Ok(())
    }
}

/// A store loaded from a snapshot file.
///
/// The whole file is read at open time; rows are iterated in file order.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    tables: Vec<TableDocument>,
    closed: AtomicBool,
}

impl SnapshotStore {
    /// Read and validate the snapshot described by `options`
    pub fn open(options: &OpenOptions) -> Result<Self, StoreError> {
        let path = options.path();
        let bytes = std::fs::read(&path)
            .map_err(|error| StoreError::Open(format!("{}: {error}", path.display())))?;

        let plaintext = match (&options.encryption_key, envelope::is_sealed(&bytes)) {
            (Some(key), true) => envelope::unseal(key, &bytes)?,
            (Some(_), false) => {
                return Err(StoreError::Encryption(
                    "An encryption key was supplied for an unencrypted store".into(),
                ));
            }
            (None, true) => {
                return Err(StoreError::Encryption(
                    "Store is encrypted and no key was supplied".into(),
                ));
            }
            (None, false) => bytes,
        };

        let document: SnapshotDocument = serde_json::from_slice(&plaintext)
            .map_err(|error| StoreError::Decode(format!("{error}")))?;
        document.validate()?;

        tracing::debug!(
            path = %path.display(),
            tables = document.tables.len(),
            "Opened snapshot store"
        );

        Ok(Self {
            path,
            tables: document.tables,
            closed: AtomicBool::new(false),
        })
    }

    /// The file this store was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether [`Store::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn table(&self, name: &str) -> Result<&TableDocument, StoreError> {
        self.tables
            .iter()
            .find(|table| table.schema.name == name)
            .ok_or_else(|| StoreError::NoSuchTable(name.to_owned()))
    }

    fn link(&self, target: &str, raw: &Value) -> Option<Result<RowRef, StoreError>> {
        let index = usize::try_from(raw.as_u64()?).ok()?;
        Some(self.table(target).and_then(|table| {
            if index < table.rows.len() {
                Ok(RowRef::new(target, index))
            } else {
                Err(StoreError::NoSuchRow {
                    table: target.to_owned(),
                    index,
                })
            }
        }))
    }

    fn decode(&self, table: &str, field: &FieldSchema, raw: &Value) -> Result<Cell, StoreError> {
        let mismatch = |expected: &'static str| StoreError::TypeMismatch {
            table: table.to_owned(),
            field: field.name.clone(),
            expected,
            found: describe(raw).to_owned(),
        };

        match &field.field_type {
            FieldType::LinkingObjects { .. } => return Ok(Cell::LinkingObjects),
            FieldType::List { .. } if raw.is_null() => return Ok(Cell::List(Vec::new())),
            _ if raw.is_null() => return Ok(Cell::Null),
            _ => (),
        }

        Ok(match &field.field_type {
            FieldType::Binary => raw
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .map(|item| item.as_u64().and_then(|byte| u8::try_from(byte).ok()))
                        .collect::<Option<Vec<u8>>>()
                })
                .map(Cell::Binary)
                .ok_or_else(|| mismatch("binary"))?,
            FieldType::Boolean => Cell::Boolean(raw.as_bool().ok_or_else(|| mismatch("boolean"))?),
            FieldType::Date => raw
                .as_str()
                .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
                .map(Cell::Date)
                .ok_or_else(|| mismatch("date"))?,
            FieldType::Double => Cell::Double(raw.as_f64().ok_or_else(|| mismatch("double"))?),
            FieldType::Float => {
                Cell::Float(raw.as_f64().ok_or_else(|| mismatch("float"))? as f32)
            }
            FieldType::Integer => Cell::Integer(raw.as_i64().ok_or_else(|| mismatch("integer"))?),
            FieldType::String => Cell::String(
                raw.as_str()
                    .ok_or_else(|| mismatch("string"))?
                    .to_owned(),
            ),
            FieldType::Object { target } => {
                Cell::Object(self.link(target, raw).ok_or_else(|| mismatch("object"))??)
            }
            FieldType::List { target } => Cell::List(
                raw.as_array()
                    .ok_or_else(|| mismatch("list"))?
                    .iter()
                    .map(|item| self.link(target, item).ok_or_else(|| mismatch("list"))?)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            FieldType::LinkingObjects { .. } => Cell::LinkingObjects,
            FieldType::UnsupportedDate => Cell::UnsupportedDate,
            FieldType::UnsupportedMixed => Cell::UnsupportedMixed,
            FieldType::UnsupportedTable => Cell::UnsupportedTable,
            FieldType::Unknown => Cell::Unsupported,
        })
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Store for SnapshotStore {
    fn table_names(&self) -> Vec<String> {
        self.tables
            .iter()
            .map(|table| table.schema.name.clone())
            .collect()
    }

    fn table_schema(&self, table: &str) -> Option<&TableSchema> {
        self.table(table).ok().map(|table| &table.schema)
    }

    fn rows(&self, table: &str) -> Result<impl Iterator<Item = RowRef> + '_, StoreError> {
        self.ensure_open()?;
        let table = self.table(table)?;
        let name = table.schema.name.clone();
        Ok((0..table.rows.len()).map(move |index| RowRef::new(name.clone(), index)))
    }

    fn read(&self, row: &RowRef, field: &str) -> Result<Cell, StoreError> {
        self.ensure_open()?;
        let table = self.table(row.table())?;
        let schema = table
            .schema
            .field(field)
            .ok_or_else(|| StoreError::NoSuchField {
                table: row.table().to_owned(),
                field: field.to_owned(),
            })?;
        let record = table
            .rows
            .get(row.index())
            .ok_or_else(|| StoreError::NoSuchRow {
                table: row.table().to_owned(),
                index: row.index(),
            })?;

        self.decode(row.table(), schema, record.get(field).unwrap_or(&Value::Null))
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!(path = %self.path.display(), "Closed snapshot store");
        }
    }
}

/// Opens [`SnapshotStore`]s from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotOpener;

impl StoreOpener for SnapshotOpener {
    type Store = SnapshotStore;

    fn open(&self, options: &OpenOptions) -> Result<Self::Store, StoreError> {
        SnapshotStore::open(options)
    }
}
